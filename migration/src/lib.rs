pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_recipe_tables;
mod m20240115_000002_tags;

pub struct Migrator;
pub use m20240101_000001_create_recipe_tables::Recipe;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_recipe_tables::Migration),
            Box::new(m20240115_000002_tags::Migration),
        ]
    }
}
