use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Author::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Author::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Author::Username).string_len(150).not_null())
                    .col(ColumnDef::new(Author::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Author::LastName).string_len(150).not_null())
                    .col(ColumnDef::new(Author::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Author::Bio).text().not_null().default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Name).string_len(65).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipe::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipe::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Recipe::Title)
                            .string_len(65)
                            .unique_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipe::Description).string_len(165).not_null())
                    .col(
                        ColumnDef::new(Recipe::Slug)
                            .string_len(80)
                            .unique_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipe::PreparationTime).integer().not_null())
                    .col(
                        ColumnDef::new(Recipe::PreparationTimeUnit)
                            .string_len(65)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipe::Servings).integer().not_null())
                    .col(ColumnDef::new(Recipe::ServingsUnit).string_len(65).not_null())
                    .col(ColumnDef::new(Recipe::PreparationSteps).text().not_null())
                    .col(
                        ColumnDef::new(Recipe::PreparationStepsIsHtml)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipe::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipe::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipe::IsPublished)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recipe::Cover)
                            .string_len(100)
                            .default("")
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recipe::CategoryId).integer().null())
                    .col(ColumnDef::new(Recipe::AuthorId).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe-category_id")
                            .from(Recipe::Table, Recipe::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipe-author_id")
                            .from(Recipe::Table, Recipe::AuthorId)
                            .to(Author::Table, Author::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-recipe-published")
                    .table(Recipe::Table)
                    .col(Recipe::IsPublished)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx-recipe-published").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipe::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Author::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Author {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    Bio,
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Recipe {
    Table,
    Id,
    Title,
    Description,
    Slug,
    PreparationTime,
    PreparationTimeUnit,
    Servings,
    ServingsUnit,
    PreparationSteps,
    PreparationStepsIsHtml,
    CreatedAt,
    UpdatedAt,
    IsPublished,
    Cover,
    CategoryId,
    AuthorId,
}
