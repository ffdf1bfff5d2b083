pub mod author;
pub mod category;
pub mod recipe;
pub mod recipe_tag;
pub mod tag;

use author::Model as Author;

impl Author {
    /// "First Last", or the username when both names are blank.
    pub fn display_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full_name = full_name.trim();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first_name: &str, last_name: &str) -> Author {
        Author {
            id: uuid::Uuid::new_v4(),
            username: "maria".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: String::new(),
            bio: String::new(),
        }
    }

    #[test]
    fn display_name_joins_names() {
        assert_eq!(author("Maria", "Silva").display_name(), "Maria Silva");
        assert_eq!(author("Maria", "").display_name(), "Maria");
        assert_eq!(author("", " ").display_name(), "maria");
    }
}
