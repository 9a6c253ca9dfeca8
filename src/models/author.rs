//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookSummary;
use super::form::{self, FieldErrors};

/// Full author model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "last_name, first_name"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Author with the books they wrote
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    #[serde(flatten)]
    pub author: Author,
    pub display_name: String,
    pub books: Vec<BookSummary>,
}

/// Create author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 100, message = "Ensure this value has between 1 and 100 characters."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Ensure this value has between 1 and 100 characters."))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl CreateAuthor {
    pub fn validate_fields(&self) -> FieldErrors {
        form::check(self)
    }
}

/// Update author request: same fields as creation, all optional.
/// An explicit `null` clears a date.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 100, message = "Ensure this value has between 1 and 100 characters."))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Ensure this value has between 1 and 100 characters."))]
    pub last_name: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_death: Option<Option<NaiveDate>>,
}

impl UpdateAuthor {
    /// Applies the submitted fields on top of the stored author
    pub fn apply(self, mut author: Author) -> Result<Author, FieldErrors> {
        form::check(&self).ensure_empty()?;
        if let Some(first_name) = self.first_name {
            author.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            author.last_name = last_name;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            author.date_of_birth = date_of_birth;
        }
        if let Some(date_of_death) = self.date_of_death {
            author.date_of_death = date_of_death;
        }
        Ok(author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tolkien() -> Author {
        Author {
            id: 1,
            first_name: "John Ronald Reuel".to_string(),
            last_name: "Tolkien".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1892, 1, 3),
            date_of_death: NaiveDate::from_ymd_opt(1973, 9, 2),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(tolkien().display_name(), "Tolkien, John Ronald Reuel");
        assert_eq!(tolkien().to_string(), "Tolkien, John Ronald Reuel");
    }

    #[test]
    fn test_create_requires_names() {
        let request = CreateAuthor {
            first_name: String::new(),
            last_name: "x".repeat(101),
            date_of_birth: None,
            date_of_death: None,
        };
        let errors = request.validate_fields();
        assert!(errors.get("first_name").is_some());
        assert!(errors.get("last_name").is_some());
    }

    #[test]
    fn test_update_applies_subset() {
        let update: UpdateAuthor =
            serde_json::from_str(r#"{"last_name": "Tolkien-Smith", "date_of_death": null}"#).unwrap();
        let updated = update.apply(tolkien()).unwrap();
        assert_eq!(updated.last_name, "Tolkien-Smith");
        assert_eq!(updated.first_name, "John Ronald Reuel");
        assert_eq!(updated.date_of_death, None);
        assert_eq!(updated.date_of_birth, NaiveDate::from_ymd_opt(1892, 1, 3));
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let update = UpdateAuthor {
            first_name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.apply(tolkien()).is_err());
    }

    #[test]
    fn test_update_ignores_unknown_fields() {
        let update: UpdateAuthor = serde_json::from_str(r#"{"id": 99}"#).unwrap();
        assert_eq!(update.apply(tolkien()).unwrap().id, 1);
    }
}
