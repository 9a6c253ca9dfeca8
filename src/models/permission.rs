//! Catalog permissions granted to staff accounts

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Named permission checked before a mutation or a staff-only view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Permission {
    #[serde(rename = "catalog.add_author")]
    AddAuthor,
    #[serde(rename = "catalog.change_author")]
    ChangeAuthor,
    #[serde(rename = "catalog.delete_author")]
    DeleteAuthor,
    #[serde(rename = "catalog.add_book")]
    AddBook,
    #[serde(rename = "catalog.change_book")]
    ChangeBook,
    #[serde(rename = "catalog.delete_book")]
    DeleteBook,
    #[serde(rename = "catalog.add_bookinstance")]
    AddBookInstance,
    #[serde(rename = "catalog.change_bookinstance")]
    ChangeBookInstance,
    #[serde(rename = "catalog.delete_bookinstance")]
    DeleteBookInstance,
    #[serde(rename = "catalog.add_genre")]
    AddGenre,
    #[serde(rename = "catalog.delete_genre")]
    DeleteGenre,
    #[serde(rename = "catalog.add_language")]
    AddLanguage,
    #[serde(rename = "catalog.delete_language")]
    DeleteLanguage,
    /// Renew loans and see every borrowed copy
    #[serde(rename = "catalog.can_mark_returned")]
    CanMarkReturned,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::AddAuthor,
        Permission::ChangeAuthor,
        Permission::DeleteAuthor,
        Permission::AddBook,
        Permission::ChangeBook,
        Permission::DeleteBook,
        Permission::AddBookInstance,
        Permission::ChangeBookInstance,
        Permission::DeleteBookInstance,
        Permission::AddGenre,
        Permission::DeleteGenre,
        Permission::AddLanguage,
        Permission::DeleteLanguage,
        Permission::CanMarkReturned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::AddAuthor => "catalog.add_author",
            Permission::ChangeAuthor => "catalog.change_author",
            Permission::DeleteAuthor => "catalog.delete_author",
            Permission::AddBook => "catalog.add_book",
            Permission::ChangeBook => "catalog.change_book",
            Permission::DeleteBook => "catalog.delete_book",
            Permission::AddBookInstance => "catalog.add_bookinstance",
            Permission::ChangeBookInstance => "catalog.change_bookinstance",
            Permission::DeleteBookInstance => "catalog.delete_bookinstance",
            Permission::AddGenre => "catalog.add_genre",
            Permission::DeleteGenre => "catalog.delete_genre",
            Permission::AddLanguage => "catalog.add_language",
            Permission::DeleteLanguage => "catalog.delete_language",
            Permission::CanMarkReturned => "catalog.can_mark_returned",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}
