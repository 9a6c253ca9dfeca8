//! Book model and related types

use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::Author;
use super::book_instance::BookInstance;
use super::form::{self, FieldErrors, REQUIRED};
use super::genre::Genre;
use super::language::Language;

pub const ISBN_LENGTH: usize = 13;

/// Full book row from database (genres live in `book_genres`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub language_id: Option<i32>,
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    /// "last_name, first_name" of the author, if any
    pub author_name: Option<String>,
}

/// Book with its author, language, genres and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub author: Option<Author>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    /// Up to three genre names, comma separated
    pub display_genre: String,
    pub copies: Vec<BookInstance>,
}

impl BookDetail {
    pub fn new(
        book: Book,
        author: Option<Author>,
        language: Option<Language>,
        genres: Vec<Genre>,
        copies: Vec<BookInstance>,
    ) -> Self {
        let display_genre = display_genre(&genres);
        Self {
            book,
            author,
            language,
            genres,
            display_genre,
            copies,
        }
    }
}

pub fn display_genre(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(3)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_isbn(isbn: &str, errors: &mut FieldErrors) {
    if isbn.chars().count() != ISBN_LENGTH || !isbn.chars().all(|c| c.is_ascii_digit()) {
        errors.add("isbn", "Enter a 13 digit ISBN.");
    }
}

fn check_genres(genre_ids: &[i32], errors: &mut FieldErrors) {
    if genre_ids.is_empty() {
        errors.add("genre_ids", REQUIRED);
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub title: String,
    pub author_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub summary: String,
    /// 13 digit ISBN
    pub isbn: String,
    pub genre_ids: Vec<i32>,
    pub language_id: Option<i32>,
}

impl CreateBook {
    pub fn validate_fields(&self) -> FieldErrors {
        let mut errors = form::check(self);
        check_isbn(&self.isbn, &mut errors);
        check_genres(&self.genre_ids, &mut errors);
        errors
    }
}

/// Validated book fields ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookChanges {
    pub book: Book,
    /// Replacement genre set, when submitted
    pub genre_ids: Option<Vec<i32>>,
}

/// Update book request: same fields as creation, all optional.
/// An explicit `null` clears the author or language.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub title: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub author_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub summary: Option<String>,
    pub isbn: Option<String>,
    pub genre_ids: Option<Vec<i32>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub language_id: Option<Option<i32>>,
}

impl UpdateBook {
    /// Applies the submitted fields on top of the stored book
    pub fn apply(self, mut book: Book) -> Result<BookChanges, FieldErrors> {
        let mut errors = form::check(&self);
        if let Some(isbn) = &self.isbn {
            check_isbn(isbn, &mut errors);
        }
        if let Some(genre_ids) = &self.genre_ids {
            check_genres(genre_ids, &mut errors);
        }
        errors.ensure_empty()?;

        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author_id) = self.author_id {
            book.author_id = author_id;
        }
        if let Some(summary) = self.summary {
            book.summary = summary;
        }
        if let Some(isbn) = self.isbn {
            book.isbn = isbn;
        }
        if let Some(language_id) = self.language_id {
            book.language_id = language_id;
        }
        Ok(BookChanges {
            book,
            genre_ids: self.genre_ids,
        })
    }
}

/// Choices offered by the book create/update forms
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookFormChoices {
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub languages: Vec<Language>,
}

/// Book form context: current values (empty on create) plus the choices
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookForm {
    pub initial: Option<BookDetail>,
    pub choices: BookFormChoices,
}
