//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod genres;
pub mod instances;
pub mod languages;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::{
    error::AppError,
    models::form::{FieldErrors, INVALID_CHOICE},
};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub genres: genres::GenresRepository,
    pub languages: languages::LanguagesRepository,
    pub instances: instances::InstancesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            genres: genres::GenresRepository::new(pool.clone()),
            languages: languages::LanguagesRepository::new(pool.clone()),
            instances: instances::InstancesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round trip to the database, used by the readiness probe
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Form field holding the reference checked by a foreign key constraint
fn field_for_constraint(constraint: &str) -> &'static str {
    match constraint {
        "books_author_id_fkey" => "author_id",
        "books_language_id_fkey" => "language_id",
        "book_genres_genre_id_fkey" => "genre_ids",
        "book_instances_book_id_fkey" => "book_id",
        "book_instances_borrower_id_fkey" => "borrower_id",
        _ => "__all__",
    }
}

/// Turns constraint violations raised by writes into form errors:
/// unknown references become "invalid choice" on the referencing field and
/// unique violations use `unique_field`/`unique_message`.
pub(crate) fn map_write_error(
    err: sqlx::Error,
    unique_field: &str,
    unique_message: &str,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Form(FieldErrors::single(unique_field, unique_message));
        }
        if db_err.is_foreign_key_violation() {
            let field = field_for_constraint(db_err.constraint().unwrap_or_default());
            return AppError::Form(FieldErrors::single(field, INVALID_CHOICE));
        }
    }
    AppError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_fields() {
        assert_eq!(field_for_constraint("books_author_id_fkey"), "author_id");
        assert_eq!(field_for_constraint("book_genres_genre_id_fkey"), "genre_ids");
        assert_eq!(field_for_constraint("something_else"), "__all__");
    }
}
