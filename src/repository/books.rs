//! Books repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use super::map_write_error;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChanges, BookSummary, CreateBook},
};

const DUPLICATE_ISBN: &str = "Book with this ISBN already exists.";

const SUMMARY_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id,
           CASE WHEN a.id IS NULL THEN NULL
                ELSE a.last_name || ', ' || a.first_name
           END AS author_name
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of books ordered by title, then author
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<BookSummary>> {
        let query = format!(
            "{} ORDER BY b.title, a.last_name, a.first_name, b.id LIMIT $1 OFFSET $2",
            SUMMARY_SELECT
        );
        let books = sqlx::query_as::<_, BookSummary>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Books written by an author
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookSummary>> {
        let query = format!("{} WHERE b.author_id = $1 ORDER BY b.title, b.id", SUMMARY_SELECT);
        let books = sqlx::query_as::<_, BookSummary>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, author_id, summary, isbn, language_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a book and its genre links in one transaction
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, author_id, summary, isbn, language_id
            "#,
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.language_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "isbn", DUPLICATE_ISBN))?;

        replace_genres(&mut *tx, created.id, &book.genre_ids).await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Write every column of the book, and its genres when they were submitted
    pub async fn update(&self, changes: &BookChanges) -> AppResult<Book> {
        let book = &changes.book;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, summary = $4, isbn = $5, language_id = $6
            WHERE id = $1
            RETURNING id, title, author_id, summary, isbn, language_id
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(book.author_id)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.language_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "isbn", DUPLICATE_ISBN))?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book.id)))?;

        if let Some(genre_ids) = &changes.genre_ids {
            sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
                .bind(book.id)
                .execute(&mut *tx)
                .await?;
            replace_genres(&mut *tx, book.id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a book unless a copy still references it.
    ///
    /// The book row is locked while the copies are counted so no copy can be
    /// attached between the check and the delete.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i32> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        let copies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE book_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if copies > 0 {
            return Err(AppError::Conflict(format!(
                "Book with id {} still has {} cop{} and cannot be deleted",
                id,
                copies,
                if copies == 1 { "y" } else { "ies" }
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(format!(
                            "Book with id {} is still referenced by copies",
                            id
                        ));
                    }
                }
                AppError::Database(e)
            })?;

        tx.commit().await?;
        Ok(())
    }
}

/// Link a book to the given genres (duplicates are ignored)
async fn replace_genres(conn: &mut PgConnection, book_id: i32, genre_ids: &[i32]) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO book_genres (book_id, genre_id)
        SELECT $1, UNNEST($2::int4[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(book_id)
    .bind(genre_ids)
    .execute(conn)
    .await
    .map_err(|e| map_write_error(e, "genre_ids", "Duplicate genre."))?;
    Ok(())
}
