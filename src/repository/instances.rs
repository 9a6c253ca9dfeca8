//! Book instances (copies) repository: loan listings and renewals

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::map_write_error;
use crate::{
    error::{AppError, AppResult},
    models::book_instance::{
        BookInstance, BookInstanceRow, CreateBookInstance, LoanStatus, LoanedCopyRow,
    },
};

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, due_back, borrower_id, status";

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_with_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status.code())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        let query = format!("SELECT {} FROM book_instances WHERE id = $1", INSTANCE_COLUMNS);
        sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(BookInstance::from)
            .ok_or_else(|| AppError::NotFound(format!("Book instance with id {} not found", id)))
    }

    /// Copies of a book ordered by due date
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let query = format!(
            "SELECT {} FROM book_instances WHERE book_id = $1 ORDER BY due_back, id",
            INSTANCE_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(BookInstance::from).collect())
    }

    /// Number of copies on loan, optionally restricted to one borrower
    pub async fn count_on_loan(&self, borrower_id: Option<i32>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM book_instances
            WHERE status = $1 AND ($2::int4 IS NULL OR borrower_id = $2)
            "#,
        )
        .bind(LoanStatus::OnLoan.code())
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// One page of copies on loan ordered by due date, optionally for one borrower
    pub async fn list_on_loan(
        &self,
        borrower_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<LoanedCopyRow>> {
        let rows = sqlx::query_as::<_, LoanedCopyRow>(
            r#"
            SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back,
                   bi.status, bi.borrower_id, u.username AS borrower
            FROM book_instances bi
            LEFT JOIN books b ON b.id = bi.book_id
            LEFT JOIN users u ON u.id = bi.borrower_id
            WHERE bi.status = $1 AND ($2::int4 IS NULL OR bi.borrower_id = $2)
            ORDER BY bi.due_back, bi.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(LoanStatus::OnLoan.code())
        .bind(borrower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert a copy under a freshly generated UUID
    pub async fn create(&self, instance: &CreateBookInstance) -> AppResult<BookInstance> {
        let query = format!(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, borrower_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        );
        let row = sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(Uuid::new_v4())
            .bind(instance.book_id)
            .bind(&instance.imprint)
            .bind(instance.due_back)
            .bind(instance.borrower_id)
            .bind(instance.status.code())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "id", "Book instance with this id already exists."))?;
        Ok(row.into())
    }

    pub async fn update(&self, instance: &BookInstance) -> AppResult<BookInstance> {
        let query = format!(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, due_back = $4, borrower_id = $5, status = $6
            WHERE id = $1
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        );
        sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(instance.id)
            .bind(instance.book_id)
            .bind(&instance.imprint)
            .bind(instance.due_back)
            .bind(instance.borrower_id)
            .bind(instance.status.code())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, "id", "Book instance with this id already exists."))?
            .map(BookInstance::from)
            .ok_or_else(|| AppError::NotFound(format!("Book instance with id {} not found", instance.id)))
    }

    /// Set the due date in a single statement
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        let query = format!(
            "UPDATE book_instances SET due_back = $2 WHERE id = $1 RETURNING {}",
            INSTANCE_COLUMNS
        );
        sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(id)
            .bind(due_back)
            .fetch_optional(&self.pool)
            .await?
            .map(BookInstance::from)
            .ok_or_else(|| AppError::NotFound(format!("Book instance with id {} not found", id)))
    }

    /// Delete a copy, returning the book it belonged to
    pub async fn delete(&self, id: Uuid) -> AppResult<Option<i32>> {
        let deleted: Option<Option<i32>> =
            sqlx::query_scalar("DELETE FROM book_instances WHERE id = $1 RETURNING book_id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        deleted.ok_or_else(|| AppError::NotFound(format!("Book instance with id {} not found", id)))
    }
}
