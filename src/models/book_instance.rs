//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::form::{self, FieldErrors};

/// Loan status of a copy, stored as a one-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(LoanStatus::Maintenance),
            "o" => Some(LoanStatus::OnLoan),
            "a" => Some(LoanStatus::Available),
            "r" => Some(LoanStatus::Reserved),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for LoanStatus {
    fn from(s: String) -> Self {
        LoanStatus::from_code(&s).unwrap_or_default()
    }
}

/// Internal row structure for database queries (status as its code)
#[derive(Debug, Clone, FromRow)]
pub struct BookInstanceRow {
    id: Uuid,
    book_id: Option<i32>,
    imprint: String,
    due_back: Option<NaiveDate>,
    borrower_id: Option<i32>,
    status: String,
}

impl From<BookInstanceRow> for BookInstance {
    fn from(row: BookInstanceRow) -> Self {
        BookInstance {
            id: row.id,
            book_id: row.book_id,
            imprint: row.imprint,
            due_back: row.due_back,
            borrower_id: row.borrower_id,
            status: row.status.into(),
        }
    }
}

/// A copy is overdue once its due date is strictly before `today`
pub fn is_overdue(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_back.map(|due| due < today).unwrap_or(false)
}

/// A physical, trackable copy of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

impl BookInstance {
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        is_overdue(self.due_back, today)
    }
}

/// Internal row structure for loan listings
#[derive(Debug, Clone, FromRow)]
pub struct LoanedCopyRow {
    id: Uuid,
    book_id: Option<i32>,
    book_title: Option<String>,
    imprint: String,
    due_back: Option<NaiveDate>,
    status: String,
    borrower_id: Option<i32>,
    borrower: Option<String>,
}

impl LoanedCopyRow {
    pub fn into_loaned_copy(self, today: NaiveDate) -> LoanedCopy {
        LoanedCopy {
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title,
            imprint: self.imprint,
            due_back: self.due_back,
            status: self.status.into(),
            borrower_id: self.borrower_id,
            borrower: self.borrower,
            is_overdue: is_overdue(self.due_back, today),
        }
    }
}

/// Copy on loan, as shown in the borrowed-books lists
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanedCopy {
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
    /// Borrower username
    pub borrower: Option<String>,
    pub is_overdue: bool,
}

/// Create book instance request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookInstance {
    pub book_id: i32,
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    #[serde(default)]
    pub status: LoanStatus,
}

impl CreateBookInstance {
    pub fn validate_fields(&self) -> FieldErrors {
        form::check(self)
    }
}

/// Update book instance request; `null` clears a nullable field
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookInstance {
    pub book_id: Option<i32>,
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub imprint: Option<String>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub due_back: Option<Option<NaiveDate>>,
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub borrower_id: Option<Option<i32>>,
    pub status: Option<LoanStatus>,
}

impl UpdateBookInstance {
    /// Applies the submitted fields on top of the stored copy
    pub fn apply(self, mut instance: BookInstance) -> Result<BookInstance, FieldErrors> {
        form::check(&self).ensure_empty()?;
        if let Some(book_id) = self.book_id {
            instance.book_id = Some(book_id);
        }
        if let Some(imprint) = self.imprint {
            instance.imprint = imprint;
        }
        if let Some(due_back) = self.due_back {
            instance.due_back = due_back;
        }
        if let Some(borrower_id) = self.borrower_id {
            instance.borrower_id = borrower_id;
        }
        if let Some(status) = self.status {
            instance.status = status;
        }
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn copy(due_back: Option<NaiveDate>) -> BookInstance {
        BookInstance {
            id: Uuid::new_v4(),
            book_id: Some(1),
            imprint: "Penguin, 1999".to_string(),
            due_back,
            borrower_id: None,
            status: LoanStatus::OnLoan,
        }
    }

    #[test]
    fn test_overdue_only_strictly_before_today() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(copy(Some(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap())).is_overdue_on(today));
        assert!(!copy(Some(today)).is_overdue_on(today));
        assert!(!copy(Some(NaiveDate::from_ymd_opt(2024, 5, 11).unwrap())).is_overdue_on(today));
        assert!(!copy(None).is_overdue_on(today));
    }

    #[test]
    fn test_status_codes() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ] {
            assert_eq!(LoanStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(LoanStatus::from("x".to_string()), LoanStatus::Maintenance);
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }

    #[test]
    fn test_update_clears_borrower_with_null() {
        let mut original = copy(None);
        original.borrower_id = Some(7);

        let update: UpdateBookInstance =
            serde_json::from_str(r#"{"borrower_id": null, "status": "available"}"#).unwrap();
        let updated = update.apply(original.clone()).unwrap();
        assert_eq!(updated.borrower_id, None);
        assert_eq!(updated.status, LoanStatus::Available);

        let untouched: UpdateBookInstance = serde_json::from_str("{}").unwrap();
        assert_eq!(untouched.apply(original.clone()).unwrap(), original);
    }
}
