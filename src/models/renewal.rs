//! Loan renewal date rules and the renewal form

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::book_instance::BookInstance;
use super::form::{FieldErrors, INVALID_DATE, REQUIRED};

/// Latest accepted renewal, counted from today
pub const MAX_RENEWAL_WEEKS: i64 = 4;
/// Renewal proposed to librarians when the form is first shown
pub const DEFAULT_RENEWAL_WEEKS: i64 = 3;

pub const RENEWAL_DATE_FIELD: &str = "renewal_date";

/// Current calendar date in the server's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenewalDateError {
    #[error("Invalid date - renewal in past")]
    PastDate,
    #[error("Invalid date - renewal more than 4 weeks ahead")]
    TooFarAhead,
}

/// Checks a proposed renewal date against today's date
pub fn validate_renewal_date(candidate: NaiveDate) -> Result<NaiveDate, RenewalDateError> {
    validate_renewal_date_on(candidate, today())
}

/// Same as [`validate_renewal_date`] with an explicit "today"
pub fn validate_renewal_date_on(
    candidate: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, RenewalDateError> {
    if candidate < today {
        return Err(RenewalDateError::PastDate);
    }
    if candidate > today + Duration::weeks(MAX_RENEWAL_WEEKS) {
        return Err(RenewalDateError::TooFarAhead);
    }
    Ok(candidate)
}

pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(DEFAULT_RENEWAL_WEEKS)
}

/// Submitted renewal form (`application/x-www-form-urlencoded`)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RenewBookForm {
    /// New due date, `YYYY-MM-DD`
    pub renewal_date: Option<String>,
}

impl RenewBookForm {
    /// Parses and validates the submitted date against `today`
    pub fn clean(&self, today: NaiveDate) -> Result<NaiveDate, FieldErrors> {
        let raw = match self.renewal_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(FieldErrors::single(RENEWAL_DATE_FIELD, REQUIRED)),
        };

        let candidate = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| FieldErrors::single(RENEWAL_DATE_FIELD, INVALID_DATE))?;

        validate_renewal_date_on(candidate, today)
            .map_err(|e| FieldErrors::single(RENEWAL_DATE_FIELD, &e.to_string()))
    }
}

/// Renewal form as shown to the librarian, with any field errors
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalFormState {
    /// Value to display in the date field
    pub renewal_date: Option<String>,
    pub help_text: String,
    pub errors: FieldErrors,
}

/// Everything needed to display the renewal page for one copy
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalPage {
    pub book_instance: BookInstance,
    pub book_title: Option<String>,
    pub form: RenewalFormState,
}

impl RenewalPage {
    pub fn initial(book_instance: BookInstance, book_title: Option<String>, today: NaiveDate) -> Self {
        Self {
            book_instance,
            book_title,
            form: RenewalFormState {
                renewal_date: Some(default_renewal_date(today).format("%Y-%m-%d").to_string()),
                help_text: help_text(),
                errors: FieldErrors::new(),
            },
        }
    }

    pub fn with_errors(
        book_instance: BookInstance,
        book_title: Option<String>,
        submitted: RenewBookForm,
        errors: FieldErrors,
    ) -> Self {
        Self {
            book_instance,
            book_title,
            form: RenewalFormState {
                renewal_date: submitted.renewal_date,
                help_text: help_text(),
                errors,
            },
        }
    }
}

fn help_text() -> String {
    format!(
        "Enter a date between now and {} weeks (default {}).",
        MAX_RENEWAL_WEEKS, DEFAULT_RENEWAL_WEEKS
    )
}
