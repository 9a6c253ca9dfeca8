//! Loan management service: borrowed-book lists, renewals and copies

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{BookInstance, CreateBookInstance, LoanedCopy, UpdateBookInstance},
        page::{Page, Pagination},
        renewal::{self, RenewBookForm, RenewalPage},
    },
    repository::Repository,
};

pub const LOANS_PER_PAGE: i64 = 10;

/// Result of a renewal submission
#[derive(Debug)]
pub enum RenewalOutcome {
    /// Due date stored
    Renewed(BookInstance),
    /// Form rejected; nothing was written
    Invalid(RenewalPage),
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies on loan to one user, soonest due first
    pub async fn my_loans(&self, user_id: i32, page: Option<i64>) -> AppResult<Page<LoanedCopy>> {
        self.loans_page(Some(user_id), page).await
    }

    /// Every copy on loan, soonest due first
    pub async fn all_loans(&self, page: Option<i64>) -> AppResult<Page<LoanedCopy>> {
        self.loans_page(None, page).await
    }

    async fn loans_page(&self, borrower_id: Option<i32>, page: Option<i64>) -> AppResult<Page<LoanedCopy>> {
        let total = self.repository.instances.count_on_loan(borrower_id).await?;
        let pagination = Pagination::resolve(page, LOANS_PER_PAGE, total)?;
        let today = renewal::today();
        let rows = self
            .repository
            .instances
            .list_on_loan(borrower_id, pagination.limit(), pagination.offset())
            .await?;
        let loans = rows.into_iter().map(|row| row.into_loaned_copy(today)).collect();
        Ok(pagination.into_page(loans))
    }

    pub async fn get_copy(&self, id: Uuid) -> AppResult<BookInstance> {
        self.repository.instances.get_by_id(id).await
    }

    async fn get_copy_with_title(&self, id: Uuid) -> AppResult<(BookInstance, Option<String>)> {
        let copy = self.repository.instances.get_by_id(id).await?;
        let title = match copy.book_id {
            Some(book_id) => Some(self.repository.books.get_by_id(book_id).await?.title),
            None => None,
        };
        Ok((copy, title))
    }

    /// Renewal form pre-filled with the default renewal date
    pub async fn renewal_page(&self, id: Uuid) -> AppResult<RenewalPage> {
        let (copy, title) = self.get_copy_with_title(id).await?;
        Ok(RenewalPage::initial(copy, title, renewal::today()))
    }

    /// Validate the submitted date and store it as the new due date
    pub async fn renew(&self, id: Uuid, form: RenewBookForm) -> AppResult<RenewalOutcome> {
        self.renew_on(id, form, renewal::today()).await
    }

    pub async fn renew_on(&self, id: Uuid, form: RenewBookForm, today: NaiveDate) -> AppResult<RenewalOutcome> {
        let (copy, title) = self.get_copy_with_title(id).await?;

        match form.clean(today) {
            Ok(due_back) => {
                let renewed = self.repository.instances.set_due_back(id, due_back).await?;
                tracing::info!(book_instance = %id, %due_back, "loan renewed");
                Ok(RenewalOutcome::Renewed(renewed))
            }
            Err(errors) => {
                tracing::debug!(book_instance = %id, ?errors, "renewal rejected");
                Ok(RenewalOutcome::Invalid(RenewalPage::with_errors(copy, title, form, errors)))
            }
        }
    }

    pub async fn create_copy(&self, copy: CreateBookInstance) -> AppResult<BookInstance> {
        copy.validate_fields().into_result()?;
        let created = self.repository.instances.create(&copy).await?;
        tracing::info!(book_instance = %created.id, book_id = ?created.book_id, "book instance created");
        Ok(created)
    }

    pub async fn update_copy(&self, id: Uuid, update: UpdateBookInstance) -> AppResult<BookInstance> {
        let current = self.repository.instances.get_by_id(id).await?;
        let copy = update.apply(current).map_err(AppError::Form)?;
        let updated = self.repository.instances.update(&copy).await?;
        tracing::info!(book_instance = %id, status = %updated.status, "book instance updated");
        Ok(updated)
    }

    /// Returns the book the deleted copy belonged to
    pub async fn delete_copy(&self, id: Uuid) -> AppResult<Option<i32>> {
        let book_id = self.repository.instances.delete(id).await?;
        tracing::info!(book_instance = %id, "book instance deleted");
        Ok(book_id)
    }
}
