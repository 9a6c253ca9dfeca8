//! Catalog management service: books, authors, genres and languages

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorDetail, CreateAuthor, UpdateAuthor},
        book::{BookDetail, BookForm, BookFormChoices, BookSummary, CreateBook, UpdateBook},
        book_instance::LoanStatus,
        form,
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, Language},
        page::{Page, Pagination},
    },
    repository::Repository,
};

pub const BOOKS_PER_PAGE: i64 = 5;
pub const AUTHORS_PER_PAGE: i64 = 5;

/// Catalog-wide counters shown on the home page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn ready(&self) -> AppResult<()> {
        self.repository.ping().await
    }

    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.instances.count().await?,
            num_instances_available: self
                .repository
                .instances
                .count_with_status(LoanStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
        })
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    pub async fn list_books(&self, page: Option<i64>) -> AppResult<Page<BookSummary>> {
        let total = self.repository.books.count().await?;
        let pagination = Pagination::resolve(page, BOOKS_PER_PAGE, total)?;
        let books = self
            .repository
            .books
            .list(pagination.limit(), pagination.offset())
            .await?;
        Ok(pagination.into_page(books))
    }

    /// Get book with its author, language, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.repository.books.get_by_id(id).await?;
        let author = match book.author_id {
            Some(author_id) => self.repository.authors.find_by_id(author_id).await?,
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => self.repository.languages.find_by_id(language_id).await?,
            None => None,
        };
        let genres = self.repository.genres.list_for_book(id).await?;
        let copies = self.repository.instances.list_for_book(id).await?;
        Ok(BookDetail::new(book, author, language, genres, copies))
    }

    /// Form context for creating (`None`) or updating a book
    pub async fn book_form(&self, id: Option<i32>) -> AppResult<BookForm> {
        let initial = match id {
            Some(id) => Some(self.get_book(id).await?),
            None => None,
        };
        Ok(BookForm {
            initial,
            choices: BookFormChoices {
                authors: self.repository.authors.list_all().await?,
                genres: self.repository.genres.list().await?,
                languages: self.repository.languages.list().await?,
            },
        })
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<BookDetail> {
        book.validate_fields().into_result()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, "book created");
        self.get_book(created.id).await
    }

    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<BookDetail> {
        let current = self.repository.books.get_by_id(id).await?;
        let changes = update.apply(current).map_err(AppError::Form)?;
        self.repository.books.update(&changes).await?;
        tracing::info!(book_id = id, "book updated");
        self.get_book(id).await
    }

    /// Fails with `Conflict` while copies of the book exist
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn list_authors(&self, page: Option<i64>) -> AppResult<Page<Author>> {
        let total = self.repository.authors.count().await?;
        let pagination = Pagination::resolve(page, AUTHORS_PER_PAGE, total)?;
        let authors = self
            .repository
            .authors
            .list(pagination.limit(), pagination.offset())
            .await?;
        Ok(pagination.into_page(authors))
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Get author with the books they wrote
    pub async fn get_author_detail(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.books.list_by_author(id).await?;
        Ok(AuthorDetail {
            display_name: author.display_name(),
            author,
            books,
        })
    }

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        author.validate_fields().into_result()?;
        let created = self.repository.authors.create(&author).await?;
        tracing::info!(author_id = created.id, "author created");
        Ok(created)
    }

    pub async fn update_author(&self, id: i32, update: UpdateAuthor) -> AppResult<Author> {
        let current = self.repository.authors.get_by_id(id).await?;
        let author = update.apply(current).map_err(AppError::Form)?;
        let updated = self.repository.authors.update(&author).await?;
        tracing::info!(author_id = id, "author updated");
        Ok(updated)
    }

    /// Books by the author remain, without an author
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "author deleted");
        Ok(())
    }

    // =========================================================================
    // GENRES & LANGUAGES
    // =========================================================================

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        form::check(&genre).into_result()?;
        let created = self.repository.genres.create(&genre).await?;
        tracing::info!(genre_id = created.id, name = %created.name, "genre created");
        Ok(created)
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await?;
        tracing::info!(genre_id = id, "genre deleted");
        Ok(())
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn create_language(&self, language: CreateLanguage) -> AppResult<Language> {
        form::check(&language).into_result()?;
        let created = self.repository.languages.create(&language).await?;
        tracing::info!(language_id = created.id, name = %created.name, "language created");
        Ok(created)
    }

    /// Books in the language remain, without a language
    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        self.repository.languages.delete(id).await?;
        tracing::info!(language_id = id, "language deleted");
        Ok(())
    }
}
