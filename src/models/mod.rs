//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod form;
pub mod genre;
pub mod language;
pub mod page;
pub mod permission;
pub mod renewal;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail};
pub use book::{Book, BookDetail, BookSummary};
pub use book_instance::{BookInstance, LoanStatus, LoanedCopy};
pub use form::FieldErrors;
pub use genre::Genre;
pub use language::Language;
pub use page::{Page, PageQuery, Pagination};
pub use permission::Permission;
pub use user::{User, UserClaims};
