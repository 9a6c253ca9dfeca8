//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, book_instances, books, genres, health, home, languages, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library Catalog API",
        version = "1.0.0",
        description = "Books, authors, copies and loans of a small lending library"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home
        home::index,
        // Auth
        auth::login_page,
        auth::login,
        auth::logout,
        auth::me,
        users::create_user,
        // Books
        books::list_books,
        books::get_book,
        books::create_form,
        books::create_book,
        books::update_form,
        books::update_book,
        books::delete_confirm,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_form,
        authors::create_author,
        authors::update_form,
        authors::update_author,
        authors::delete_confirm,
        authors::delete_author,
        // Loans
        loans::my_books,
        loans::all_borrowed,
        loans::renewal_form,
        loans::renew_book,
        // Copies
        book_instances::create_copy,
        book_instances::update_copy,
        book_instances::delete_copy,
        // Genres & languages
        genres::list_genres,
        genres::create_genre,
        genres::delete_genre,
        languages::list_languages,
        languages::create_language,
        languages::delete_language,
    ),
    components(
        schemas(
            // Auth
            auth::LoginPage,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::permission::Permission,
            // Catalog
            home::HomeResponse,
            crate::services::catalog::CatalogCounts,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetail,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookForm,
            crate::models::book::BookFormChoices,
            crate::models::author::Author,
            crate::models::author::AuthorDetail,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            // Copies & loans
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::LoanStatus,
            crate::models::book_instance::LoanedCopy,
            crate::models::book_instance::CreateBookInstance,
            crate::models::book_instance::UpdateBookInstance,
            crate::models::renewal::RenewBookForm,
            crate::models::renewal::RenewalFormState,
            crate::models::renewal::RenewalPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::models::form::FieldErrors,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Catalog summary"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "books", description = "Books"),
        (name = "authors", description = "Authors"),
        (name = "loans", description = "Borrowed copies and renewals"),
        (name = "book_instances", description = "Book copies"),
        (name = "genres", description = "Genres"),
        (name = "languages", description = "Languages")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
