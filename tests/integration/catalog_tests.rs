//! Database-backed workflow tests
//!
//! Each test gets a fresh database from `#[sqlx::test]`; run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use chrono::{Duration, Local};
use sqlx::PgPool;

use catalog_server::{
    config::AppConfig,
    error::AppError,
    models::{
        author::CreateAuthor,
        book::{CreateBook, UpdateBook},
        book_instance::{CreateBookInstance, LoanStatus},
        genre::CreateGenre,
        language::CreateLanguage,
        renewal::{RenewBookForm, RENEWAL_DATE_FIELD},
        user::CreateUser,
    },
    services::{loans::RenewalOutcome, redis::RedisService},
    AppState,
};

fn state(pool: PgPool) -> AppState {
    let redis = RedisService::open("redis://127.0.0.1:1").expect("redis client");
    AppState::new(AppConfig::default(), pool, redis)
}

async fn seed_book(state: &AppState, isbn: &str) -> (i32, i32) {
    let catalog = &state.services.catalog;
    let author = catalog
        .create_author(CreateAuthor {
            first_name: "Frank".to_string(),
            last_name: "Herbert".to_string(),
            date_of_birth: None,
            date_of_death: None,
        })
        .await
        .unwrap();
    let genre = catalog
        .create_genre(CreateGenre {
            name: format!("Science Fiction {}", isbn),
        })
        .await
        .unwrap();
    let book = catalog
        .create_book(CreateBook {
            title: "Dune".to_string(),
            author_id: Some(author.id),
            summary: "Spice and sand.".to_string(),
            isbn: isbn.to_string(),
            genre_ids: vec![genre.id],
            language_id: None,
        })
        .await
        .unwrap();
    (author.id, book.book.id)
}

fn copy(book_id: i32, status: LoanStatus) -> CreateBookInstance {
    CreateBookInstance {
        book_id,
        imprint: "Chilton, 1965".to_string(),
        due_back: Some(Local::now().date_naive()),
        borrower_id: None,
        status,
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_author_delete_nulls_book_author(pool: PgPool) {
    let state = state(pool);
    let (author_id, book_id) = seed_book(&state, "9780441013593").await;

    state.services.catalog.delete_author(author_id).await.unwrap();

    let book = state.services.catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.book.author_id, None);
    assert!(book.author.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_language_delete_nulls_book_language(pool: PgPool) {
    let state = state(pool);
    let (_, book_id) = seed_book(&state, "9780441013593").await;
    let catalog = &state.services.catalog;
    let language = catalog
        .create_language(CreateLanguage {
            name: "English".to_string(),
        })
        .await
        .unwrap();
    let update = UpdateBook {
        language_id: Some(Some(language.id)),
        ..Default::default()
    };
    let book = catalog.update_book(book_id, update).await.unwrap();
    assert_eq!(book.language.as_ref().map(|l| l.id), Some(language.id));

    catalog.delete_language(language.id).await.unwrap();

    let book = catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.book.language_id, None);
    assert!(book.language.is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_genre_delete_unlinks_books(pool: PgPool) {
    let state = state(pool);
    let (_, book_id) = seed_book(&state, "9780441013593").await;
    let catalog = &state.services.catalog;
    let book = catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.genres.len(), 1);

    catalog.delete_genre(book.genres[0].id).await.unwrap();

    let book = catalog.get_book(book_id).await.unwrap();
    assert!(book.genres.is_empty());
    assert_eq!(book.display_genre, "");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_book_with_copies_cannot_be_deleted(pool: PgPool) {
    let state = state(pool);
    let (_, book_id) = seed_book(&state, "9780441013593").await;
    state
        .services
        .loans
        .create_copy(copy(book_id, LoanStatus::Available))
        .await
        .unwrap();

    let result = state.services.catalog.delete_book(book_id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let book = state.services.catalog.get_book(book_id).await.unwrap();
    assert_eq!(book.copies.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_duplicate_isbn_is_a_field_error(pool: PgPool) {
    let state = state(pool);
    let (author_id, _) = seed_book(&state, "9780441013593").await;
    let genres = state.services.catalog.list_genres().await.unwrap();

    let duplicate = state
        .services
        .catalog
        .create_book(CreateBook {
            title: "Dune Messiah".to_string(),
            author_id: Some(author_id),
            summary: "The sequel.".to_string(),
            isbn: "9780441013593".to_string(),
            genre_ids: vec![genres[0].id],
            language_id: None,
        })
        .await;
    match duplicate {
        Err(AppError::Form(errors)) => assert!(errors.get("isbn").is_some()),
        other => panic!("expected isbn error, got {:?}", other),
    }

    let fresh = state
        .services
        .catalog
        .create_book(CreateBook {
            title: "Dune Messiah".to_string(),
            author_id: Some(author_id),
            summary: "The sequel.".to_string(),
            isbn: "9780441172696".to_string(),
            genre_ids: vec![genres[0].id],
            language_id: None,
        })
        .await;
    assert!(fresh.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_unknown_genre_is_invalid_choice(pool: PgPool) {
    let state = state(pool);
    let (_, book_id) = seed_book(&state, "9780441013593").await;

    let result = state
        .services
        .catalog
        .update_book(
            book_id,
            UpdateBook {
                genre_ids: Some(vec![9999]),
                ..Default::default()
            },
        )
        .await;
    match result {
        Err(AppError::Form(errors)) => assert!(errors.get("genre_ids").is_some()),
        other => panic!("expected genre_ids error, got {:?}", other),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_renewal_window(pool: PgPool) {
    let state = state(pool);
    let (_, book_id) = seed_book(&state, "9780441013593").await;
    let loans = &state.services.loans;
    let on_loan = loans.create_copy(copy(book_id, LoanStatus::OnLoan)).await.unwrap();
    let today = Local::now().date_naive();

    let form = |date: chrono::NaiveDate| RenewBookForm {
        renewal_date: Some(date.format("%Y-%m-%d").to_string()),
    };

    match loans.renew_on(on_loan.id, form(today + Duration::days(14)), today).await.unwrap() {
        RenewalOutcome::Renewed(copy) => assert_eq!(copy.due_back, Some(today + Duration::days(14))),
        RenewalOutcome::Invalid(page) => panic!("renewal rejected: {:?}", page.form.errors),
    }

    for rejected in [today - Duration::days(1), today + Duration::days(35)] {
        match loans.renew_on(on_loan.id, form(rejected), today).await.unwrap() {
            RenewalOutcome::Invalid(page) => {
                assert!(page.form.errors.get(RENEWAL_DATE_FIELD).is_some());
            }
            RenewalOutcome::Renewed(_) => panic!("{} should be rejected", rejected),
        }
    }

    let stored = loans.get_copy(on_loan.id).await.unwrap();
    assert_eq!(stored.due_back, Some(today + Duration::days(14)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_loan_lists(pool: PgPool) {
    let state = state(pool);
    let (_, book_id) = seed_book(&state, "9780441013593").await;
    let reader = state
        .services
        .users
        .create_user(CreateUser {
            username: "reader".to_string(),
            password: "long-enough".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            is_superuser: false,
            permissions: vec![],
        })
        .await
        .unwrap();

    let loans = &state.services.loans;
    let mut borrowed = copy(book_id, LoanStatus::OnLoan);
    borrowed.borrower_id = Some(reader.id);
    borrowed.due_back = Some(Local::now().date_naive() - Duration::days(2));
    loans.create_copy(borrowed).await.unwrap();
    loans.create_copy(copy(book_id, LoanStatus::OnLoan)).await.unwrap();
    loans.create_copy(copy(book_id, LoanStatus::Available)).await.unwrap();

    let mine = loans.my_loans(reader.id, None).await.unwrap();
    assert_eq!(mine.total, 1);
    assert!(mine.items[0].is_overdue);
    assert_eq!(mine.items[0].book_title.as_deref(), Some("Dune"));

    let all = loans.all_loans(None).await.unwrap();
    assert_eq!(all.total, 2);
    assert_eq!(all.items[0].borrower.as_deref(), Some("reader"));

    assert!(matches!(loans.all_loans(Some(2)).await, Err(AppError::NotFound(_))));

    let counts = state.services.catalog.counts().await.unwrap();
    assert_eq!(counts.num_instances, 3);
    assert_eq!(counts.num_instances_available, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_login_issues_token_with_permissions(pool: PgPool) {
    let state = state(pool);
    let users = &state.services.users;
    users
        .create_user(CreateUser {
            username: "librarian".to_string(),
            password: "long-enough".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: Some("librarian@example.org".to_string()),
            is_superuser: false,
            permissions: vec!["catalog.can_mark_returned".to_string()],
        })
        .await
        .unwrap();

    let (_, claims) = users.authenticate("librarian", "long-enough").await.unwrap();
    assert_eq!(claims.permissions, vec!["catalog.can_mark_returned".to_string()]);

    assert!(matches!(
        users.authenticate("librarian", "wrong-password").await,
        Err(AppError::Authentication(_))
    ));
}
