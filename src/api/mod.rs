pub mod books;
pub mod borrowings;
pub mod error;
pub mod health;
pub mod lookup;
pub mod members;
pub mod reports;

use axum::{
    Router,
    routing::{get, put},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route("/books/isbn/:isbn", get(books::get_book_by_isbn))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Members
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route("/members/search", get(members::search_members))
        .route(
            "/members/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // Circulation
        .route(
            "/borrowings",
            get(borrowings::list_borrowings).post(borrowings::borrow_book),
        )
        .route("/borrowings/:id", get(borrowings::get_borrowing))
        .route("/borrowings/:id/return", put(borrowings::return_book))
        // Reports
        .route("/reports/borrowed", get(reports::borrowed_books))
        .route("/reports/overdue", get(reports::overdue_books))
        .route("/reports/members/:id", get(reports::member_history))
        // Lookup
        .route("/lookup/:isbn", get(lookup::lookup_book))
        .with_state(state)
}
