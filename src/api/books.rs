//! Catalog API handlers using repository pattern

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::api::error::ensure_positive_id;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::{Book, BookInput};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring to look for
    pub q: Option<String>,
}

impl SearchQuery {
    pub(crate) fn term(&self) -> Result<&str, DomainError> {
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => Ok(q),
            _ => Err(DomainError::validation("query parameter 'q' is required")),
        }
    }
}

fn book_list(books: Vec<Book>) -> Response {
    let total = books.len();
    Json(json!({
        "books": books,
        "total": total
    }))
    .into_response()
}

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "All books ordered by title")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> impl IntoResponse {
    match state.book_repo.find_all().await {
        Ok(books) => book_list(books),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Books whose title, author or ISBN contain q"),
        (status = 400, description = "Missing or blank q")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let term = match query.term() {
        Ok(term) => term,
        Err(e) => return e.into_response(),
    };

    match state.book_repo.search(term).await {
        Ok(books) => book_list(books),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/isbn/{isbn}",
    params(("isbn" = String, Path, description = "Full or partial ISBN")),
    responses(
        (status = 200, description = "The single matching book", body = Book),
        (status = 404, description = "No book matches"),
        (status = 409, description = "More than one book matches")
    )
)]
pub async fn get_book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> impl IntoResponse {
    match state.book_repo.find_by_isbn(isbn.trim()).await {
        Ok(book) => (StatusCode::OK, Json(json!({ "book": book }))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book added"),
        (status = 400, description = "Invalid book")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return e.into_response();
    }

    match state.book_repo.create(input).await {
        Ok(book) => {
            tracing::info!("Book {} added: {}", book.id, book.title);
            (
                StatusCode::CREATED,
                Json(json!({
                    "book": book,
                    "message": "Book created successfully"
                })),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "Unknown book")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    if let Err(e) = ensure_positive_id("book", id) {
        return e.into_response();
    }

    match state.book_repo.find_by_id(id).await {
        Ok(Some(book)) => (StatusCode::OK, Json(json!({ "book": book }))).into_response(),
        Ok(None) => DomainError::not_found(format!("book {}", id)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book replaced"),
        (status = 400, description = "Invalid book"),
        (status = 404, description = "Unknown book")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<BookInput>,
) -> impl IntoResponse {
    if let Err(e) = ensure_positive_id("book", id).and_then(|_| input.validate()) {
        return e.into_response();
    }

    match state.book_repo.update(id, input).await {
        Ok(book) => (
            StatusCode::OK,
            Json(json!({
                "book": book,
                "message": "Book updated successfully"
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book and its borrowing history deleted"),
        (status = 404, description = "Unknown book")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    if let Err(e) = ensure_positive_id("book", id) {
        return e.into_response();
    }

    match state.book_repo.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"message": "Book deleted successfully"})),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
