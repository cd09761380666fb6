//! Circulation API handlers: borrow, return, list

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{BorrowingFilter, BorrowingStatus, DomainError};
use crate::infrastructure::AppState;
use crate::models::{BorrowRequest, BorrowingDetail};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBorrowingsQuery {
    /// `active` (default), `returned` or `all`
    pub status: Option<String>,
    pub member_id: Option<i32>,
    pub book_id: Option<i32>,
}

impl ListBorrowingsQuery {
    fn into_filter(self) -> Result<BorrowingFilter, DomainError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => BorrowingStatus::default(),
            Some(s) => s.parse()?,
        };

        Ok(BorrowingFilter {
            status,
            member_id: self.member_id,
            book_id: self.book_id,
            due_before: None,
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/borrowings",
    params(ListBorrowingsQuery),
    responses(
        (status = 200, description = "Borrowings, newest first"),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn list_borrowings(
    State(state): State<AppState>,
    Query(query): Query<ListBorrowingsQuery>,
) -> impl IntoResponse {
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return e.into_response(),
    };

    match state.circulation.list(filter).await {
        Ok(borrowings) => {
            let total = borrowings.len();
            Json(json!({ "borrowings": borrowings, "total": total })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/borrowings",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Copy lent", body = BorrowingDetail),
        (status = 404, description = "Unknown book or member"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    Json(payload): Json<BorrowRequest>,
) -> impl IntoResponse {
    match state
        .circulation
        .borrow(payload.book_id, payload.member_id)
        .await
    {
        Ok(borrowing) => (
            StatusCode::CREATED,
            Json(json!({
                "borrowing": borrowing,
                "message": "Book borrowed successfully"
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/borrowings/{id}",
    params(("id" = i32, Path, description = "Borrowing id")),
    responses(
        (status = 200, description = "The borrowing", body = BorrowingDetail),
        (status = 404, description = "Unknown borrowing")
    )
)]
pub async fn get_borrowing(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.circulation.get(id).await {
        Ok(borrowing) => (StatusCode::OK, Json(json!({ "borrowing": borrowing }))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/borrowings/{id}/return",
    params(("id" = i32, Path, description = "Borrowing id")),
    responses(
        (status = 200, description = "Copy returned, fine computed", body = BorrowingDetail),
        (status = 404, description = "Unknown borrowing"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.circulation.return_borrowing(id).await {
        Ok(borrowing) => (
            StatusCode::OK,
            Json(json!({
                "borrowing": borrowing,
                "message": "Book returned successfully"
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
