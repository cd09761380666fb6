use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::infrastructure::AppState;
use crate::services::lookup_isbn;

/// Local catalog first, then Open Library
#[utoipa::path(
    get,
    path = "/api/lookup/{isbn}",
    params(("isbn" = String, Path, description = "ISBN to look up")),
    responses(
        (status = 200, description = "`{source, book}` where source is `local` or `openlibrary`"),
        (status = 502, description = "Open Library unreachable or returned an error")
    )
)]
pub async fn lookup_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> impl IntoResponse {
    match lookup_isbn(state.book_repo.as_ref(), &state.openlibrary, &isbn).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
