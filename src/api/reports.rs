//! Circulation reports

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;

use crate::infrastructure::AppState;

#[utoipa::path(
    get,
    path = "/api/reports/borrowed",
    responses((status = 200, description = "Every borrowing still out"))
)]
pub async fn borrowed_books(State(state): State<AppState>) -> impl IntoResponse {
    match state.circulation.borrowed_report().await {
        Ok(borrowings) => {
            let total = borrowings.len();
            Json(json!({ "borrowings": borrowings, "total": total })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/reports/overdue",
    responses((status = 200, description = "Active borrowings past their due date"))
)]
pub async fn overdue_books(State(state): State<AppState>) -> impl IntoResponse {
    match state.circulation.overdue_report(Utc::now()).await {
        Ok(borrowings) => {
            let total = borrowings.len();
            Json(json!({
                "borrowings": borrowings,
                "total": total,
                "due_dates_tracked": state.circulation.policy().tracks_due_dates()
            }))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/reports/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "Full borrowing history of the member"),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn member_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.circulation.member_history(id).await {
        Ok(borrowings) => {
            let total = borrowings.len();
            let total_fines: f64 = borrowings.iter().map(|b| b.fine).sum();
            Json(json!({
                "member_id": id,
                "borrowings": borrowings,
                "total": total,
                "total_fines": total_fines
            }))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}
