//! Member API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::books::SearchQuery;
use crate::api::error::ensure_positive_id;
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::{Member, MemberInput};

#[utoipa::path(
    get,
    path = "/api/members",
    responses((status = 200, description = "All members ordered by name"))
)]
pub async fn list_members(State(state): State<AppState>) -> impl IntoResponse {
    match state.member_repo.find_all().await {
        Ok(members) => {
            let total = members.len();
            Json(json!({ "members": members, "total": total })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/members/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Members whose name or contact contain q"),
        (status = 400, description = "Missing or blank q")
    )
)]
pub async fn search_members(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let term = match query.term() {
        Ok(term) => term,
        Err(e) => return e.into_response(),
    };

    match state.member_repo.search(term).await {
        Ok(members) => {
            let total = members.len();
            Json(json!({ "members": members, "total": total })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/members",
    request_body = MemberInput,
    responses(
        (status = 201, description = "Member registered"),
        (status = 400, description = "Missing name")
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Json(input): Json<MemberInput>,
) -> impl IntoResponse {
    if let Err(e) = input.validate() {
        return e.into_response();
    }

    match state.member_repo.create(input).await {
        Ok(member) => (
            StatusCode::CREATED,
            Json(json!({
                "member": member,
                "message": "Member created successfully"
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "The member", body = Member),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn get_member(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    if let Err(e) = ensure_positive_id("member", id) {
        return e.into_response();
    }

    match state.member_repo.find_by_id(id).await {
        Ok(Some(member)) => (StatusCode::OK, Json(json!({ "member": member }))).into_response(),
        Ok(None) => DomainError::not_found(format!("member {}", id)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    request_body = MemberInput,
    responses(
        (status = 200, description = "Member replaced"),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<MemberInput>,
) -> impl IntoResponse {
    if let Err(e) = ensure_positive_id("member", id).and_then(|_| input.validate()) {
        return e.into_response();
    }

    match state.member_repo.update(id, input).await {
        Ok(member) => (
            StatusCode::OK,
            Json(json!({
                "member": member,
                "message": "Member updated successfully"
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    params(("id" = i32, Path, description = "Member id")),
    responses(
        (status = 200, description = "Member and their borrowings deleted"),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn delete_member(State(state): State<AppState>, Path(id): Path<i32>) -> impl IntoResponse {
    if let Err(e) = ensure_positive_id("member", id) {
        return e.into_response();
    }

    match state.member_repo.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"message": "Member deleted successfully"})),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
