use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use agora_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::UpsertUser;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", put(upsert_user))
        .route("/users/suggest", get(suggest_users))
        .route("/users/{uid}", get(get_user))
        .route("/users/{uid}/mentions", get(posts_mentioning))
        .route("/users/{uid}/followers", get(list_followers))
        .route("/users/{uid}/follow", post(follow))
        .route("/users/{uid}/unfollow", post(unfollow))
}

#[derive(Deserialize)]
struct SuggestQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowRequest {
    follower_id: String,
}

async fn upsert_user(
    State(svc): State<AppState>,
    Json(input): Json<UpsertUser>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.upsert_user(input).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(user).unwrap()))
}

/// Mention-suggestion search. Resolution failures degrade to an empty
/// list inside the service, so this endpoint never errors on lookup
/// problems.
async fn suggest_users(
    State(svc): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Json<serde_json::Value> {
    let users = svc.search_users(&query.q);
    Json(serde_json::json!({ "items": users }))
}

async fn get_user(
    State(svc): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(&uid).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(user).unwrap()))
}

async fn posts_mentioning(
    State(svc): State<AppState>,
    Path(uid): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc
        .list_posts_mentioning(&uid, &params)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn list_followers(
    State(svc): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let followers = svc.list_followers(&uid).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "items": followers })))
}

async fn follow(
    State(svc): State<AppState>,
    Path(uid): Path<String>,
    Json(input): Json<FollowRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let followed = svc
        .follow_user(&input.follower_id, &uid)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "followed": followed })))
}

async fn unfollow(
    State(svc): State<AppState>,
    Path(uid): Path<String>,
    Json(input): Json<FollowRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let removed = svc
        .unfollow_user(&input.follower_id, &uid)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}
