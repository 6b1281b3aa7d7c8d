use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use agora_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{CreatePost, CreateReply, CreateRepost};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", get(get_post))
        .route("/posts/{id}/replies", get(list_replies).post(create_reply))
        .route("/posts/{id}/repost", post(create_repost))
        .route("/posts/{id}/like", post(like))
        .route("/posts/{id}/unlike", post(unlike))
        .route("/posts/{id}/likes", get(like_count))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikeRequest {
    user_id: String,
}

async fn create_post(
    State(svc): State<AppState>,
    Json(input): Json<CreatePost>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let post = svc.create_post(input).await.map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(post).unwrap())))
}

async fn list_posts(
    State(svc): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc.list_posts(&params).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn get_post(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let post = svc.get_post(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(post).unwrap()))
}

async fn create_reply(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateReply>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let reply = svc
        .create_reply(&id, input)
        .await
        .map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(reply).unwrap())))
}

async fn list_replies(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let replies = svc.list_replies(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "items": replies })))
}

async fn create_repost(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateRepost>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let repost = svc
        .create_repost(&id, input)
        .await
        .map_err(ServiceError::from)?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(repost).unwrap())))
}

async fn like(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<LikeRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let liked = svc
        .like_post(&id, &input.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "liked": liked })))
}

async fn unlike(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<LikeRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let removed = svc
        .unlike_post(&id, &input.user_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

async fn like_count(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let count = svc.like_count(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "count": count })))
}
