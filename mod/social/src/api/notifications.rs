use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use agora_core::ServiceError;

use crate::api::AppState;
use crate::model::NotificationListQuery;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications/{user_id}", get(list))
        .route("/notifications/{user_id}/unread-count", get(unread_count))
        .route("/notifications/{user_id}/read-all", post(read_all))
        .route("/notifications/entry/{id}/read", post(mark_read))
}

async fn list(
    State(svc): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = svc
        .list_notifications(&user_id, &query)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn unread_count(
    State(svc): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let count = svc.unread_count(&user_id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "count": count })))
}

async fn mark_read(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let notification = svc
        .mark_notification_read(&id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(notification).unwrap()))
}

async fn read_all(
    State(svc): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let updated = svc.mark_all_read(&user_id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
