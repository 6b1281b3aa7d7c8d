mod notifications;
mod posts;
mod users;

use std::sync::Arc;

use axum::Router;

use crate::service::SocialService;

/// Shared application state.
pub type AppState = Arc<SocialService>;

/// Build the complete social API router.
///
/// All routes are relative — the caller nests them under `/social`.
pub fn build_router(svc: Arc<SocialService>) -> Router {
    let api = Router::new()
        .merge(users::routes())
        .merge(posts::routes())
        .merge(notifications::routes());

    Router::new().nest("/social", api).with_state(svc)
}
