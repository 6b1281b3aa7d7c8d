//! Social module — posts, replies, reposts, reactions, mentions and
//! notification fan-out.
//!
//! # Resources
//!
//! - **User** — directory record, read-mostly (registration lives elsewhere)
//! - **Post** — authored content with an embedded tag set
//! - **Reply** — threaded under a post, with its own tag set
//! - **Repost** — a post variant embedding a snapshot of its original
//! - **Notification** — in-app fan-out record, plus a best-effort email
//!
//! # Usage
//!
//! ```ignore
//! use social::{SocialModule, service::SocialConfig};
//!
//! let module = SocialModule::new(db, mailer, SocialConfig::default())?;
//! let router = module.routes(); // Mount under /social
//! ```

pub mod api;
pub mod mentions;
pub mod model;
pub mod service;
pub mod tags;

use std::sync::Arc;

use axum::Router;

use agora_core::Module;

use crate::service::{SocialConfig, SocialService};

/// Social module implementing the Module trait.
///
/// Holds the SocialService and provides HTTP routes for all social
/// endpoints.
pub struct SocialModule {
    service: Arc<SocialService>,
}

impl SocialModule {
    /// Create a new SocialModule.
    pub fn new(
        db: Arc<dyn agora_sql::DocStore>,
        mailer: Arc<dyn agora_mail::Mailer>,
        config: SocialConfig,
    ) -> Result<Self, agora_core::ServiceError> {
        let service = SocialService::new(db, mailer, config)
            .map_err(agora_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying SocialService.
    pub fn service(&self) -> &Arc<SocialService> {
        &self.service
    }
}

impl Module for SocialModule {
    fn name(&self) -> &str {
        "social"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
