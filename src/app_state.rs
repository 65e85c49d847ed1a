use sqlx::PgPool;
use std::sync::Arc;

use crate::services::{
    ai::InferenceClient,
    mailer::Mailer,
    storage::DocumentStore,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: Arc<DocumentStore>,
    pub inference: Arc<InferenceClient>,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        storage: DocumentStore,
        inference: InferenceClient,
        mailer: Mailer,
    ) -> Self {
        Self {
            db,
            storage: Arc::new(storage),
            inference: Arc::new(inference),
            mailer: Arc::new(mailer),
        }
    }
}
