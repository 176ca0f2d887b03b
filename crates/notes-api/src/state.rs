use std::sync::Arc;

use notes_core::{ModelGateway, SessionStore};

use crate::services::{AnalysisService, ChatService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    pub analysis: AnalysisService,
}

impl AppState {
    /// Wire both services to the same gateway.
    pub fn new(gateway: Arc<dyn ModelGateway>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            chat: ChatService::new(gateway.clone(), store),
            analysis: AnalysisService::new(gateway),
        }
    }
}
