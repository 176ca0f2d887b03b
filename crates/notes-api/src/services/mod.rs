//! Service layer for business logic.

pub mod analysis_service;
pub mod chat_service;
pub mod session_store;

pub use analysis_service::AnalysisService;
pub use chat_service::ChatService;
pub use session_store::InMemorySessionStore;
