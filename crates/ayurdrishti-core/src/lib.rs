pub mod api;
pub mod chat;
pub mod config;
pub mod flow;
pub mod identify;
pub mod models;
pub mod organ;
pub mod present;
pub mod shell;

// Re-export main types for convenience
pub use api::{ApiError, BackendClient};
pub use chat::ChatFlow;
pub use config::{ApiBase, Config, DEFAULT_API_BASE};
pub use flow::{Phase, Settled, SubmitError, Submission, Ticket};
pub use identify::IdentifyFlow;
pub use models::{
    BackendStatus, ChatRequest, ChatResult, Enrichment, IdentifyRequest, IdentifyResult,
    ImageError, ImageUpload,
};
pub use organ::Organ;
pub use present::{ChatView, IdentifyView, LineKind, ViewLine, PLACEHOLDER};
pub use shell::{FlowKind, Shell};
