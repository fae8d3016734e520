pub mod client;
pub mod wire;

pub use client::{ApiError, BackendClient, CHAT_PATH, IDENTIFY_PATH};
