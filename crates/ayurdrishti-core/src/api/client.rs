use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::wire::{self, ChatResponse, IdentifyResponse, StatusResponse};
use crate::config::ApiBase;
use crate::models::{BackendStatus, ChatRequest, ChatResult, IdentifyRequest, IdentifyResult};

pub const IDENTIFY_PATH: &str = "/api/identify";
pub const CHAT_PATH: &str = "/api/ayurveda-chat";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The task driving the request died before producing a response.
    #[error("request interrupted: {0}")]
    Interrupted(String),
}

/// HTTP client for the AyurDrishti backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base: ApiBase,
}

impl BackendClient {
    pub fn new(base: ApiBase) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    pub async fn identify(&self, request: &IdentifyRequest) -> Result<IdentifyResult, ApiError> {
        let url = self.base.endpoint(IDENTIFY_PATH);

        let file = Part::bytes(request.image.bytes.clone())
            .file_name(request.image.file_name.clone())
            .mime_str(request.image.mime)?;
        let form = Form::new()
            .part("file", file)
            .text("organ", request.organ.as_str());

        debug!(
            %url,
            file = %request.image.file_name,
            bytes = request.image.bytes.len(),
            organ = %request.organ,
            "sending identify request"
        );

        let response = self.client.post(&url).multipart(form).send().await?;
        let body: IdentifyResponse = Self::decode(response).await?;
        Ok(body.into())
    }

    pub async fn ayurveda_chat(&self, request: &ChatRequest) -> Result<ChatResult, ApiError> {
        let url = self.base.endpoint(CHAT_PATH);
        let form = Form::new().text("message", request.message.clone());

        debug!(%url, chars = request.message.chars().count(), "sending chat request");

        let response = self.client.post(&url).multipart(form).send().await?;
        let body: ChatResponse = Self::decode(response).await?;
        Ok(body.into())
    }

    /// Query the backend root endpoint.
    pub async fn status(&self) -> Result<BackendStatus, ApiError> {
        let url = self.base.endpoint("/");
        let response = self.client.get(&url).send().await?;
        let body: StatusResponse = Self::decode(response).await?;
        Ok(body.into())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let detail = wire::error_detail(&text);
            warn!(%status, %detail, "backend request failed");
            return Err(ApiError::Status { status, detail });
        }

        debug!(%status, bytes = text.len(), "backend responded");
        Ok(serde_json::from_str(&text)?)
    }
}
