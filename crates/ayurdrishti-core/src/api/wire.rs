//! JSON bodies exchanged with the backend.
//!
//! Every field is optional on the wire; the `From`/`TryFrom` impls below
//! apply the fallbacks so nothing downstream has to.

use serde::Deserialize;

use crate::models::{BackendStatus, ChatResult, Enrichment, IdentifyResult};

#[derive(Debug, Default, Deserialize)]
pub struct IdentifyResponse {
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub common_names: Option<Vec<String>>,
    #[serde(default)]
    pub enriched: Option<EnrichedResponse>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub genus: Option<String>,
    #[serde(default)]
    pub raw_provider: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnrichedResponse {
    #[serde(default)]
    pub medicinal_uses: Option<Vec<String>>,
    #[serde(default)]
    pub contraindications: Option<Vec<String>>,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub disclaimer: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub mock: bool,
}

/// Error body the backend sends with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clean_list(values: Option<Vec<String>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl From<EnrichedResponse> for Enrichment {
    fn from(wire: EnrichedResponse) -> Self {
        Self {
            medicinal_uses: clean_list(wire.medicinal_uses),
            contraindications: clean_list(wire.contraindications),
            common_name: non_blank(wire.common_name),
            notes: non_blank(wire.notes),
            source: non_blank(wire.source),
        }
    }
}

impl From<IdentifyResponse> for IdentifyResult {
    fn from(wire: IdentifyResponse) -> Self {
        Self {
            scientific_name: non_blank(wire.scientific_name),
            confidence: wire.confidence.filter(|c| c.is_finite()),
            common_names: clean_list(wire.common_names),
            enrichment: wire.enriched.map(Enrichment::from),
            family: non_blank(wire.family),
            genus: non_blank(wire.genus),
            raw_provider: non_blank(wire.raw_provider),
            message: non_blank(wire.message),
        }
    }
}

impl From<ChatResponse> for ChatResult {
    fn from(wire: ChatResponse) -> Self {
        Self {
            answer: wire.answer,
            disclaimer: wire.disclaimer.unwrap_or_default(),
            lang: non_blank(wire.lang),
        }
    }
}

impl From<StatusResponse> for BackendStatus {
    fn from(wire: StatusResponse) -> Self {
        Self {
            ok: wire.ok,
            service: non_blank(wire.service),
            mock: wire.mock,
        }
    }
}

/// Human-readable detail for a failed response body.
pub fn error_detail(body: &str) -> String {
    if let Ok(err) = serde_json::from_str::<ErrorResponse>(body) {
        return err.error;
    }
    let trimmed = body.trim();
    trimmed.chars().take(200).collect()
}
