use super::domain::SourceKind;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Transport failure while fetching an upstream payload.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// One upstream that yields an array of raw records per call.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Which adapter the records are meant for.
    fn kind(&self) -> SourceKind;

    async fn fetch(&self) -> Result<Vec<Value>, TransportError>;
}

/// `GET`s a JSON array from an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    kind: SourceKind,
}

impl HttpRecordSource {
    pub fn new(kind: SourceKind, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key,
            kind,
        }
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self) -> Result<Vec<Value>, TransportError> {
        let mut request = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        let records = records_from_payload(payload)?;
        debug!(url = %self.url, count = records.len(), "fetched upstream records");
        Ok(records)
    }
}

/// Accepts a bare array or an object wrapping one under `data`/`items`.
pub(crate) fn records_from_payload(payload: Value) -> Result<Vec<Value>, TransportError> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => ["data", "items"]
            .into_iter()
            .find_map(|key| match map.remove(key) {
                Some(Value::Array(records)) => Some(records),
                _ => None,
            })
            .ok_or_else(|| TransportError::Malformed("expected an array of records".to_string())),
        other => Err(TransportError::Malformed(format!(
            "expected an array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
