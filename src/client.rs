//! Translation service boundary.
//!
//! The service is stateless: each call carries the full text of one pane and
//! returns the full text of the other, plus any diagnostics the translator
//! raised. Retrying is not the client's business; the controller's idle poll
//! re-attempts naturally.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::sync::Direction;

pub const FORWARD_PATH: &str = "/dmnt_dism";
pub const REVERSE_PATH: &str = "/dmnt_asm";

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service at {endpoint} answered {code}")]
    Status { code: u16, endpoint: String },
    #[error("malformed translation response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("translation worker stopped before answering")]
    WorkerGone,
}

/// Result of one successful call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub diagnostics: Vec<String>,
}

impl Translation {
    pub fn new(text: impl Into<String>, diagnostics: Vec<String>) -> Self {
        Self {
            text: text.into(),
            diagnostics,
        }
    }
}

pub trait TranslationClient: Send + Sync {
    fn translate(&self, text: &str, direction: Direction) -> Result<Translation, TranslateError>;
}

#[derive(Debug, Deserialize)]
struct ForwardBody {
    #[serde(default, alias = "derivedText")]
    dism: String,
    #[serde(default, alias = "diagnostics")]
    errors: Vec<String>,
    #[serde(default)]
    success: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ReverseBody {
    #[serde(default, alias = "sourceText")]
    asm: String,
    #[serde(default, alias = "diagnostics")]
    errors: Vec<String>,
    #[serde(default)]
    success: Option<bool>,
}

/// Decode a service response body for `direction`.
pub fn decode_response(body: &str, direction: Direction) -> Result<Translation, TranslateError> {
    let (text, diagnostics, success) = match direction {
        Direction::SourceToDerived => {
            let body: ForwardBody = serde_json::from_str(body)?;
            (body.dism, body.errors, body.success)
        }
        Direction::DerivedToSource => {
            let body: ReverseBody = serde_json::from_str(body)?;
            (body.asm, body.errors, body.success)
        }
    };
    if success == Some(false) {
        tracing::debug!(%direction, count = diagnostics.len(), "service reported a partial parse");
    }
    Ok(Translation { text, diagnostics })
}

/// Talks to the Flask translation service over form-encoded POSTs.
#[derive(Debug)]
pub struct HttpTranslationClient {
    client: Client,
    server: String,
}

impl HttpTranslationClient {
    pub fn new(server: &str, timeout: Duration) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2).min(timeout))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            server: server.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, direction: Direction) -> String {
        let path = match direction {
            Direction::SourceToDerived => FORWARD_PATH,
            Direction::DerivedToSource => REVERSE_PATH,
        };
        format!("{}{}", self.server, path)
    }
}

impl TranslationClient for HttpTranslationClient {
    fn translate(&self, text: &str, direction: Direction) -> Result<Translation, TranslateError> {
        let endpoint = self.endpoint(direction);
        let response = self.client.post(&endpoint).form(&[("text", text)]).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Status {
                code: status.as_u16(),
                endpoint,
            });
        }
        let body = response.text()?;
        decode_response(&body, direction)
    }
}
