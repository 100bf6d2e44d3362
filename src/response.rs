//! `{msg, code, data}` envelope shared by every endpoint.
//!
//! The HTTP status is always 200; `code` carries the business outcome.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub const CODE_OK: u16 = 200;
pub const CODE_FAILED: u16 = 400;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub msg: String,
    pub code: u16,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(msg: &str, data: T) -> Json<Self> {
        Json(Self {
            msg: msg.to_string(),
            code: CODE_OK,
            data,
        })
    }
}

impl Envelope<serde_json::Value> {
    pub fn failed(msg: &str) -> Json<Self> {
        Json(Self {
            msg: msg.to_string(),
            code: CODE_FAILED,
            data: serde_json::json!({}),
        })
    }
}

/// Handler failure. All variants render as `code: 400` with an empty `data`
/// object; they differ only in how they are logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{msg}: {reason}")]
    Invalid { msg: &'static str, reason: String },
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{msg}: {cause:#}")]
    Storage {
        msg: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn invalid(msg: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            msg,
            reason: reason.into(),
        }
    }

    pub fn storage(msg: &'static str, cause: anyhow::Error) -> Self {
        Self::Storage { msg, cause }
    }

    /// Message reported to the client.
    pub fn msg(&self) -> &'static str {
        match self {
            ApiError::Invalid { msg, .. } | ApiError::Storage { msg, .. } => *msg,
            ApiError::NotFound(msg) => *msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage { cause, .. } => {
                error!(error = %format!("{cause:#}"), "storage failure")
            }
            other => warn!(reason = %other, "request rejected"),
        }
        Envelope::failed(self.msg()).into_response()
    }
}
