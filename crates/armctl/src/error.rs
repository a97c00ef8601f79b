// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the control plane, and its HTTP envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error kinds that can cross the HTTP boundary or terminate a worker.
#[derive(Debug, Clone)]
pub enum ControlPlaneError {
    InvalidInput(String),
    Busy,
    SafetyRejected,
    HardwareError(String),
    TtsError(String),
    Cancelled,
}

impl ControlPlaneError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Busy => StatusCode::CONFLICT,
            Self::HardwareError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TtsError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Internal-only kinds never reach the HTTP boundary directly;
            // they're absorbed into a terminal Status first.
            Self::SafetyRejected | Self::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid",
            Self::Busy => "busy",
            Self::HardwareError(_) => "hardware_error",
            Self::TtsError(_) => "tts_error",
            Self::SafetyRejected => "safety_rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidInput(m) => m.clone(),
            Self::Busy => "another command is active".to_owned(),
            Self::HardwareError(m) => m.clone(),
            Self::TtsError(m) => m.clone(),
            Self::SafetyRejected => "safety check failed".to_owned(),
            Self::Cancelled => "interrupted by go home".to_owned(),
        }
    }

    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_owned(),
            http: self.http_status().as_u16(),
            message: self.message(),
        }
    }
}

impl fmt::Display for ControlPlaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ControlPlaneError {}

impl IntoResponse for ControlPlaneError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let body = ErrorResponse { error: self.to_error_body() };
        (status, Json(body)).into_response()
    }
}

/// Top-level error response envelope: `{error:{code, http, message}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error body with machine-readable code, HTTP status, and a human message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub http: u16,
    pub message: String,
}
