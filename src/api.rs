//! HTTP request and response bodies

use serde::{Deserialize, Serialize};

use crate::commands::FanSpeed;

/// Body of `POST /api/fan`
#[derive(Debug, Deserialize)]
pub struct FanRequest {
    /// Requested PWM duty; range-checked before use
    pub speed: i64,
}

/// Body of `GET /api/fan`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FanSpeedResponse {
    pub speed: u8,
}

impl From<FanSpeed> for FanSpeedResponse {
    fn from(speed: FanSpeed) -> Self {
        Self {
            speed: speed.value(),
        }
    }
}

/// Success envelope for write operations
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}
