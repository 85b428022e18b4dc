use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

/// JSON body shared by every exposed operation: `{status, data}` or `{status, message}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Symbols dropped from a ranking because their fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            message: None,
            failed: None,
        }
    }

    pub fn ranked(data: T, failed_count: usize) -> Self {
        Self {
            failed: (failed_count > 0).then_some(failed_count),
            ..Self::success(data)
        }
    }

    pub fn failure(err: &AppError) -> Self {
        Self {
            status: Status::Failure,
            data: None,
            message: Some(err.to_string()),
            failed: None,
        }
    }
}

impl Envelope<()> {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            data: None,
            message: Some(message.into()),
            failed: None,
        }
    }
}
