//! OpenAPI schema wrappers shared across handlers.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Error envelope documented for every failure response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    pub code: String,
    /// Human-readable error message.
    #[schema(example = "amount must be a positive integer")]
    pub message: String,
    /// Correlation identifier for tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Supplementary structured details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
