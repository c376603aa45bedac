use dex_protocol::ErrorEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize, Clone)]
pub struct CommandRequest {
    pub action: CommandAction,
    #[serde(default = "empty_payload")]
    pub payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    Search,
    Types,
}

impl CommandAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandAction::Search => "search",
            CommandAction::Types => "types",
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl CommandResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }

    pub fn error(code: ErrorCode, message: String, meta: ResponseMeta) -> Self {
        Self {
            status: CommandStatus::Error,
            message: Some(message.clone()),
            error: Some(ErrorEnvelope {
                code: code.as_str().to_string(),
                message,
                details: None,
                hint: code.hint().map(str::to_string),
            }),
            data: Value::Null,
            meta,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidRequest,
    Internal,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid_request",
            ErrorCode::Internal => "internal",
        }
    }

    const fn hint(self) -> Option<&'static str> {
        match self {
            ErrorCode::InvalidRequest => Some(
                "Check the action name and payload fields (query, type, minAttack, maxAttack, minDefense, maxDefense, minHp, maxHp, minSpeed, maxSpeed, limit, searchMode).",
            ),
            ErrorCode::Internal => None,
        }
    }
}

/// Request rejected before it reached the search core.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidRequest(pub String);

pub fn classify_error(err: &anyhow::Error) -> ErrorCode {
    if err.chain().any(|cause| cause.is::<InvalidRequest>()) {
        ErrorCode::InvalidRequest
    } else {
        ErrorCode::Internal
    }
}

#[derive(Debug, Default)]
pub struct CommandOutcome {
    pub data: Value,
    pub meta: ResponseMeta,
}
