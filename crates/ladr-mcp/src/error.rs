//! MCP error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON-RPC 2.0 error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Server-defined: the named tool is not registered
    ToolNotFound,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ToolNotFound => -32000,
        }
    }
}

/// Error object carried in a JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }
}

/// Errors raised while handling an MCP request
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl McpError {
    pub fn code(&self) -> ErrorCode {
        match self {
            McpError::ParseError(_) => ErrorCode::ParseError,
            McpError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            McpError::MethodNotFound(_) => ErrorCode::MethodNotFound,
            McpError::InvalidParams(_) => ErrorCode::InvalidParams,
            McpError::ToolNotFound(_) => ErrorCode::ToolNotFound,
            McpError::InternalError(_) => ErrorCode::InternalError,
        }
    }

    /// Short name reported in the `type` field of tool error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            McpError::ParseError(_) => "ParseError",
            McpError::InvalidRequest(_) => "InvalidRequest",
            McpError::MethodNotFound(_) => "MethodNotFound",
            McpError::InvalidParams(_) => "InvalidParams",
            McpError::ToolNotFound(_) => "ToolNotFound",
            McpError::InternalError(_) => "InternalError",
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        JsonRpcError::new(err.code(), err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::InternalError(err.to_string())
    }
}
