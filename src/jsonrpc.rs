//! JSON-RPC 2.0 messages, as exchanged with the MCP client.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_valid(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }

    /// Notifications carry no id and get no response.
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub result: Value,
}

impl JsonRpcResponse {
    pub const fn new(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub id: Value,
    pub error: ErrorObject,
}

impl JsonRpcError {
    pub fn new<S: Into<String>>(id: Value, code: i32, message: S, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error: ErrorObject {
                code,
                message: message.into(),
                data,
            },
        }
    }

    pub fn parse_error<S: Into<String>>(details: S) -> Self {
        Self::new(
            Value::Null,
            PARSE_ERROR,
            "Parse error",
            Some(json!({"details": details.into()})),
        )
    }

    pub fn invalid_request<S: Into<String>>(id: Value, details: S) -> Self {
        Self::new(
            id,
            INVALID_REQUEST,
            "Invalid Request",
            Some(json!({"details": details.into()})),
        )
    }

    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::new(
            id,
            METHOD_NOT_FOUND,
            "Method not found",
            Some(json!({"method": method})),
        )
    }

    pub fn invalid_params<S: Into<String>>(id: Value, details: S) -> Self {
        Self::new(
            id,
            INVALID_PARAMS,
            "Invalid params",
            Some(json!({"details": details.into()})),
        )
    }
}

/// Anything written back to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Outgoing {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
}

impl From<JsonRpcResponse> for Outgoing {
    fn from(response: JsonRpcResponse) -> Self {
        Outgoing::Response(response)
    }
}

impl From<JsonRpcError> for Outgoing {
    fn from(error: JsonRpcError) -> Self {
        Outgoing::Error(error)
    }
}
