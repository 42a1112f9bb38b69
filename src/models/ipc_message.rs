// Hiveway - A Mastodon client
// Copyright (C) 2025 Hiveway Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! IPC envelope exchanged with the UI process, one JSON object per line

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of IPC message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Request,
    Response,
    Event,
}

/// An IPC message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// Unique message ID (UUID)
    pub id: String,

    /// Message type
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Method name for requests
    pub method: Option<String>,

    /// Parameters for requests
    pub params: Option<Value>,

    /// Result for responses
    pub result: Option<Value>,

    /// Error for failed responses
    pub error: Option<IpcError>,
}

impl IpcMessage {
    /// Create a new request message
    #[cfg(test)]
    pub fn request(method: &str, params: Option<Value>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type: MessageType::Request,
            method: Some(method.to_string()),
            params,
            result: None,
            error: None,
        }
    }

    /// Create a success response
    pub fn response_ok(id: &str, result: Value) -> Self {
        Self {
            id: id.to_string(),
            message_type: MessageType::Response,
            method: None,
            params: None,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn response_err(id: &str, error: IpcError) -> Self {
        Self {
            id: id.to_string(),
            message_type: MessageType::Response,
            method: None,
            params: None,
            result: None,
            error: Some(error),
        }
    }

    /// Create an event message
    pub fn event(method: &str, params: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type: MessageType::Event,
            method: Some(method.to_string()),
            params: Some(params),
            result: None,
            error: None,
        }
    }
}

/// Error in an IPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    pub data: Option<Value>,
}

impl IpcError {
    /// Create a new error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Add data to the error
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Standard error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application-specific errors
    pub const NOT_AUTHENTICATED: i32 = -1001;
    pub const API_ERROR: i32 = -1004;
    pub const UNKNOWN_SCREEN: i32 = -1010;
    pub const ROW_OUT_OF_RANGE: i32 = -1011;
    pub const ACTION_NOT_AVAILABLE: i32 = -1012;
    pub const MEDIA_OUT_OF_RANGE: i32 = -1013;
    pub const CANCELLED: i32 = -1014;
    pub const STORAGE_ERROR: i32 = -1020;
}

/// IPC method names
pub mod methods {
    // Session
    pub const SESSION_OPEN: &str = "session.open";
    pub const SESSION_CLOSE: &str = "session.close";
    pub const SESSION_GET: &str = "session.get";
    pub const SETTINGS_SET: &str = "settings.set";

    // Screens
    pub const TIMELINE_LOAD: &str = "timeline.load";
    pub const SCREEN_CLOSE: &str = "screen.close";

    // Rows
    pub const STATUS_RENDER: &str = "status.render";
    pub const STATUS_ACTIONS: &str = "status.actions";
    pub const STATUS_ACTION: &str = "status.action";
    pub const STATUS_REBLOG: &str = "status.reblog";
    pub const STATUS_UNREBLOG: &str = "status.unreblog";
    pub const STATUS_FAVOURITE: &str = "status.favourite";
    pub const STATUS_UNFAVOURITE: &str = "status.unfavourite";
    pub const STATUS_REPLY: &str = "status.reply";
    pub const STATUS_THREAD: &str = "status.thread";
    pub const STATUS_OPEN_REBLOG: &str = "status.open_reblog";

    // Navigation
    pub const MEDIA_VIEW: &str = "media.view";
    pub const CARD_OPEN: &str = "card.open";
    pub const ACCOUNT_VIEW: &str = "account.view";
    pub const TAG_VIEW: &str = "tag.view";

    // System
    pub const PING: &str = "ping";
    pub const SHUTDOWN: &str = "shutdown";
}

/// Event names pushed to every connected UI
pub mod events {
    pub const ACCOUNT_MUTED: &str = "event.account_muted";
    pub const ACCOUNT_BLOCKED: &str = "event.account_blocked";
    pub const STATUS_DELETED: &str = "event.status_deleted";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_err_carries_code_and_no_result() {
        let msg = IpcMessage::response_err("abc", IpcError::new(error_codes::CANCELLED, "gone"));
        assert_eq!(msg.id, "abc");
        assert_eq!(msg.message_type, MessageType::Response);
        assert!(msg.result.is_none());
        assert_eq!(msg.error.map(|e| e.code), Some(error_codes::CANCELLED));
    }

    #[test]
    fn message_type_serializes_under_type_key() {
        let msg = IpcMessage::event(events::ACCOUNT_MUTED, serde_json::json!({ "account_id": "9" }));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "event");
        assert_eq!(json["method"], events::ACCOUNT_MUTED);
    }
}
