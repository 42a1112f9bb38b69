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

//! Error taxonomy for the presentation core

use serde_json::json;
use thiserror::Error;

use crate::actions::Action;
use crate::models::{error_codes, IpcError};

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    #[error("Row {position} is out of range for a list of {len}")]
    RowOutOfRange { position: usize, len: usize },

    #[error("Action {0:?} is not available for this status")]
    ActionNotAvailable(Action),

    #[error("Media index {index} is out of range for {len} urls")]
    MediaIndexOutOfRange { index: usize, len: usize },

    /// A request to the instance failed
    #[error("{0:#}")]
    Api(#[from] anyhow::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl CoreError {
    /// IPC error code reported to the UI
    pub fn code(&self) -> i32 {
        match self {
            CoreError::NotAuthenticated => error_codes::NOT_AUTHENTICATED,
            CoreError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            CoreError::UnknownScreen(_) => error_codes::UNKNOWN_SCREEN,
            CoreError::RowOutOfRange { .. } => error_codes::ROW_OUT_OF_RANGE,
            CoreError::ActionNotAvailable(_) => error_codes::ACTION_NOT_AVAILABLE,
            CoreError::MediaIndexOutOfRange { .. } => error_codes::MEDIA_OUT_OF_RANGE,
            CoreError::Api(_) => error_codes::API_ERROR,
            CoreError::Cancelled => error_codes::CANCELLED,
            CoreError::Storage(_) => error_codes::STORAGE_ERROR,
            CoreError::Config(_) => error_codes::INTERNAL_ERROR,
        }
    }
}

impl From<CoreError> for IpcError {
    fn from(err: CoreError) -> Self {
        let data = match &err {
            CoreError::RowOutOfRange { position, len } => {
                Some(json!({ "position": position, "len": len }))
            }
            CoreError::MediaIndexOutOfRange { index, len } => {
                Some(json!({ "index": index, "len": len }))
            }
            CoreError::ActionNotAvailable(action) => Some(json!({ "action": action })),
            _ => None,
        };

        let ipc = IpcError::new(err.code(), err.to_string());
        match data {
            Some(data) => ipc.with_data(data),
            None => ipc,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::InvalidParams(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_context_chain() {
        let err: CoreError = anyhow::anyhow!("connection reset")
            .context("Failed to mute account")
            .into();
        assert_eq!(err.code(), error_codes::API_ERROR);
        assert_eq!(err.to_string(), "Failed to mute account: connection reset");
    }

    #[test]
    fn converts_to_ipc_error() {
        let ipc: IpcError = CoreError::ActionNotAvailable(Action::Delete).into();
        assert_eq!(ipc.code, error_codes::ACTION_NOT_AVAILABLE);
        assert!(ipc.message.contains("Delete"));
    }

    #[test]
    fn range_errors_carry_data() {
        let ipc: IpcError = CoreError::RowOutOfRange { position: 7, len: 3 }.into();
        assert_eq!(ipc.code, error_codes::ROW_OUT_OF_RANGE);
        assert_eq!(ipc.data.unwrap()["len"], 3);
    }
}
