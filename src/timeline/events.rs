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

//! Local event bus between screens
//!
//! Mute, block and delete outcomes are published here so every open
//! screen can drop the affected rows without refetching.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{events, IpcMessage};

const BUS_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TimelineEvent {
    MuteAccount { account_id: String },
    BlockAccount { account_id: String },
    StatusDeleted { status_id: String },
}

impl TimelineEvent {
    /// IPC event forwarded to connected UIs
    pub fn to_ipc(&self) -> IpcMessage {
        match self {
            TimelineEvent::MuteAccount { account_id } => {
                IpcMessage::event(events::ACCOUNT_MUTED, json!({ "account_id": account_id }))
            }
            TimelineEvent::BlockAccount { account_id } => {
                IpcMessage::event(events::ACCOUNT_BLOCKED, json!({ "account_id": account_id }))
            }
            TimelineEvent::StatusDeleted { status_id } => {
                IpcMessage::event(events::STATUS_DELETED, json!({ "status_id": status_id }))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TimelineEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: TimelineEvent) {
        debug!("Publishing {:?}", event);
        // No subscribers is fine: nothing else is on screen
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
