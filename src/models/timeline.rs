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

//! Timeline requests and responses

use serde::{Deserialize, Serialize};

use super::Status;

/// Type of timeline a screen shows
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TimelineType {
    /// Statuses from followed accounts
    Home,
    /// Statuses from the instance
    Local,
    /// Statuses from all known instances
    Federated,
    /// Statuses with a specific hashtag
    Hashtag { tag: String },
    /// Statuses from a specific account
    Account { account_id: String },
    /// A status with its ancestors and descendants
    Thread { status_id: String },
}

impl TimelineType {
    /// Get a display name for this timeline type
    pub fn display_name(&self) -> String {
        match self {
            TimelineType::Home => "Home".to_string(),
            TimelineType::Local => "Local".to_string(),
            TimelineType::Federated => "Federated".to_string(),
            TimelineType::Hashtag { tag } => format!("#{}", tag),
            TimelineType::Account { account_id } => format!("Account: {}", account_id),
            TimelineType::Thread { status_id } => format!("Thread: {}", status_id),
        }
    }
}

/// Request to fetch a page of a timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRequest {
    pub timeline_type: TimelineType,
    /// Maximum number of statuses to return
    pub limit: Option<u32>,
    /// Return statuses older than this ID
    pub max_id: Option<String>,
    /// Return statuses newer than this ID
    pub since_id: Option<String>,
}

/// A fetched page of statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelinePage {
    pub statuses: Vec<Status>,
    /// ID of the newest status (for pagination)
    pub max_id: Option<String>,
    /// ID of the oldest status (for pagination)
    pub min_id: Option<String>,
    /// Whether there are more statuses available
    pub has_more: bool,
}

impl TimelinePage {
    /// Build a page from statuses in display order
    pub fn from_statuses(statuses: Vec<Status>, limit: u32) -> Self {
        let max_id = statuses.first().map(|s| s.id.clone());
        let min_id = statuses.last().map(|s| s.id.clone());
        let has_more = statuses.len() == limit as usize;

        Self {
            statuses,
            max_id,
            min_id,
            has_more,
        }
    }
}
