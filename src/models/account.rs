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

//! Account models: remote Mastodon accounts and the locally stored login

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Mastodon account as it appears on a status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Unique identifier
    pub id: String,

    /// Username (without domain)
    pub username: String,

    /// Full account name (user@domain, or user for local accounts)
    pub acct: String,

    pub display_name: String,

    /// URL to the profile page
    pub url: String,

    /// URL to the avatar image
    pub avatar: String,
}

impl Account {
    /// Name to show in a row header; falls back to the local username
    /// when the display name is blank.
    pub fn display_label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

/// The logged-in account, persisted by the account store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAccount {
    /// Remote account id on the instance
    pub account_id: String,

    /// Instance URL (e.g., "https://mastodon.social")
    pub instance_url: String,

    /// Account name as the instance reports it for the owner (bare username)
    pub acct: String,

    pub display_name: String,

    /// OAuth access token
    #[serde(skip_serializing, default)]
    pub access_token: String,

    /// When this account was added
    pub added_at: DateTime<Utc>,

    /// When this account was last used
    pub last_used_at: DateTime<Utc>,

    /// Whether this is the active account
    pub is_active: bool,
}
