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

//! Logged-in account context
//!
//! Read once when a session opens and handed to every dispatcher call.

use serde::{Deserialize, Serialize};

use crate::models::{Account, StoredAccount, Status};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Remote id of the logged-in account
    pub account_id: Option<String>,
    /// Account name of the logged-in user as it appears in mentions
    pub username: Option<String>,
}

impl SessionContext {
    pub fn new(account_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            username: Some(username.into()),
        }
    }

    /// Context with nobody logged in
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_account(account: &Account) -> Self {
        Self::new(&account.id, &account.acct)
    }

    pub fn from_stored(account: &StoredAccount) -> Self {
        Self::new(&account.account_id, &account.acct)
    }

    /// Whether the logged-in user authored the status actions would target
    pub fn is_owner(&self, status: &Status) -> bool {
        match &self.account_id {
            Some(id) => *id == status.actionable_status().account.id,
            None => false,
        }
    }
}
