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

//! Status model representing a Mastodon status/toot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Account, Attachment, Card};

/// Visibility level for a status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
    Direct,
}

/// Application that posted the status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub website: Option<String>,
}

/// A Mastodon status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    /// Unique identifier for this status
    pub id: String,

    /// URI of the status (ActivityPub)
    pub uri: String,

    /// URL to the status' HTML representation
    pub url: Option<String>,

    /// The account that authored this status
    pub account: Account,

    /// HTML content
    pub content: String,

    /// Content warning text (empty when none)
    #[serde(default)]
    pub spoiler_text: String,

    #[serde(default)]
    pub visibility: Visibility,

    #[serde(default)]
    pub sensitive: bool,

    pub created_at: DateTime<Utc>,

    /// Accounts mentioned in the status, in order of appearance
    #[serde(default)]
    pub mentions: Vec<Mention>,

    /// Media attachments, in display order
    #[serde(default)]
    pub media_attachments: Vec<Attachment>,

    /// Hashtags used in the status
    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub reblogs_count: u64,

    #[serde(default)]
    pub favourites_count: u64,

    #[serde(default)]
    pub replies_count: u64,

    /// The wrapped status when this one is a reblog
    pub reblog: Option<Box<Status>>,

    /// Application used to post this
    pub application: Option<Application>,

    /// Link preview card
    pub card: Option<Card>,

    /// Whether the current user has reblogged this
    pub reblogged: Option<bool>,

    /// Whether the current user has favourited this
    pub favourited: Option<bool>,
}

impl Status {
    /// The status every action targets: the reblogged original for a
    /// reblog wrapper, the status itself otherwise.
    pub fn actionable_status(&self) -> &Status {
        match &self.reblog {
            Some(original) => original.actionable_status(),
            None => self,
        }
    }

    /// Id of [`Status::actionable_status`]
    pub fn actionable_id(&self) -> &str {
        &self.actionable_status().id
    }

    pub fn is_reblog(&self) -> bool {
        self.reblog.is_some()
    }

    /// Link to the status, falling back to the ActivityPub URI for servers
    /// that omit the HTML url.
    pub fn link(&self) -> &str {
        self.url.as_deref().unwrap_or(&self.uri)
    }
}

/// A hashtag used in a status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub url: String,
}

/// An account mentioned in a status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mention {
    pub id: String,
    pub username: String,
    pub acct: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use crate::models::fixtures::*;

    #[test]
    fn actionable_status_resolves_reblog_wrapper() {
        let original = status("1", account("10", "alice"));
        let wrapper = reblog("2", account("20", "bob"), original);

        assert_eq!(wrapper.actionable_id(), "1");
        assert_eq!(wrapper.actionable_status().account.id, "10");
        assert!(wrapper.is_reblog());
    }

    #[test]
    fn actionable_status_of_plain_status_is_itself() {
        let plain = status("7", account("10", "alice"));
        assert_eq!(plain.actionable_id(), "7");
        assert!(!plain.is_reblog());
    }

    #[test]
    fn link_falls_back_to_uri() {
        let mut plain = status("7", account("10", "alice"));
        plain.url = None;
        assert_eq!(plain.link(), plain.uri);
    }
}
