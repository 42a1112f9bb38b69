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

//! Screen-open requests returned to the UI

use serde::{Deserialize, Serialize};

use crate::actions::{ComposeIntent, ReportPayload};
use crate::media::ViewerIntent;
use crate::models::Status;

/// A screen the UI should open, with its typed parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "screen")]
pub enum Navigation {
    Account { account_id: String },
    Tag { hashtag: String },
    Thread { status_id: String, url: String },
    Media(ViewerIntent),
    Compose(ComposeIntent),
    Report(ReportPayload),
    /// Hand a url to the external link opener
    OpenLink { url: String },
}

pub fn view_account(account_id: &str) -> Navigation {
    Navigation::Account {
        account_id: account_id.to_string(),
    }
}

pub fn view_tag(hashtag: &str) -> Navigation {
    Navigation::Tag {
        hashtag: hashtag.trim_start_matches('#').to_string(),
    }
}

/// Thread of the status actions would target
pub fn view_thread(status: &Status) -> Navigation {
    let actionable = status.actionable_status();
    Navigation::Thread {
        status_id: actionable.id.clone(),
        url: actionable.link().to_string(),
    }
}

/// Profile of whoever reblogged the status. Plain statuses open their
/// author.
pub fn open_reblog(status: Option<&Status>) -> Option<Navigation> {
    status.map(|s| view_account(&s.account.id))
}

pub fn open_link(url: &str) -> Navigation {
    Navigation::OpenLink {
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;

    #[test]
    fn thread_targets_reblogged_original() {
        let wrapper = reblog("2", account("20", "bob"), status("1", account("10", "alice")));
        match view_thread(&wrapper) {
            Navigation::Thread { status_id, url } => {
                assert_eq!(status_id, "1");
                assert_eq!(url, "https://example.social/@alice/1");
            }
            other => panic!("unexpected navigation {:?}", other),
        }
    }

    #[test]
    fn open_reblog_shows_booster_profile() {
        let wrapper = reblog("2", account("20", "bob"), status("1", account("10", "alice")));
        assert_eq!(open_reblog(Some(&wrapper)), Some(view_account("20")));
        assert_eq!(open_reblog(None), None);
    }

    #[test]
    fn tag_drops_leading_hash() {
        assert_eq!(
            view_tag("#rustlang"),
            Navigation::Tag {
                hashtag: "rustlang".to_string()
            }
        );
    }

    #[test]
    fn serializes_with_screen_tag() {
        let json = serde_json::to_value(open_link("https://x.example")).unwrap();
        assert_eq!(json["screen"], "open_link");
        assert_eq!(json["url"], "https://x.example");
    }
}
