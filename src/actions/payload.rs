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

//! Share, report and reply payload builders
//!
//! Pure functions over the actionable status.

use serde::{Deserialize, Serialize};

use crate::api::strip_html;
use crate::models::{Status, Visibility};
use crate::session::SessionContext;

pub const TEXT_PLAIN: &str = "text/plain";

/// Content handed to the system share sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub text: String,
    pub mime_type: String,
}

/// Parameters of the report screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub account_id: String,
    pub account_username: String,
    pub status_id: String,
    /// Status content as HTML markup
    pub status_content: String,
}

/// Prefill for the compose screen when replying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeIntent {
    pub in_reply_to_id: String,
    pub reply_visibility: Visibility,
    pub content_warning: String,
    pub mentioned_usernames: Vec<String>,
    pub replying_status_author: String,
    pub replying_status_content: String,
}

/// `"{acct} - {content}"` as plain text
pub fn share_text(status: &Status) -> SharePayload {
    let actionable = status.actionable_status();
    SharePayload {
        text: format!("{} - {}", actionable.account.acct, strip_html(&actionable.content)),
        mime_type: TEXT_PLAIN.to_string(),
    }
}

pub fn share_link(status: &Status) -> SharePayload {
    SharePayload {
        text: status.actionable_status().link().to_string(),
        mime_type: TEXT_PLAIN.to_string(),
    }
}

/// Url placed on the clipboard
pub fn copy_link(status: &Status) -> String {
    status.actionable_status().link().to_string()
}

pub fn report(status: &Status) -> ReportPayload {
    let actionable = status.actionable_status();
    ReportPayload {
        account_id: actionable.account.id.clone(),
        account_username: actionable.account.acct.clone(),
        status_id: actionable.id.clone(),
        status_content: actionable.content.clone(),
    }
}

/// Reply prefill. Mentions start with the author, follow the status'
/// mention order, skip duplicates and never include the logged-in user.
pub fn reply(status: &Status, session: &SessionContext) -> ComposeIntent {
    let actionable = status.actionable_status();

    let candidates = std::iter::once(&actionable.account.acct)
        .chain(actionable.mentions.iter().map(|m| &m.acct));

    let mut mentioned_usernames: Vec<String> = Vec::new();
    for username in candidates {
        if session.username.as_deref() == Some(username.as_str()) {
            continue;
        }
        if !mentioned_usernames.contains(username) {
            mentioned_usernames.push(username.clone());
        }
    }

    ComposeIntent {
        in_reply_to_id: actionable.id.clone(),
        reply_visibility: actionable.visibility,
        content_warning: actionable.spoiler_text.clone(),
        mentioned_usernames,
        replying_status_author: actionable.account.username.clone(),
        replying_status_content: strip_html(&actionable.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;

    #[test]
    fn share_text_joins_author_and_plain_content() {
        let post = status("1", account("10", "alice@remote.example"));
        let payload = share_text(&post);
        assert_eq!(payload.text, "alice@remote.example - Hello world");
        assert_eq!(payload.mime_type, TEXT_PLAIN);
    }

    #[test]
    fn share_and_copy_link_use_original_status_url() {
        let wrapper = reblog("2", account("20", "bob"), status("1", account("10", "alice")));
        assert_eq!(share_link(&wrapper).text, "https://example.social/@alice/1");
        assert_eq!(copy_link(&wrapper), "https://example.social/@alice/1");
    }

    #[test]
    fn report_keeps_html_markup() {
        let wrapper = reblog("2", account("20", "bob"), status("1", account("10", "alice")));
        assert_eq!(
            report(&wrapper),
            ReportPayload {
                account_id: "10".to_string(),
                account_username: "alice".to_string(),
                status_id: "1".to_string(),
                status_content: "<p>Hello <b>world</b></p>".to_string(),
            }
        );
    }

    #[test]
    fn reply_excludes_own_username_everywhere() {
        let mut post = status("1", account("10", "alice"));
        post.mentions = vec![mention("me"), mention("carol@other.example"), mention("me")];
        post.spoiler_text = "spoilers".to_string();
        post.visibility = Visibility::Private;

        let intent = reply(&post, &SessionContext::new("42", "me"));
        assert_eq!(intent.mentioned_usernames, vec!["alice", "carol@other.example"]);
        assert_eq!(intent.in_reply_to_id, "1");
        assert_eq!(intent.reply_visibility, Visibility::Private);
        assert_eq!(intent.content_warning, "spoilers");
        assert_eq!(intent.replying_status_content, "Hello world");
    }

    #[test]
    fn reply_to_own_status_drops_self_as_author() {
        let mut post = status("1", account("42", "me"));
        post.mentions = vec![mention("dave")];

        let intent = reply(&post, &SessionContext::new("42", "me"));
        assert_eq!(intent.mentioned_usernames, vec!["dave"]);
        assert_eq!(intent.replying_status_author, "me");
    }

    #[test]
    fn reply_collapses_duplicate_mentions() {
        let mut post = status("1", account("10", "alice"));
        post.mentions = vec![mention("alice"), mention("bob"), mention("bob")];

        let intent = reply(&post, &SessionContext::anonymous());
        assert_eq!(intent.mentioned_usernames, vec!["alice", "bob"]);
    }

    #[test]
    fn reply_to_reblog_targets_original() {
        let wrapper = reblog("2", account("20", "bob"), status("1", account("10", "alice")));
        let intent = reply(&wrapper, &SessionContext::new("42", "me"));
        assert_eq!(intent.in_reply_to_id, "1");
        assert_eq!(intent.mentioned_usernames, vec!["alice"]);
    }
}
