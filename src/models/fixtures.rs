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

//! Shared builders for unit tests

use chrono::Utc;

use super::{Account, Mention, Status, Visibility};

pub fn account(id: &str, acct: &str) -> Account {
    let username = acct.split('@').next().unwrap_or(acct).to_string();
    Account {
        id: id.to_string(),
        username,
        acct: acct.to_string(),
        display_name: format!("{} display", acct),
        url: format!("https://example.social/@{}", acct),
        avatar: format!("https://example.social/avatars/{}.png", id),
    }
}

pub fn status(id: &str, author: Account) -> Status {
    Status {
        id: id.to_string(),
        uri: format!("https://example.social/users/{}/statuses/{}", author.username, id),
        url: Some(format!("https://example.social/@{}/{}", author.username, id)),
        account: author,
        content: "<p>Hello <b>world</b></p>".to_string(),
        spoiler_text: String::new(),
        visibility: Visibility::Public,
        sensitive: false,
        created_at: Utc::now(),
        mentions: Vec::new(),
        media_attachments: Vec::new(),
        tags: Vec::new(),
        reblogs_count: 0,
        favourites_count: 0,
        replies_count: 0,
        reblog: None,
        application: None,
        card: None,
        reblogged: Some(false),
        favourited: Some(false),
    }
}

pub fn reblog(id: &str, booster: Account, original: Status) -> Status {
    let mut wrapper = status(id, booster);
    wrapper.content = String::new();
    wrapper.reblog = Some(Box::new(original));
    wrapper
}

pub fn mention(acct: &str) -> Mention {
    Mention {
        id: format!("id-{}", acct),
        username: acct.split('@').next().unwrap_or(acct).to_string(),
        acct: acct.to_string(),
        url: format!("https://example.social/@{}", acct),
    }
}
