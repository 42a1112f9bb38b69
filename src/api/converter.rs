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

//! Conversions from megalodon entities to Hiveway models

use megalodon::entities;

use crate::models::{
    Account, Application, Attachment, AttachmentType, Card, Mention, Status, Tag, Visibility,
};

/// Convert a megalodon Status
pub fn convert_status(status: &entities::Status) -> Status {
    Status {
        id: status.id.clone(),
        uri: status.uri.clone(),
        url: status.url.clone(),
        account: convert_account(&status.account),
        content: status.content.clone(),
        spoiler_text: status.spoiler_text.clone(),
        visibility: convert_visibility(&status.visibility),
        sensitive: status.sensitive,
        created_at: status.created_at,
        mentions: status.mentions.iter().map(convert_mention).collect(),
        media_attachments: status.media_attachments.iter().map(convert_attachment).collect(),
        tags: status.tags.iter().map(convert_tag).collect(),
        reblogs_count: status.reblogs_count as u64,
        favourites_count: status.favourites_count as u64,
        replies_count: status.replies_count as u64,
        reblog: status.reblog.as_ref().map(|r| Box::new(convert_status(r))),
        application: status.application.as_ref().map(convert_application),
        card: status.card.as_ref().map(convert_card),
        reblogged: status.reblogged,
        favourited: status.favourited,
    }
}

/// Convert a megalodon Account
pub fn convert_account(account: &entities::Account) -> Account {
    Account {
        id: account.id.clone(),
        username: account.username.clone(),
        acct: account.acct.clone(),
        display_name: account.display_name.clone(),
        url: account.url.clone(),
        avatar: account.avatar.clone(),
    }
}

fn convert_visibility(visibility: &entities::StatusVisibility) -> Visibility {
    match visibility {
        entities::StatusVisibility::Public => Visibility::Public,
        entities::StatusVisibility::Unlisted => Visibility::Unlisted,
        entities::StatusVisibility::Private => Visibility::Private,
        entities::StatusVisibility::Direct => Visibility::Direct,
        // Local-only posts reply as unlisted
        entities::StatusVisibility::Local => Visibility::Unlisted,
    }
}

fn convert_attachment(media: &entities::Attachment) -> Attachment {
    Attachment {
        id: media.id.clone(),
        attachment_type: convert_attachment_type(&media.r#type),
        url: media.url.clone(),
        preview_url: media.preview_url.clone(),
        description: media.description.clone(),
    }
}

fn convert_attachment_type(media_type: &entities::attachment::AttachmentType) -> AttachmentType {
    match media_type {
        entities::attachment::AttachmentType::Image => AttachmentType::Image,
        entities::attachment::AttachmentType::Video => AttachmentType::Video,
        entities::attachment::AttachmentType::Gifv => AttachmentType::Gifv,
        _ => AttachmentType::Unknown,
    }
}

fn convert_tag(tag: &entities::status::Tag) -> Tag {
    Tag {
        name: tag.name.clone(),
        url: tag.url.clone(),
    }
}

fn convert_mention(mention: &entities::Mention) -> Mention {
    Mention {
        id: mention.id.clone(),
        username: mention.username.clone(),
        acct: mention.acct.clone(),
        url: mention.url.clone(),
    }
}

fn convert_application(app: &entities::Application) -> Application {
    Application {
        name: app.name.clone(),
        website: app.website.clone(),
    }
}

fn convert_card(card: &entities::Card) -> Card {
    Card {
        url: card.url.clone(),
        title: card.title.clone(),
        description: card.description.clone(),
        image: card.image.clone(),
        width: card.width.unwrap_or(0),
        height: card.height.unwrap_or(0),
    }
}

/// Plain-text rendering of status HTML: paragraph and line breaks become
/// newlines, other tags are dropped, named and numeric entities are decoded.
pub fn strip_html(html: &str) -> String {
    let html = html
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p><p>", "\n\n");

    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    html_escape::decode_html_entities(&result).replace('\u{a0}', " ")
}
