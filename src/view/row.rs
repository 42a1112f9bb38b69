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

//! Row rendering
//!
//! Every row kind starts from [`render_base`], parameterised by
//! [`RowCapabilities`]; the per-kind functions add their own fields.

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{CoreConfig, LayoutDimensions};
use crate::models::{Application, AttachmentType, Status};

use super::card::{render_card, CardView};
use super::NumberFormat;

/// Separator between the timestamp and the posting application
pub const APPLICATION_SEPARATOR: &str = "  \u{2022}  ";

/// What a row kind is allowed to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCapabilities {
    pub media_preview_enabled: bool,
    pub media_preview_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Timeline,
    Detailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPreview {
    pub attachment_type: AttachmentType,
    pub url: String,
    pub preview_url: Option<String>,
    pub description: Option<String>,
}

/// Fields shared by every row kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRow {
    /// Id of the row's status (the wrapper for reblogs)
    pub status_id: String,
    pub actionable_id: String,
    pub display_name: String,
    /// `@acct` of the author
    pub handle: String,
    pub avatar: String,
    /// HTML content, rendered by the UI's own pipeline
    pub content: String,
    pub spoiler_text: String,
    pub sensitive: bool,
    /// Display name of the account that reblogged the status
    pub reblogged_by: Option<String>,
    pub media: Vec<MediaPreview>,
    /// False shows a placeholder instead of preview images
    pub media_previews_shown: bool,
    pub media_preview_height: u32,
    pub reblogged: bool,
    pub favourited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRow {
    #[serde(flatten)]
    pub base: BaseRow,
    /// Short relative age such as `5m`
    pub timestamp: String,
}

/// Character range of the timestamp line that links somewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpan {
    pub start: usize,
    pub end: usize,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampInfo {
    pub text: String,
    pub link: Option<LinkSpan>,
    /// Link handling is enabled only when the line carries a link
    pub links_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedRow {
    #[serde(flatten)]
    pub base: BaseRow,
    pub reblogs: String,
    pub favourites: String,
    pub timestamp_info: TimestampInfo,
    pub card: Option<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RenderedRow {
    Timeline(TimelineRow),
    Detailed(DetailedRow),
}

/// Turns statuses into rows using the configured locale and layout
#[derive(Debug, Clone)]
pub struct RowRenderer {
    numbers: NumberFormat,
    layout: LayoutDimensions,
    media_preview_enabled: bool,
    utc_offset: Option<FixedOffset>,
}

impl RowRenderer {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            numbers: NumberFormat::for_locale(&config.locale),
            layout: config.layout,
            media_preview_enabled: config.media_preview_enabled,
            utc_offset: config
                .utc_offset_minutes
                .and_then(|minutes| minutes.checked_mul(60))
                .and_then(FixedOffset::east_opt),
        }
    }

    /// Creation time in the configured offset, or the system zone
    fn local_time(&self, created_at: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self.utc_offset {
            Some(offset) => created_at.with_timezone(&offset),
            None => {
                let local = created_at.with_timezone(&Local);
                local.with_timezone(local.offset())
            }
        }
    }

    pub fn render(&self, status: &Status, kind: RowKind, now: DateTime<Utc>) -> RenderedRow {
        match kind {
            RowKind::Timeline => RenderedRow::Timeline(self.render_timeline_row(status, now)),
            RowKind::Detailed => RenderedRow::Detailed(self.render_detailed_row(status)),
        }
    }

    pub fn render_timeline_row(&self, status: &Status, now: DateTime<Utc>) -> TimelineRow {
        let caps = RowCapabilities {
            media_preview_enabled: self.media_preview_enabled,
            media_preview_height: self.layout.media_preview_height,
        };

        TimelineRow {
            base: render_base(status, caps),
            timestamp: relative_time(status.actionable_status().created_at, now),
        }
    }

    pub fn render_detailed_row(&self, status: &Status) -> DetailedRow {
        let caps = RowCapabilities {
            media_preview_enabled: self.media_preview_enabled,
            media_preview_height: self.layout.detail_media_preview_height,
        };
        let actionable = status.actionable_status();

        DetailedRow {
            base: render_base(status, caps),
            reblogs: self.numbers.format(actionable.reblogs_count),
            favourites: self.numbers.format(actionable.favourites_count),
            timestamp_info: timestamp_info(
                self.local_time(actionable.created_at),
                actionable.application.as_ref(),
            ),
            card: render_card(actionable, &self.layout),
        }
    }
}

pub fn render_base(status: &Status, caps: RowCapabilities) -> BaseRow {
    let actionable = status.actionable_status();

    BaseRow {
        status_id: status.id.clone(),
        actionable_id: actionable.id.clone(),
        display_name: actionable.account.display_label().to_string(),
        handle: format!("@{}", actionable.account.acct),
        avatar: actionable.account.avatar.clone(),
        content: actionable.content.clone(),
        spoiler_text: actionable.spoiler_text.clone(),
        sensitive: actionable.sensitive,
        reblogged_by: status
            .is_reblog()
            .then(|| status.account.display_label().to_string()),
        media: actionable
            .media_attachments
            .iter()
            .map(|a| MediaPreview {
                attachment_type: a.attachment_type,
                url: a.url.clone(),
                preview_url: a.preview_url.clone(),
                description: a.description.clone(),
            })
            .collect(),
        media_previews_shown: caps.media_preview_enabled,
        media_preview_height: caps.media_preview_height,
        reblogged: actionable.reblogged.unwrap_or(false),
        favourited: actionable.favourited.unwrap_or(false),
    }
}

/// Absolute creation time followed by the posting application. The
/// application name links to its website when it has one.
pub fn timestamp_info(created_at: DateTime<FixedOffset>, app: Option<&Application>) -> TimestampInfo {
    let mut text = created_at.format("%b %-d, %Y %-I:%M %p").to_string();
    let mut link = None;

    if let Some(app) = app {
        text.push_str(APPLICATION_SEPARATOR);
        let start = text.chars().count();
        text.push_str(&app.name);

        link = app.website.as_ref().map(|url| LinkSpan {
            start,
            end: start + app.name.chars().count(),
            url: url.clone(),
        });
    }

    TimestampInfo {
        text,
        links_enabled: link.is_some(),
        link,
    }
}

/// Short age of a status (e.g., "5s", "3m", "2h", "4d", "Jan 05")
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(created_at);

    if age.num_seconds() < 60 {
        format!("{}s", age.num_seconds().max(0))
    } else if age.num_minutes() < 60 {
        format!("{}m", age.num_minutes())
    } else if age.num_hours() < 24 {
        format!("{}h", age.num_hours())
    } else if age.num_days() < 7 {
        format!("{}d", age.num_days())
    } else {
        created_at.format("%b %d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use crate::models::Card;
    use chrono::{Duration, TimeZone};

    fn renderer(locale: &str) -> RowRenderer {
        RowRenderer::new(&CoreConfig {
            locale: locale.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn detailed_counts_use_locale_grouping() {
        let mut post = status("1", account("10", "alice"));
        post.reblogs_count = 1_234;
        post.favourites_count = 5_678_901;

        let row = renderer("de-DE").render_detailed_row(&post);
        assert_eq!(row.reblogs, "1.234");
        assert_eq!(row.favourites, "5.678.901");
    }

    #[test]
    fn application_with_website_becomes_link() {
        let created = Utc.with_ymd_and_hms(2018, 1, 5, 15, 4, 0).unwrap().fixed_offset();
        let app = Application {
            name: "Hiveway".to_string(),
            website: Some("https://hiveway.example".to_string()),
        };

        let info = timestamp_info(created, Some(&app));
        assert_eq!(info.text, "Jan 5, 2018 3:04 PM  \u{2022}  Hiveway");
        assert!(info.links_enabled);

        let link = info.link.expect("link span");
        let linked: String = info.text.chars().skip(link.start).take(link.end - link.start).collect();
        assert_eq!(linked, "Hiveway");
        assert_eq!(link.url, "https://hiveway.example");
    }

    #[test]
    fn application_without_website_is_plain_text() {
        let created = Utc.with_ymd_and_hms(2018, 1, 5, 15, 4, 0).unwrap().fixed_offset();
        let app = Application {
            name: "Web".to_string(),
            website: None,
        };

        let info = timestamp_info(created, Some(&app));
        assert!(info.text.ends_with("  \u{2022}  Web"));
        assert!(!info.links_enabled);
        assert!(info.link.is_none());
    }

    #[test]
    fn no_application_leaves_bare_timestamp() {
        let created = Utc.with_ymd_and_hms(2018, 1, 5, 15, 4, 0).unwrap().fixed_offset();
        let info = timestamp_info(created, None);
        assert_eq!(info.text, "Jan 5, 2018 3:04 PM");
        assert!(!info.links_enabled);
    }

    #[test]
    fn detailed_timestamp_uses_configured_offset() {
        let mut post = status("1", account("10", "alice"));
        post.created_at = Utc.with_ymd_and_hms(2018, 1, 5, 15, 4, 0).unwrap();

        let renderer = RowRenderer::new(&CoreConfig {
            utc_offset_minutes: Some(-5 * 60),
            ..CoreConfig::default()
        });
        let row = renderer.render_detailed_row(&post);
        assert!(row.timestamp_info.text.starts_with("Jan 5, 2018 10:04 AM"));

        let renderer = RowRenderer::new(&CoreConfig {
            utc_offset_minutes: Some(9 * 60),
            ..CoreConfig::default()
        });
        let row = renderer.render_detailed_row(&post);
        assert!(row.timestamp_info.text.starts_with("Jan 6, 2018 12:04 AM"));
    }

    #[test]
    fn reblog_row_shows_original_with_booster_name() {
        let original = status("1", account("10", "alice"));
        let wrapper = reblog("2", account("20", "bob"), original);

        let row = render_base(
            &wrapper,
            RowCapabilities {
                media_preview_enabled: true,
                media_preview_height: 160,
            },
        );
        assert_eq!(row.status_id, "2");
        assert_eq!(row.actionable_id, "1");
        assert_eq!(row.handle, "@alice");
        assert_eq!(row.reblogged_by.as_deref(), Some("bob display"));
        assert_eq!(row.content, "<p>Hello <b>world</b></p>");
    }

    #[test]
    fn detailed_row_uses_detail_preview_height() {
        let config = CoreConfig::default();
        let post = status("1", account("10", "alice"));
        let renderer = RowRenderer::new(&config);

        let timeline = renderer.render_timeline_row(&post, Utc::now());
        let detailed = renderer.render_detailed_row(&post);
        assert_eq!(timeline.base.media_preview_height, config.layout.media_preview_height);
        assert_eq!(
            detailed.base.media_preview_height,
            config.layout.detail_media_preview_height
        );
    }

    #[test]
    fn detailed_row_scenario_card_with_image() {
        let mut post = status("1", account("10", "alice"));
        post.card = Some(Card {
            url: "http://x".to_string(),
            title: "X".to_string(),
            description: String::new(),
            image: Some("http://img".to_string()),
            width: 100,
            height: 50,
        });

        let row = renderer("en-US").render_detailed_row(&post);
        let card = row.card.expect("card shown");
        let image = card.image.expect("image shown");
        assert_eq!(image.orientation, crate::view::CardOrientation::Vertical);
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now - Duration::seconds(5), now), "5s");
        assert_eq!(relative_time(now - Duration::minutes(3), now), "3m");
        assert_eq!(relative_time(now - Duration::hours(2), now), "2h");
        assert_eq!(relative_time(now - Duration::days(4), now), "4d");
        assert_eq!(relative_time(now - Duration::days(30), now), "Feb 09");
        assert_eq!(relative_time(now + Duration::seconds(3), now), "0s");
    }

    #[test]
    fn rendered_row_serializes_flat_with_kind() {
        let post = status("1", account("10", "alice"));
        let row = renderer("en-US").render(&post, RowKind::Timeline, Utc::now());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["kind"], "timeline");
        assert_eq!(json["actionable_id"], "1");
    }
}
