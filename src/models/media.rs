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

//! Media attachment and link-preview card models

use serde::{Deserialize, Serialize};

/// Type of media attachment
///
/// Anything the client does not know how to view (audio included) is
/// `Unknown`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentType {
    Image,
    Video,
    Gifv,
    #[serde(other)]
    Unknown,
}

/// A media attachment on a status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,

    #[serde(rename = "type")]
    pub attachment_type: AttachmentType,

    /// URL to the media file
    pub url: String,

    /// URL to the preview image
    pub preview_url: Option<String>,

    /// Alt text
    pub description: Option<String>,
}

/// A link-preview card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Preview image, if the server fetched one
    pub image: Option<String>,
    /// Image width in pixels, 0 when unknown
    #[serde(default)]
    pub width: u32,
    /// Image height in pixels, 0 when unknown
    #[serde(default)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_types_deserialize_to_unknown() {
        let audio: AttachmentType = serde_json::from_str("\"audio\"").unwrap();
        let future: AttachmentType = serde_json::from_str("\"hologram\"").unwrap();
        assert_eq!(audio, AttachmentType::Unknown);
        assert_eq!(future, AttachmentType::Unknown);
    }

    #[test]
    fn card_dimensions_default_to_zero() {
        let card: Card =
            serde_json::from_str(r#"{"url":"http://x","title":"X","image":null}"#).unwrap();
        assert_eq!(card.width, 0);
        assert_eq!(card.height, 0);
        assert!(card.description.is_empty());
    }
}
