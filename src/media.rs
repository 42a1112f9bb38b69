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

//! Media-intent router: which viewer opens an attachment

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::models::AttachmentType;

/// Viewer to open for a selected attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "viewer")]
pub enum ViewerIntent {
    /// Swipeable image viewer over every image url of the status
    Image {
        urls: Vec<String>,
        index: usize,
        /// Transition name for a shared-element animation from the
        /// tapped preview; set only when the preview view is known
        shared_element: Option<String>,
    },
    /// Video player for one url
    Video { url: String },
}

/// Route a tap on `urls[index]`.
///
/// `Unknown` attachments never open a viewer, whatever the arguments.
pub fn route(
    attachment_type: AttachmentType,
    urls: &[String],
    index: usize,
    has_source_view: bool,
) -> CoreResult<Option<ViewerIntent>> {
    if attachment_type == AttachmentType::Unknown {
        debug!("Ignoring view request for unknown attachment type");
        return Ok(None);
    }

    let url = urls.get(index).ok_or(CoreError::MediaIndexOutOfRange {
        index,
        len: urls.len(),
    })?;

    let intent = match attachment_type {
        AttachmentType::Image => ViewerIntent::Image {
            urls: urls.to_vec(),
            index,
            shared_element: has_source_view.then(|| url.clone()),
        },
        AttachmentType::Video | AttachmentType::Gifv => ViewerIntent::Video { url: url.clone() },
        AttachmentType::Unknown => return Ok(None),
    };

    Ok(Some(intent))
}
