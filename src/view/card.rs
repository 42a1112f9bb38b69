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

//! Link-preview card block of the detailed row

use serde::{Deserialize, Serialize};

use crate::config::LayoutDimensions;
use crate::models::{Card, Status};
use crate::navigation::{self, Navigation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardOrientation {
    /// Image stacked above the text
    Vertical,
    /// Image beside the text
    Horizontal,
}

/// Size of one layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extent {
    Fixed(u32),
    MatchParent,
    WrapContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSize {
    pub width: Extent,
    pub height: Extent,
}

/// Request for the external image loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub url: String,
    /// Scale to the target bounds
    pub fit: bool,
    pub center_crop: bool,
}

impl ImageRequest {
    pub fn fit_center_crop(url: &str) -> Self {
        Self {
            url: url.to_string(),
            fit: true,
            center_crop: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImageView {
    pub request: ImageRequest,
    pub orientation: CardOrientation,
    /// Size of the image block
    pub image: BlockSize,
    /// Size of the title/description block next to or below the image
    pub info: BlockSize,
    /// Clip the card to its rounded outline
    pub clip_to_outline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub title: String,
    pub description: String,
    pub url: String,
    /// `None` hides the image block; the text stays visible
    pub image: Option<CardImageView>,
}

impl CardView {
    /// Selecting the card opens its url
    pub fn select(&self) -> Navigation {
        navigation::open_link(&self.url)
    }
}

/// Wider-than-tall images stack above the text.
pub fn orientation(width: u32, height: u32) -> CardOrientation {
    if width > height {
        CardOrientation::Vertical
    } else {
        CardOrientation::Horizontal
    }
}

/// The card block only shows for statuses without media and with a
/// non-empty card url.
pub fn visible_card(status: &Status) -> Option<&Card> {
    if !status.media_attachments.is_empty() {
        return None;
    }

    status.card.as_ref().filter(|card| !card.url.is_empty())
}

/// The image block needs both dimensions and an image url.
pub fn image_visible(card: &Card) -> bool {
    card.width > 0 && card.height > 0 && card.image.as_deref().is_some_and(|url| !url.is_empty())
}

pub fn render_card(status: &Status, layout: &LayoutDimensions) -> Option<CardView> {
    let card = visible_card(status)?;

    let image = image_visible(card).then(|| {
        let orientation = orientation(card.width, card.height);
        let (image, info) = match orientation {
            CardOrientation::Vertical => (
                BlockSize {
                    width: Extent::MatchParent,
                    height: Extent::Fixed(layout.card_image_vertical_height),
                },
                BlockSize {
                    width: Extent::WrapContent,
                    height: Extent::MatchParent,
                },
            ),
            CardOrientation::Horizontal => (
                BlockSize {
                    width: Extent::Fixed(layout.card_image_horizontal_width),
                    height: Extent::MatchParent,
                },
                BlockSize {
                    width: Extent::MatchParent,
                    height: Extent::WrapContent,
                },
            ),
        };

        CardImageView {
            request: ImageRequest::fit_center_crop(card.image.as_deref().unwrap_or_default()),
            orientation,
            image,
            info,
            clip_to_outline: true,
        }
    });

    Some(CardView {
        title: card.title.clone(),
        description: card.description.clone(),
        url: card.url.clone(),
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use crate::models::{Attachment, AttachmentType};

    fn card(width: u32, height: u32, image: Option<&str>) -> Card {
        Card {
            url: "http://x".to_string(),
            title: "Title".to_string(),
            description: "Description".to_string(),
            image: image.map(str::to_string),
            width,
            height,
        }
    }

    fn status_with_card(card: Card) -> Status {
        let mut status = status("1", account("10", "alice"));
        status.card = Some(card);
        status
    }

    #[test]
    fn orientation_depends_only_on_dimensions() {
        assert_eq!(orientation(100, 50), CardOrientation::Vertical);
        assert_eq!(orientation(50, 50), CardOrientation::Horizontal);
        assert_eq!(orientation(50, 100), CardOrientation::Horizontal);
        assert_eq!(orientation(1, 0), CardOrientation::Vertical);
    }

    #[test]
    fn wide_card_with_image_renders_vertically() {
        let layout = LayoutDimensions::default();
        let view = render_card(&status_with_card(card(100, 50, Some("http://img"))), &layout)
            .expect("card shown");

        let image = view.image.expect("image shown");
        assert_eq!(image.orientation, CardOrientation::Vertical);
        assert_eq!(image.image.height, Extent::Fixed(layout.card_image_vertical_height));
        assert_eq!(image.image.width, Extent::MatchParent);
        assert_eq!(image.info.height, Extent::MatchParent);
        assert_eq!(image.request, ImageRequest::fit_center_crop("http://img"));
    }

    #[test]
    fn tall_card_renders_side_by_side() {
        let layout = LayoutDimensions::default();
        let view = render_card(&status_with_card(card(40, 80, Some("http://img"))), &layout)
            .expect("card shown");

        let image = view.image.expect("image shown");
        assert_eq!(image.orientation, CardOrientation::Horizontal);
        assert_eq!(image.image.width, Extent::Fixed(layout.card_image_horizontal_width));
        assert_eq!(image.info.width, Extent::MatchParent);
    }

    #[test]
    fn card_hidden_when_status_has_attachments() {
        let mut status = status_with_card(card(100, 50, Some("http://img")));
        status.media_attachments.push(Attachment {
            id: "m1".to_string(),
            attachment_type: AttachmentType::Image,
            url: "http://img1".to_string(),
            preview_url: None,
            description: None,
        });

        assert_eq!(render_card(&status, &LayoutDimensions::default()), None);
    }

    #[test]
    fn card_hidden_without_url() {
        let mut empty_url = card(100, 50, Some("http://img"));
        empty_url.url.clear();
        assert_eq!(render_card(&status_with_card(empty_url), &LayoutDimensions::default()), None);
        assert_eq!(
            render_card(&status("1", account("10", "alice")), &LayoutDimensions::default()),
            None
        );
    }

    #[test]
    fn image_hidden_but_text_kept_for_degenerate_images() {
        for degenerate in [
            card(0, 50, Some("http://img")),
            card(100, 0, Some("http://img")),
            card(100, 50, Some("")),
            card(100, 50, None),
        ] {
            let view = render_card(&status_with_card(degenerate), &LayoutDimensions::default())
                .expect("card shown");
            assert!(view.image.is_none());
            assert_eq!(view.title, "Title");
            assert_eq!(view.description, "Description");
            assert_eq!(view.url, "http://x");
        }
    }

    #[test]
    fn selecting_card_opens_its_url() {
        let view = render_card(&status_with_card(card(0, 0, None)), &LayoutDimensions::default())
            .expect("card shown");
        assert_eq!(view.select(), navigation::open_link("http://x"));
    }
}
