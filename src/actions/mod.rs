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

//! Popup-menu actions on a status
//!
//! Which actions a status offers depends only on whether the logged-in
//! user wrote it; the dispatcher turns a chosen action into at most one
//! request plus its local effects.

mod dispatcher;
mod payload;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Status;
use crate::session::SessionContext;

pub use dispatcher::{Dispatcher, Effect};
pub use payload::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Share,
    ShareLink,
    CopyLink,
    Mute,
    Block,
    Report,
    Delete,
}

pub type ActionSet = BTreeSet<Action>;

/// Menu for a status the logged-in user wrote, or for anyone else's
pub fn menu(is_owner: bool) -> ActionSet {
    let common = [Action::Share, Action::ShareLink, Action::CopyLink];
    if is_owner {
        common.into_iter().chain([Action::Delete]).collect()
    } else {
        common
            .into_iter()
            .chain([Action::Mute, Action::Block, Action::Report])
            .collect()
    }
}

pub fn available_actions(status: &Status, session: &SessionContext) -> ActionSet {
    menu(session.is_owner(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;

    #[test]
    fn owner_menu_offers_delete_only() {
        let set = menu(true);
        assert!(set.contains(&Action::Delete));
        assert!(!set.contains(&Action::Mute));
        assert!(!set.contains(&Action::Block));
        assert!(!set.contains(&Action::Report));
    }

    #[test]
    fn menus_share_the_link_actions() {
        for is_owner in [true, false] {
            let set = menu(is_owner);
            assert!(set.contains(&Action::Share));
            assert!(set.contains(&Action::ShareLink));
            assert!(set.contains(&Action::CopyLink));
        }
    }

    #[test]
    fn others_menu_offers_moderation() {
        let set = menu(false);
        assert_eq!(
            set,
            ActionSet::from([
                Action::Share,
                Action::ShareLink,
                Action::CopyLink,
                Action::Mute,
                Action::Block,
                Action::Report
            ])
        );
    }

    #[test]
    fn delete_offered_iff_owner() {
        let post = status("1", account("42", "me"));
        let mine = SessionContext::new("42", "me");
        let someone_else = SessionContext::new("7", "other");

        assert!(available_actions(&post, &mine).contains(&Action::Delete));
        assert!(!available_actions(&post, &someone_else).contains(&Action::Delete));
        assert!(!available_actions(&post, &SessionContext::anonymous()).contains(&Action::Delete));
    }
}
