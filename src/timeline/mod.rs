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

//! Per-screen row lists
//!
//! Each UI list registers as a screen holding the statuses it shows and
//! the requests still in flight for it.

mod events;

use std::collections::HashMap;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::models::{Status, TimelineType};
use crate::view::RowKind;

pub use events::{EventBus, TimelineEvent};

/// Where a fetched page goes relative to the rows already shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// Older statuses (`max_id` or first load), appended at the bottom
    Older,
    /// Newer statuses (`since_id`), placed above the current top row
    Newer,
}

/// Something rows can be removed from by position
pub trait ItemRemover {
    fn remove_item(&mut self, position: usize) -> Option<Status>;
}

#[derive(Debug, Clone, Default)]
pub struct StatusList {
    statuses: Vec<Status>,
}

impl StatusList {
    #[cfg(test)]
    pub fn new(statuses: Vec<Status>) -> Self {
        Self { statuses }
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn get(&self, position: usize) -> CoreResult<&Status> {
        self.statuses.get(position).ok_or(CoreError::RowOutOfRange {
            position,
            len: self.statuses.len(),
        })
    }

    /// Append an older page, skipping statuses already on screen
    pub fn extend(&mut self, statuses: Vec<Status>) {
        for status in statuses {
            if !self.statuses.iter().any(|s| s.id == status.id) {
                self.statuses.push(status);
            }
        }
    }

    /// Put a newer page above the current rows, keeping its order and
    /// skipping statuses already on screen
    pub fn prepend(&mut self, statuses: Vec<Status>) {
        let fresh: Vec<Status> = statuses
            .into_iter()
            .filter(|status| !self.statuses.iter().any(|s| s.id == status.id))
            .collect();
        self.statuses.splice(0..0, fresh);
    }

    /// Position of the row with this id
    pub fn position_of(&self, status_id: &str) -> Option<usize> {
        self.statuses.iter().position(|s| s.id == status_id)
    }

    /// Drop every row written or reblogged by the account
    pub fn remove_all_by_account(&mut self, account_id: &str) -> usize {
        let before = self.statuses.len();
        self.statuses.retain(|s| {
            s.account.id != account_id && s.actionable_status().account.id != account_id
        });
        before - self.statuses.len()
    }

    /// Drop rows showing the status, including reblogs of it
    pub fn remove_status(&mut self, status_id: &str) -> usize {
        let before = self.statuses.len();
        self.statuses
            .retain(|s| s.id != status_id && s.actionable_id() != status_id);
        before - self.statuses.len()
    }

    /// Swap in a fresh copy of a status after a reblog/favourite toggle.
    /// Reblog wrappers keep their wrapper and get the new original.
    pub fn replace_actionable(&mut self, updated: &Status) -> usize {
        let updated = updated.actionable_status();
        let mut replaced = 0;

        for row in self.statuses.iter_mut() {
            if row.actionable_id() != updated.id {
                continue;
            }
            match row.reblog.as_mut() {
                Some(original) => **original = updated.clone(),
                None => *row = updated.clone(),
            }
            replaced += 1;
        }

        replaced
    }

    pub fn apply_event(&mut self, event: &TimelineEvent) -> usize {
        match event {
            TimelineEvent::MuteAccount { account_id }
            | TimelineEvent::BlockAccount { account_id } => self.remove_all_by_account(account_id),
            TimelineEvent::StatusDeleted { status_id } => self.remove_status(status_id),
        }
    }
}

impl ItemRemover for StatusList {
    fn remove_item(&mut self, position: usize) -> Option<Status> {
        if position < self.statuses.len() {
            Some(self.statuses.remove(position))
        } else {
            None
        }
    }
}

/// Requests in flight for one screen
#[derive(Debug, Default)]
pub struct CallList {
    handles: Vec<AbortHandle>,
}

impl CallList {
    pub fn track(&mut self, handle: AbortHandle) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Abort everything still running; returns how many were aborted
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for handle in self.handles.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        cancelled
    }
}

#[derive(Debug)]
pub struct Screen {
    pub timeline_type: TimelineType,
    pub kind: RowKind,
    pub rows: StatusList,
    pub calls: CallList,
}

#[derive(Debug, Default)]
pub struct ScreenRegistry {
    screens: HashMap<String, Screen>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a screen, or add a page to one already open for the same
    /// timeline. A different timeline under the same id starts over.
    pub fn load(
        &mut self,
        screen_id: &str,
        timeline_type: TimelineType,
        kind: RowKind,
        statuses: Vec<Status>,
        paging: Paging,
    ) -> &Screen {
        let screen = self
            .screens
            .entry(screen_id.to_string())
            .and_modify(|screen| {
                if screen.timeline_type != timeline_type {
                    screen.calls.cancel_all();
                    screen.timeline_type = timeline_type.clone();
                    screen.rows = StatusList::default();
                }
                screen.kind = kind;
            })
            .or_insert_with(|| Screen {
                timeline_type,
                kind,
                rows: StatusList::default(),
                calls: CallList::default(),
            });

        match paging {
            Paging::Older => screen.rows.extend(statuses),
            Paging::Newer => screen.rows.prepend(statuses),
        }
        debug!("Screen {} now holds {} rows", screen_id, screen.rows.len());
        screen
    }

    pub fn get(&self, screen_id: &str) -> CoreResult<&Screen> {
        self.screens
            .get(screen_id)
            .ok_or_else(|| CoreError::UnknownScreen(screen_id.to_string()))
    }

    pub fn get_mut(&mut self, screen_id: &str) -> CoreResult<&mut Screen> {
        self.screens
            .get_mut(screen_id)
            .ok_or_else(|| CoreError::UnknownScreen(screen_id.to_string()))
    }

    /// Forget a screen and abort its in-flight requests
    pub fn close(&mut self, screen_id: &str) -> CoreResult<usize> {
        let mut screen = self
            .screens
            .remove(screen_id)
            .ok_or_else(|| CoreError::UnknownScreen(screen_id.to_string()))?;
        let cancelled = screen.calls.cancel_all();
        info!("Closed screen {} ({} requests cancelled)", screen_id, cancelled);
        Ok(cancelled)
    }

    pub fn close_all(&mut self) {
        for (_, mut screen) in self.screens.drain() {
            screen.calls.cancel_all();
        }
    }

    pub fn apply_event(&mut self, event: &TimelineEvent) -> usize {
        self.screens
            .values_mut()
            .map(|screen| screen.rows.apply_event(event))
            .sum()
    }

    pub fn replace_actionable(&mut self, updated: &Status) {
        for screen in self.screens.values_mut() {
            screen.rows.replace_actionable(updated);
        }
    }
}
