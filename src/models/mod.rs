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

//! Data models for Hiveway
//!
//! Immutable snapshots of the Mastodon entities a screen renders, plus the
//! stored login and the IPC envelope.

mod account;
#[cfg(test)]
pub(crate) mod fixtures;
mod ipc_message;
mod media;
mod status;
mod timeline;

pub use account::*;
pub use ipc_message::*;
pub use media::*;
pub use status::*;
pub use timeline::*;
