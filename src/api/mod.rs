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

//! Mastodon REST access
//!
//! `StatusApi` is the seam the dispatcher and IPC handler talk to;
//! `MastodonClient` implements it on top of megalodon.

mod client;
mod converter;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Account, Status, TimelinePage, TimelineRequest};

pub use client::MastodonClient;
pub use converter::strip_html;

/// Requests the presentation core issues against the instance
#[async_trait]
pub trait StatusApi: Send + Sync {
    async fn reblog_status(&self, status_id: &str) -> Result<Status>;

    async fn unreblog_status(&self, status_id: &str) -> Result<Status>;

    async fn favourite_status(&self, status_id: &str) -> Result<Status>;

    async fn unfavourite_status(&self, status_id: &str) -> Result<Status>;

    async fn mute_account(&self, account_id: &str) -> Result<()>;

    async fn block_account(&self, account_id: &str) -> Result<()>;

    async fn delete_status(&self, status_id: &str) -> Result<()>;

    /// Fetch one page of a timeline
    async fn get_timeline(&self, request: &TimelineRequest) -> Result<TimelinePage>;

    /// The account the access token belongs to
    async fn verify_credentials(&self) -> Result<Account>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every call, fails the ones listed in `failing` and never
    /// answers the ones listed in `stalled`
    #[derive(Default)]
    pub struct MockApi {
        pub calls: Mutex<Vec<String>>,
        pub failing: Vec<&'static str>,
        pub stalled: Vec<&'static str>,
        pub statuses: Vec<Status>,
        pub me: Option<Account>,
    }

    impl MockApi {
        pub fn failing(methods: &[&'static str]) -> Self {
            Self {
                failing: methods.to_vec(),
                ..Default::default()
            }
        }

        pub fn stalled(methods: &[&'static str]) -> Self {
            Self {
                stalled: methods.to_vec(),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, method: &'static str, arg: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("{}({})", method, arg));
            if self.failing.contains(&method) {
                anyhow::bail!("{} failed: connection refused", method);
            }
            Ok(())
        }

        async fn stall(&self, method: &'static str) {
            if self.stalled.contains(&method) {
                futures::future::pending::<()>().await;
            }
        }

        fn toggled(&self, id: &str, reblogged: Option<bool>, favourited: Option<bool>) -> Status {
            let mut status = crate::models::fixtures::status(
                id,
                crate::models::fixtures::account("1", "author"),
            );
            status.reblogged = reblogged;
            status.favourited = favourited;
            status
        }
    }

    #[async_trait]
    impl StatusApi for MockApi {
        async fn reblog_status(&self, status_id: &str) -> Result<Status> {
            self.record("reblog_status", status_id)?;
            Ok(self.toggled(status_id, Some(true), None))
        }

        async fn unreblog_status(&self, status_id: &str) -> Result<Status> {
            self.record("unreblog_status", status_id)?;
            Ok(self.toggled(status_id, Some(false), None))
        }

        async fn favourite_status(&self, status_id: &str) -> Result<Status> {
            self.record("favourite_status", status_id)?;
            Ok(self.toggled(status_id, None, Some(true)))
        }

        async fn unfavourite_status(&self, status_id: &str) -> Result<Status> {
            self.record("unfavourite_status", status_id)?;
            Ok(self.toggled(status_id, None, Some(false)))
        }

        async fn mute_account(&self, account_id: &str) -> Result<()> {
            self.record("mute_account", account_id)?;
            self.stall("mute_account").await;
            Ok(())
        }

        async fn block_account(&self, account_id: &str) -> Result<()> {
            self.record("block_account", account_id)?;
            self.stall("block_account").await;
            Ok(())
        }

        async fn delete_status(&self, status_id: &str) -> Result<()> {
            self.record("delete_status", status_id)?;
            self.stall("delete_status").await;
            Ok(())
        }

        async fn get_timeline(&self, request: &TimelineRequest) -> Result<TimelinePage> {
            self.record("get_timeline", &request.timeline_type.display_name())?;
            Ok(TimelinePage::from_statuses(self.statuses.clone(), request.limit.unwrap_or(20)))
        }

        async fn verify_credentials(&self) -> Result<Account> {
            self.record("verify_credentials", "")?;
            self.me.clone().ok_or_else(|| anyhow::anyhow!("no account"))
        }
    }
}
