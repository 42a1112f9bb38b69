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

//! Mastodon API client implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use megalodon::{
    generator,
    megalodon::{
        GetAccountStatusesInputOptions, GetHomeTimelineInputOptions, GetLocalTimelineInputOptions,
        GetPublicTimelineInputOptions, GetTagTimelineInputOptions,
    },
    Megalodon, SNS,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::log_api_call;
use crate::models::{Account, Status, TimelinePage, TimelineRequest, TimelineType};

use super::{converter, StatusApi};

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Mastodon API client bound to one instance and access token
pub struct MastodonClient {
    client: Arc<Box<dyn Megalodon + Send + Sync>>,
    instance_url: String,
}

impl MastodonClient {
    /// Create a client from an existing access token
    pub fn from_token(instance_url: &str, access_token: &str) -> Result<Self> {
        let instance_url = normalize_url(instance_url);

        let client = generator(
            SNS::Mastodon,
            instance_url.clone(),
            Some(access_token.to_string()),
            None,
        )
        .context("Failed to create Mastodon client")?;

        Ok(Self {
            client: Arc::new(client),
            instance_url,
        })
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    async fn fetch_thread(&self, status_id: &str) -> Result<Vec<Status>> {
        let focused = self.client
            .get_status(status_id.to_string())
            .await
            .context("Failed to fetch status")?;
        let context = self.client
            .get_status_context(status_id.to_string(), None)
            .await
            .context("Failed to fetch status context")?;

        let mut statuses: Vec<Status> =
            context.json.ancestors.iter().map(converter::convert_status).collect();
        statuses.push(converter::convert_status(&focused.json));
        statuses.extend(context.json.descendants.iter().map(converter::convert_status));

        Ok(statuses)
    }
}

#[async_trait]
impl StatusApi for MastodonClient {
    async fn reblog_status(&self, status_id: &str) -> Result<Status> {
        let started = Instant::now();
        let response = self.client
            .reblog_status(status_id.to_string())
            .await
            .context("Failed to reblog status")?;
        log_api_call!("reblog", status_id, started.elapsed().as_millis() as u64);

        Ok(converter::convert_status(&response.json))
    }

    async fn unreblog_status(&self, status_id: &str) -> Result<Status> {
        let started = Instant::now();
        let response = self.client
            .unreblog_status(status_id.to_string())
            .await
            .context("Failed to unreblog status")?;
        log_api_call!("unreblog", status_id, started.elapsed().as_millis() as u64);

        Ok(converter::convert_status(&response.json))
    }

    async fn favourite_status(&self, status_id: &str) -> Result<Status> {
        let started = Instant::now();
        let response = self.client
            .favourite_status(status_id.to_string())
            .await
            .context("Failed to favourite status")?;
        log_api_call!("favourite", status_id, started.elapsed().as_millis() as u64);

        Ok(converter::convert_status(&response.json))
    }

    async fn unfavourite_status(&self, status_id: &str) -> Result<Status> {
        let started = Instant::now();
        let response = self.client
            .unfavourite_status(status_id.to_string())
            .await
            .context("Failed to unfavourite status")?;
        log_api_call!("unfavourite", status_id, started.elapsed().as_millis() as u64);

        Ok(converter::convert_status(&response.json))
    }

    async fn mute_account(&self, account_id: &str) -> Result<()> {
        let started = Instant::now();
        // Mute notifications from the account too
        self.client
            .mute_account(account_id.to_string(), true)
            .await
            .context("Failed to mute account")?;
        log_api_call!("mute", account_id, started.elapsed().as_millis() as u64);

        Ok(())
    }

    async fn block_account(&self, account_id: &str) -> Result<()> {
        let started = Instant::now();
        self.client
            .block_account(account_id.to_string())
            .await
            .context("Failed to block account")?;
        log_api_call!("block", account_id, started.elapsed().as_millis() as u64);

        Ok(())
    }

    async fn delete_status(&self, status_id: &str) -> Result<()> {
        let started = Instant::now();
        self.client
            .delete_status(status_id.to_string())
            .await
            .context("Failed to delete status")?;
        log_api_call!("delete", status_id, started.elapsed().as_millis() as u64);

        Ok(())
    }

    async fn get_timeline(&self, request: &TimelineRequest) -> Result<TimelinePage> {
        let limit = request.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        debug!("Fetching {} from {}", request.timeline_type.display_name(), self.instance_url);

        let statuses: Vec<Status> = match &request.timeline_type {
            TimelineType::Home => {
                let options = GetHomeTimelineInputOptions {
                    max_id: request.max_id.clone(),
                    since_id: request.since_id.clone(),
                    limit: Some(limit),
                    ..Default::default()
                };
                let response = self.client
                    .get_home_timeline(Some(&options))
                    .await
                    .context("Failed to fetch home timeline")?;
                response.json.iter().map(converter::convert_status).collect()
            }
            TimelineType::Local => {
                let options = GetLocalTimelineInputOptions {
                    max_id: request.max_id.clone(),
                    since_id: request.since_id.clone(),
                    limit: Some(limit),
                    ..Default::default()
                };
                let response = self.client
                    .get_local_timeline(Some(&options))
                    .await
                    .context("Failed to fetch local timeline")?;
                response.json.iter().map(converter::convert_status).collect()
            }
            TimelineType::Federated => {
                let options = GetPublicTimelineInputOptions {
                    max_id: request.max_id.clone(),
                    since_id: request.since_id.clone(),
                    limit: Some(limit),
                    ..Default::default()
                };
                let response = self.client
                    .get_public_timeline(Some(&options))
                    .await
                    .context("Failed to fetch federated timeline")?;
                response.json.iter().map(converter::convert_status).collect()
            }
            TimelineType::Hashtag { tag } => {
                let options = GetTagTimelineInputOptions {
                    max_id: request.max_id.clone(),
                    since_id: request.since_id.clone(),
                    limit: Some(limit),
                    ..Default::default()
                };
                let response = self.client
                    .get_tag_timeline(tag.clone(), Some(&options))
                    .await
                    .context("Failed to fetch hashtag timeline")?;
                response.json.iter().map(converter::convert_status).collect()
            }
            TimelineType::Account { account_id } => {
                let options = GetAccountStatusesInputOptions {
                    max_id: request.max_id.clone(),
                    since_id: request.since_id.clone(),
                    limit: Some(limit),
                    ..Default::default()
                };
                let response = self.client
                    .get_account_statuses(account_id.clone(), Some(&options))
                    .await
                    .context("Failed to fetch account statuses")?;
                response.json.iter().map(converter::convert_status).collect()
            }
            // A thread is always a single complete page
            TimelineType::Thread { status_id } => {
                let statuses = self.fetch_thread(status_id).await?;
                return Ok(TimelinePage::from_statuses(statuses, u32::MAX));
            }
        };

        Ok(TimelinePage::from_statuses(statuses, limit))
    }

    async fn verify_credentials(&self) -> Result<Account> {
        let response = self.client
            .verify_account_credentials()
            .await
            .context("Failed to verify credentials")?;

        Ok(converter::convert_account(&response.json))
    }
}

/// Normalize an instance URL
fn normalize_url(url: &str) -> String {
    let url = url.trim();
    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    };

    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme_and_strips_slash() {
        assert_eq!(normalize_url("mastodon.social/"), "https://mastodon.social");
        assert_eq!(normalize_url(" http://localhost:3000 "), "http://localhost:3000");
    }
}
