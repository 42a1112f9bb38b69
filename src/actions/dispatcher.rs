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

//! Action dispatcher

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::api::StatusApi;
use crate::error::{CoreError, CoreResult};
use crate::models::Status;
use crate::navigation::Navigation;
use crate::session::SessionContext;
use crate::timeline::{EventBus, TimelineEvent};

use super::{available_actions, payload, Action, ComposeIntent, SharePayload};

/// What the UI should do once an action completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "effect")]
pub enum Effect {
    ShareText(SharePayload),
    ShareLink(SharePayload),
    CopyToClipboard { text: String },
    Navigate(Navigation),
    AccountMuted { account_id: String },
    AccountBlocked { account_id: String },
    /// The row at `position` was deleted on the server
    RowRemoved { position: usize, status_id: String },
}

/// Issues the request behind each action against the actionable status
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn StatusApi>,
    bus: EventBus,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn StatusApi>, bus: EventBus) -> Self {
        Self { api, bus }
    }

    /// Run a menu action for the row at `position`.
    ///
    /// Mute, block and delete only report success, and only publish their
    /// event, once the instance accepted the request.
    pub async fn dispatch(
        &self,
        action: Action,
        status: &Status,
        position: usize,
        session: &SessionContext,
    ) -> CoreResult<Effect> {
        if !available_actions(status, session).contains(&action) {
            return Err(CoreError::ActionNotAvailable(action));
        }

        let actionable = status.actionable_status();
        info!("Dispatching {:?} on status {}", action, actionable.id);

        let effect = match action {
            Action::Share => Effect::ShareText(payload::share_text(status)),
            Action::ShareLink => Effect::ShareLink(payload::share_link(status)),
            Action::CopyLink => Effect::CopyToClipboard {
                text: payload::copy_link(status),
            },
            Action::Report => Effect::Navigate(Navigation::Report(payload::report(status))),
            Action::Mute => {
                let account_id = actionable.account.id.clone();
                self.api
                    .mute_account(&account_id)
                    .await
                    .inspect_err(|e| error!("Mute of {} failed: {:#}", account_id, e))?;
                self.bus.publish(TimelineEvent::MuteAccount {
                    account_id: account_id.clone(),
                });
                Effect::AccountMuted { account_id }
            }
            Action::Block => {
                let account_id = actionable.account.id.clone();
                self.api
                    .block_account(&account_id)
                    .await
                    .inspect_err(|e| error!("Block of {} failed: {:#}", account_id, e))?;
                self.bus.publish(TimelineEvent::BlockAccount {
                    account_id: account_id.clone(),
                });
                Effect::AccountBlocked { account_id }
            }
            Action::Delete => {
                self.api
                    .delete_status(&actionable.id)
                    .await
                    .inspect_err(|e| error!("Delete of {} failed: {:#}", actionable.id, e))?;
                self.bus.publish(TimelineEvent::StatusDeleted {
                    status_id: actionable.id.clone(),
                });
                Effect::RowRemoved {
                    position,
                    status_id: status.id.clone(),
                }
            }
        };

        Ok(effect)
    }

    /// Reblog or undo it. The caller reverts its optimistic toggle on error.
    pub async fn reblog(&self, status: &Status, reblog: bool) -> CoreResult<Status> {
        let id = status.actionable_id();
        let result = if reblog {
            self.api.reblog_status(id).await
        } else {
            self.api.unreblog_status(id).await
        };

        result
            .inspect_err(|e| error!("Reblog toggle on {} failed: {:#}", id, e))
            .map_err(CoreError::from)
    }

    /// Favourite or undo it. The caller reverts its optimistic toggle on error.
    pub async fn favourite(&self, status: &Status, favourite: bool) -> CoreResult<Status> {
        let id = status.actionable_id();
        let result = if favourite {
            self.api.favourite_status(id).await
        } else {
            self.api.unfavourite_status(id).await
        };

        result
            .inspect_err(|e| error!("Favourite toggle on {} failed: {:#}", id, e))
            .map_err(CoreError::from)
    }

    pub fn reply(&self, status: &Status, session: &SessionContext) -> ComposeIntent {
        payload::reply(status, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use crate::models::fixtures::*;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio_test::{assert_err, assert_ok};

    fn dispatcher(api: MockApi) -> (Dispatcher, Arc<MockApi>, EventBus) {
        let api = Arc::new(api);
        let bus = EventBus::new();
        (Dispatcher::new(api.clone(), bus.clone()), api, bus)
    }

    fn me() -> SessionContext {
        SessionContext::new("42", "me")
    }

    #[tokio::test]
    async fn mute_targets_original_author_and_publishes() {
        let (dispatcher, api, bus) = dispatcher(MockApi::default());
        let mut events = bus.subscribe();
        let wrapper = reblog("2", account("20", "bob"), status("1", account("10", "alice")));

        let effect = assert_ok!(dispatcher.dispatch(Action::Mute, &wrapper, 3, &me()).await);

        assert_eq!(
            effect,
            Effect::AccountMuted {
                account_id: "10".to_string()
            }
        );
        assert_eq!(api.calls(), vec!["mute_account(10)"]);
        assert_eq!(
            events.try_recv().unwrap(),
            TimelineEvent::MuteAccount {
                account_id: "10".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failed_block_publishes_nothing() {
        let (dispatcher, api, bus) = dispatcher(MockApi::failing(&["block_account"]));
        let mut events = bus.subscribe();
        let post = status("1", account("10", "alice"));

        let err = assert_err!(dispatcher.dispatch(Action::Block, &post, 0, &me()).await);

        assert!(matches!(err, CoreError::Api(_)));
        assert_eq!(api.calls(), vec!["block_account(10)"]);
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn delete_own_status_removes_row_after_success() {
        let (dispatcher, api, bus) = dispatcher(MockApi::default());
        let mut events = bus.subscribe();
        let post = status("1", account("42", "me"));

        let effect = assert_ok!(dispatcher.dispatch(Action::Delete, &post, 5, &me()).await);

        assert_eq!(
            effect,
            Effect::RowRemoved {
                position: 5,
                status_id: "1".to_string()
            }
        );
        assert_eq!(api.calls(), vec!["delete_status(1)"]);
        assert_eq!(
            events.try_recv().unwrap(),
            TimelineEvent::StatusDeleted {
                status_id: "1".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failed_delete_is_surfaced() {
        let (dispatcher, _api, _bus) = dispatcher(MockApi::failing(&["delete_status"]));
        let post = status("1", account("42", "me"));

        let result = dispatcher.dispatch(Action::Delete, &post, 0, &me()).await;
        assert!(matches!(result, Err(CoreError::Api(_))));
    }

    #[tokio::test]
    async fn delete_of_someone_elses_status_is_rejected() {
        let (dispatcher, api, _bus) = dispatcher(MockApi::default());
        let post = status("1", account("10", "alice"));

        let result = dispatcher.dispatch(Action::Delete, &post, 0, &me()).await;
        assert!(matches!(result, Err(CoreError::ActionNotAvailable(Action::Delete))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn mute_of_own_status_is_rejected() {
        let (dispatcher, api, _bus) = dispatcher(MockApi::default());
        let post = status("1", account("42", "me"));

        let result = dispatcher.dispatch(Action::Mute, &post, 0, &me()).await;
        assert!(matches!(result, Err(CoreError::ActionNotAvailable(Action::Mute))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn share_actions_issue_no_request() {
        let (dispatcher, api, _bus) = dispatcher(MockApi::default());
        let post = status("1", account("10", "alice"));

        let copy = assert_ok!(dispatcher.dispatch(Action::CopyLink, &post, 0, &me()).await);
        let report = assert_ok!(dispatcher.dispatch(Action::Report, &post, 0, &me()).await);

        assert_eq!(
            copy,
            Effect::CopyToClipboard {
                text: "https://example.social/@alice/1".to_string()
            }
        );
        assert!(matches!(report, Effect::Navigate(Navigation::Report(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn toggles_target_actionable_id() {
        let (dispatcher, api, _bus) = dispatcher(MockApi::default());
        let wrapper = reblog("2", account("20", "bob"), status("1", account("10", "alice")));

        let reblogged = assert_ok!(dispatcher.reblog(&wrapper, true).await);
        assert_ok!(dispatcher.reblog(&wrapper, false).await);
        let favourited = assert_ok!(dispatcher.favourite(&wrapper, true).await);
        assert_ok!(dispatcher.favourite(&wrapper, false).await);

        assert_eq!(reblogged.reblogged, Some(true));
        assert_eq!(favourited.favourited, Some(true));
        assert_eq!(
            api.calls(),
            vec![
                "reblog_status(1)",
                "unreblog_status(1)",
                "favourite_status(1)",
                "unfavourite_status(1)"
            ]
        );
    }

    #[tokio::test]
    async fn toggle_failure_reaches_caller() {
        let (dispatcher, _api, _bus) = dispatcher(MockApi::failing(&["favourite_status"]));
        let post = status("1", account("10", "alice"));

        let err = assert_err!(dispatcher.favourite(&post, true).await);
        assert!(err.to_string().contains("favourite_status failed"));
    }
}
