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

//! IPC message handler

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::actions::{available_actions, Action, Dispatcher, Effect};
use crate::api::{MastodonClient, StatusApi};
use crate::cache::AccountStore;
use crate::config::{CoreConfig, SETTING_KEYS};
use crate::error::{CoreError, CoreResult};
use crate::log_ipc;
use crate::media;
use crate::models::{
    error_codes, methods, IpcError, IpcMessage, MessageType, Status, StoredAccount,
    TimelineRequest, TimelineType,
};
use crate::navigation::{self, Navigation};
use crate::session::SessionContext;
use crate::timeline::{EventBus, ItemRemover, Paging, ScreenRegistry, TimelineEvent};
use crate::view::{render_card, RowKind, RowRenderer};

/// The logged-in account and the client bound to it
struct Session {
    api: Arc<dyn StatusApi>,
    context: SessionContext,
    instance_url: String,
}

#[derive(Debug, Deserialize)]
struct OpenParams {
    instance_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LoadParams {
    screen_id: String,
    timeline: TimelineType,
    #[serde(default)]
    kind: Option<RowKind>,
    max_id: Option<String>,
    since_id: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ScreenParams {
    screen_id: String,
}

#[derive(Debug, Deserialize)]
struct RowTarget {
    screen_id: String,
    position: usize,
}

#[derive(Debug, Deserialize)]
struct RenderParams {
    screen_id: String,
    position: usize,
    /// Overrides the screen's row kind, e.g. for the focused status of a thread
    kind: Option<RowKind>,
}

#[derive(Debug, Deserialize)]
struct ActionParams {
    screen_id: String,
    position: usize,
    action: Action,
}

#[derive(Debug, Deserialize)]
struct MediaParams {
    screen_id: String,
    position: usize,
    index: usize,
    #[serde(default)]
    has_source_view: bool,
}

#[derive(Debug, Deserialize)]
struct AccountParams {
    account_id: String,
}

#[derive(Debug, Deserialize)]
struct TagParams {
    hashtag: String,
}

#[derive(Debug, Deserialize)]
struct SettingParams {
    key: String,
    value: String,
}

#[derive(Debug, Clone, Copy)]
enum Toggle {
    Reblog(bool),
    Favourite(bool),
}

/// Handles incoming IPC messages and routes them to appropriate handlers
pub struct MessageHandler {
    config: RwLock<CoreConfig>,
    renderer: RwLock<RowRenderer>,
    /// Active session (if authenticated)
    session: RwLock<Option<Session>>,
    screens: Mutex<ScreenRegistry>,
    bus: EventBus,
    /// Bus events not yet applied to the screens
    pending_events: Mutex<broadcast::Receiver<TimelineEvent>>,
    store: Option<AccountStore>,
    shutdown_tx: broadcast::Sender<()>,
}

impl MessageHandler {
    /// Create a new message handler
    pub fn new(
        config: CoreConfig,
        store: Option<AccountStore>,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Self {
        let bus = EventBus::new();
        let pending_events = Mutex::new(bus.subscribe());

        Self {
            renderer: RwLock::new(RowRenderer::new(&config)),
            config: RwLock::new(config),
            session: RwLock::new(None),
            screens: Mutex::new(ScreenRegistry::new()),
            bus,
            pending_events,
            store,
            shutdown_tx,
        }
    }

    /// Receiver for timeline events, forwarded to clients by the server
    pub fn subscribe_events(&self) -> broadcast::Receiver<TimelineEvent> {
        self.bus.subscribe()
    }

    /// Replace the active session. Screens of the previous one are closed.
    pub async fn set_session(
        &self,
        api: Arc<dyn StatusApi>,
        context: SessionContext,
        instance_url: impl Into<String>,
    ) {
        self.screens.lock().await.close_all();
        *self.session.write().await = Some(Session {
            api,
            context,
            instance_url: instance_url.into(),
        });
    }

    /// Apply settings saved by a previous run over the config file
    pub async fn load_settings(&self) -> CoreResult<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let mut config = self.config.write().await;
        for key in SETTING_KEYS {
            if let Some(value) = store.get_setting(key).await? {
                if let Err(e) = config.apply_setting(key, &value) {
                    warn!("Ignoring stored setting {}: {}", key, e);
                }
            }
        }

        *self.renderer.write().await = RowRenderer::new(&config);
        Ok(())
    }

    /// Reopen the account saved by a previous run, if any
    pub async fn restore_session(&self) -> CoreResult<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let Some(account) = store.get_active_account().await? else {
            debug!("No stored account to restore");
            return Ok(false);
        };

        let client = MastodonClient::from_token(&account.instance_url, &account.access_token)?;
        self.set_session(
            Arc::new(client),
            SessionContext::from_stored(&account),
            account.instance_url.clone(),
        )
        .await;

        info!("Restored session for {}", account.acct);
        Ok(true)
    }

    /// Handle an incoming IPC message
    pub async fn handle_message(&self, msg: IpcMessage) -> IpcMessage {
        if msg.message_type != MessageType::Request {
            return IpcMessage::response_err(
                &msg.id,
                IpcError::new(error_codes::INVALID_REQUEST, "Expected a request"),
            );
        }

        let method = msg.method.as_deref().unwrap_or("unknown");
        log_ipc!(request, method, &msg.id);

        let result = match method {
            // System methods
            methods::PING => self.handle_ping(),
            methods::SHUTDOWN => self.handle_shutdown(),

            // Session methods
            methods::SESSION_OPEN => self.handle_session_open(&msg).await,
            methods::SESSION_CLOSE => self.handle_session_close().await,
            methods::SESSION_GET => self.handle_session_get().await,
            methods::SETTINGS_SET => self.handle_settings_set(&msg).await,

            // Screen methods
            methods::TIMELINE_LOAD => self.handle_timeline_load(&msg).await,
            methods::SCREEN_CLOSE => self.handle_screen_close(&msg).await,

            // Status methods
            methods::STATUS_RENDER => self.handle_status_render(&msg).await,
            methods::STATUS_ACTIONS => self.handle_status_actions(&msg).await,
            methods::STATUS_ACTION => self.handle_status_action(&msg).await,
            methods::STATUS_REBLOG => self.handle_toggle(&msg, Toggle::Reblog(true)).await,
            methods::STATUS_UNREBLOG => self.handle_toggle(&msg, Toggle::Reblog(false)).await,
            methods::STATUS_FAVOURITE => self.handle_toggle(&msg, Toggle::Favourite(true)).await,
            methods::STATUS_UNFAVOURITE => {
                self.handle_toggle(&msg, Toggle::Favourite(false)).await
            }
            methods::STATUS_REPLY => self.handle_status_reply(&msg).await,
            methods::STATUS_THREAD => self.handle_status_thread(&msg).await,
            methods::STATUS_OPEN_REBLOG => self.handle_status_open_reblog(&msg).await,

            // Media and link methods
            methods::MEDIA_VIEW => self.handle_media_view(&msg).await,
            methods::CARD_OPEN => self.handle_card_open(&msg).await,
            methods::ACCOUNT_VIEW => self.handle_account_view(&msg),
            methods::TAG_VIEW => self.handle_tag_view(&msg),

            // Unknown method
            _ => {
                warn!("Unknown method: {}", method);
                let err = IpcError::new(
                    error_codes::METHOD_NOT_FOUND,
                    format!("Unknown method: {}", method),
                );
                log_ipc!(response, method, &msg.id, false);
                return IpcMessage::response_err(&msg.id, err);
            }
        };

        let response = match result {
            Ok(value) => IpcMessage::response_ok(&msg.id, value),
            Err(e) => {
                debug!("{} failed: {}", method, e);
                IpcMessage::response_err(&msg.id, e.into())
            }
        };

        let success = response.error.is_none();
        log_ipc!(response, method, &msg.id, success);

        response
    }

    /// Handle ping request
    fn handle_ping(&self) -> CoreResult<Value> {
        Ok(json!({
            "pong": true,
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    /// Handle shutdown request
    fn handle_shutdown(&self) -> CoreResult<Value> {
        info!("Shutdown requested via IPC");
        let _ = self.shutdown_tx.send(());
        Ok(json!({ "status": "shutting_down" }))
    }

    async fn handle_session_open(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: OpenParams = parse_params(msg)?;
        info!("Opening session on {}", params.instance_url);

        let client = MastodonClient::from_token(&params.instance_url, &params.access_token)?;
        let account = client.verify_credentials().await?;
        let instance_url = client.instance_url().to_string();

        if let Some(store) = &self.store {
            let now = Utc::now();
            store
                .save_account(&StoredAccount {
                    account_id: account.id.clone(),
                    instance_url: instance_url.clone(),
                    acct: account.acct.clone(),
                    display_name: account.display_name.clone(),
                    access_token: params.access_token,
                    added_at: now,
                    last_used_at: now,
                    is_active: true,
                })
                .await?;
        }

        self.set_session(
            Arc::new(client),
            SessionContext::from_account(&account),
            instance_url.clone(),
        )
        .await;

        Ok(json!({
            "account": account,
            "instance_url": instance_url
        }))
    }

    async fn handle_session_close(&self) -> CoreResult<Value> {
        self.screens.lock().await.close_all();
        let was_open = self.session.write().await.take().is_some();

        if let Some(store) = &self.store {
            store.clear_active_account().await?;
        }

        info!("Session closed");
        Ok(json!({ "closed": was_open }))
    }

    async fn handle_session_get(&self) -> CoreResult<Value> {
        let session = self.session.read().await;
        Ok(match session.as_ref() {
            Some(s) => json!({
                "authenticated": true,
                "account_id": s.context.account_id,
                "username": s.context.username,
                "instance_url": s.instance_url
            }),
            None => json!({ "authenticated": false }),
        })
    }

    async fn handle_settings_set(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: SettingParams = parse_params(msg)?;

        let mut config = self.config.write().await;
        config.apply_setting(&params.key, &params.value)?;
        *self.renderer.write().await = RowRenderer::new(&config);

        if let Some(store) = &self.store {
            store.set_setting(&params.key, &params.value).await?;
        }

        info!("Setting {} changed", params.key);
        Ok(json!({ "key": params.key, "value": params.value }))
    }

    async fn handle_timeline_load(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: LoadParams = parse_params(msg)?;
        let (api, _) = self.session().await?;

        let request = TimelineRequest {
            timeline_type: params.timeline.clone(),
            limit: Some(params.limit.unwrap_or(self.config.read().await.page_size)),
            max_id: params.max_id,
            since_id: params.since_id,
        };
        let paging = if request.since_id.is_some() {
            Paging::Newer
        } else {
            Paging::Older
        };

        debug!("Fetching timeline: {:?}", request.timeline_type);
        let page = api.get_timeline(&request).await.inspect_err(|e| {
            error!("Failed to fetch timeline: {:#}", e);
        })?;

        self.sync_screens().await;

        let now = Utc::now();
        let renderer = self.renderer.read().await;
        let mut screens = self.screens.lock().await;
        let screen = screens.load(
            &params.screen_id,
            params.timeline,
            params.kind.unwrap_or(RowKind::Timeline),
            page.statuses,
            paging,
        );

        let rows: Vec<_> = screen
            .rows
            .statuses()
            .iter()
            .map(|status| renderer.render(status, screen.kind, now))
            .collect();

        Ok(json!({
            "screen_id": params.screen_id,
            "title": screen.timeline_type.display_name(),
            "rows": rows,
            "max_id": page.max_id,
            "min_id": page.min_id,
            "has_more": page.has_more
        }))
    }

    async fn handle_screen_close(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: ScreenParams = parse_params(msg)?;
        let cancelled = self.screens.lock().await.close(&params.screen_id)?;
        Ok(json!({ "cancelled": cancelled }))
    }

    async fn handle_status_render(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: RenderParams = parse_params(msg)?;
        let (status, kind) = self.row(&params.screen_id, params.position).await?;

        let row = self
            .renderer
            .read()
            .await
            .render(&status, params.kind.unwrap_or(kind), Utc::now());
        Ok(serde_json::to_value(row)?)
    }

    async fn handle_status_actions(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let target: RowTarget = parse_params(msg)?;
        let context = self
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.context.clone())
            .unwrap_or_else(SessionContext::anonymous);
        let (status, _) = self.row(&target.screen_id, target.position).await?;

        let actions = available_actions(&status, &context);
        Ok(json!({ "actions": actions }))
    }

    async fn handle_status_action(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: ActionParams = parse_params(msg)?;
        let (api, context) = self.session().await?;
        let (status, _) = self.row(&params.screen_id, params.position).await?;

        let dispatcher = Dispatcher::new(api, self.bus.clone());
        let (action, position) = (params.action, params.position);
        let effect = self
            .run_tracked(&params.screen_id, async move {
                dispatcher
                    .dispatch(action, &status, position, &context)
                    .await
            })
            .await?;

        if let Effect::RowRemoved {
            position,
            status_id,
        } = &effect
        {
            self.remove_row(&params.screen_id, *position, status_id).await;
        }
        self.sync_screens().await;

        Ok(serde_json::to_value(effect)?)
    }

    /// Reblog/favourite toggles answer with the re-rendered row; on error the
    /// UI reverts its optimistic toggle.
    async fn handle_toggle(&self, msg: &IpcMessage, toggle: Toggle) -> CoreResult<Value> {
        let target: RowTarget = parse_params(msg)?;
        let (api, _) = self.session().await?;
        let (status, kind) = self.row(&target.screen_id, target.position).await?;

        let dispatcher = Dispatcher::new(api, self.bus.clone());
        let updated = self
            .run_tracked(&target.screen_id, async move {
                match toggle {
                    Toggle::Reblog(on) => dispatcher.reblog(&status, on).await,
                    Toggle::Favourite(on) => dispatcher.favourite(&status, on).await,
                }
            })
            .await?;

        let renderer = self.renderer.read().await;
        let mut screens = self.screens.lock().await;
        screens.replace_actionable(&updated);

        let screen = screens.get(&target.screen_id)?;
        let row = screen.rows.get(target.position)?;
        let rendered = renderer.render(row, kind, Utc::now());
        Ok(serde_json::to_value(rendered)?)
    }

    async fn handle_status_reply(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let target: RowTarget = parse_params(msg)?;
        let (api, context) = self.session().await?;
        let (status, _) = self.row(&target.screen_id, target.position).await?;

        let intent = Dispatcher::new(api, self.bus.clone()).reply(&status, &context);
        Ok(serde_json::to_value(Navigation::Compose(intent))?)
    }

    async fn handle_status_thread(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let target: RowTarget = parse_params(msg)?;
        let (status, _) = self.row(&target.screen_id, target.position).await?;
        Ok(serde_json::to_value(navigation::view_thread(&status))?)
    }

    async fn handle_status_open_reblog(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let target: RowTarget = parse_params(msg)?;
        let (status, _) = self.row(&target.screen_id, target.position).await?;
        Ok(serde_json::to_value(navigation::open_reblog(Some(&status)))?)
    }

    async fn handle_media_view(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: MediaParams = parse_params(msg)?;
        let (status, _) = self.row(&params.screen_id, params.position).await?;
        let attachments = &status.actionable_status().media_attachments;

        let attachment = attachments
            .get(params.index)
            .ok_or(CoreError::MediaIndexOutOfRange {
                index: params.index,
                len: attachments.len(),
            })?;
        let urls: Vec<String> = attachments.iter().map(|a| a.url.clone()).collect();

        let intent = media::route(
            attachment.attachment_type,
            &urls,
            params.index,
            params.has_source_view,
        )?;
        Ok(serde_json::to_value(intent.map(Navigation::Media))?)
    }

    async fn handle_card_open(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let target: RowTarget = parse_params(msg)?;
        let (status, _) = self.row(&target.screen_id, target.position).await?;

        let layout = self.config.read().await.layout;
        let navigation = render_card(status.actionable_status(), &layout)
            .map(|card| card.select());
        Ok(serde_json::to_value(navigation)?)
    }

    fn handle_account_view(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: AccountParams = parse_params(msg)?;
        Ok(serde_json::to_value(navigation::view_account(&params.account_id))?)
    }

    fn handle_tag_view(&self, msg: &IpcMessage) -> CoreResult<Value> {
        let params: TagParams = parse_params(msg)?;
        Ok(serde_json::to_value(navigation::view_tag(&params.hashtag))?)
    }

    /// Client and context of the active session
    async fn session(&self) -> CoreResult<(Arc<dyn StatusApi>, SessionContext)> {
        let session = self.session.read().await;
        let session = session.as_ref().ok_or(CoreError::NotAuthenticated)?;
        Ok((session.api.clone(), session.context.clone()))
    }

    /// Copy of the status at a row, after pending bus events are applied
    async fn row(&self, screen_id: &str, position: usize) -> CoreResult<(Status, RowKind)> {
        self.sync_screens().await;

        let screens = self.screens.lock().await;
        let screen = screens.get(screen_id)?;
        Ok((screen.rows.get(position)?.clone(), screen.kind))
    }

    /// Apply queued bus events to every open screen
    async fn sync_screens(&self) -> usize {
        let mut pending = self.pending_events.lock().await;
        let mut screens = self.screens.lock().await;
        let mut removed = 0;

        loop {
            match pending.try_recv() {
                Ok(event) => removed += screens.apply_event(&event),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("Missed {} timeline events", missed);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if removed > 0 {
            debug!("Removed {} rows after timeline events", removed);
        }
        removed
    }

    /// Drop the dispatched row, looking it up again if earlier rows moved
    async fn remove_row(&self, screen_id: &str, position: usize, status_id: &str) {
        let mut screens = self.screens.lock().await;
        let Ok(screen) = screens.get_mut(screen_id) else {
            return;
        };

        let position = match screen.rows.get(position) {
            Ok(row) if row.id == status_id => Some(position),
            _ => screen.rows.position_of(status_id),
        };
        if let Some(position) = position {
            screen.rows.remove_item(position);
        }
    }

    /// Run a request as its own task, abortable by closing the screen
    async fn run_tracked<T, F>(&self, screen_id: &str, call: F) -> CoreResult<T>
    where
        F: Future<Output = CoreResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(call);

        {
            let mut screens = self.screens.lock().await;
            match screens.get_mut(screen_id) {
                Ok(screen) => screen.calls.track(handle.abort_handle()),
                Err(e) => {
                    handle.abort();
                    return Err(e);
                }
            }
        }

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                info!("Request on screen {} cancelled", screen_id);
                Err(CoreError::Cancelled)
            }
            Err(e) => {
                error!("Request task on screen {} failed: {}", screen_id, e);
                Err(CoreError::Api(anyhow::anyhow!("Request task failed: {}", e)))
            }
        }
    }
}

/// Deserialize the request params
fn parse_params<T: DeserializeOwned>(msg: &IpcMessage) -> CoreResult<T> {
    let params = msg
        .params
        .clone()
        .ok_or_else(|| CoreError::InvalidParams("Missing params".to_string()))?;
    Ok(serde_json::from_value(params)?)
}
