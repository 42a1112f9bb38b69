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

//! Account store for local data storage
//!
//! Uses SQLite to keep the logged-in account and UI settings across
//! restarts.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::models::StoredAccount;

/// Persistent store for the active account and settings
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    /// Open (or create) the database file at `path`
    pub async fn open(path: &Path) -> CoreResult<Self> {
        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::Config(format!("{}: {}", parent.display(), e)))?;
        }

        info!("Opening account database at {}", path.display());
        Self::connect(&format!("sqlite:{}?mode=rwc", path.display()), 5).await
    }

    /// Connect to a database URL and make sure the schema exists
    pub async fn connect(url: &str, max_connections: u32) -> CoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        Ok(store)
    }

    async fn init_schema(&self) -> CoreResult<()> {
        debug!("Initializing account schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                instance_url TEXT NOT NULL,
                acct TEXT NOT NULL,
                access_token TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                last_used_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                is_active INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ===== ACCOUNT METHODS =====

    /// Save an account and make it the only active one
    pub async fn save_account(&self, account: &StoredAccount) -> CoreResult<()> {
        let data = serde_json::to_string(account)
            .map_err(|e| CoreError::Config(format!("account encoding: {}", e)))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE accounts SET is_active = 0")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, instance_url, acct, access_token, data, created_at, last_used_at, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, 1)
            ON CONFLICT(id) DO UPDATE SET
                instance_url = excluded.instance_url,
                acct = excluded.acct,
                access_token = excluded.access_token,
                data = excluded.data,
                last_used_at = excluded.last_used_at,
                is_active = 1
            "#,
        )
        .bind(store_key(account))
        .bind(&account.instance_url)
        .bind(&account.acct)
        .bind(&account.access_token)
        .bind(&data)
        .bind(account.added_at.to_rfc3339())
        .bind(account.last_used_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Saved account {} ({})", account.acct, account.account_id);
        Ok(())
    }

    /// The account marked active, with its access token restored
    pub async fn get_active_account(&self) -> CoreResult<Option<StoredAccount>> {
        let row: Option<(String, String)> = sqlx::query_as(
            "SELECT data, access_token FROM accounts WHERE is_active = 1 ORDER BY last_used_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((data, access_token)) => {
                let mut account: StoredAccount = serde_json::from_str(&data)
                    .map_err(|e| CoreError::Config(format!("stored account: {}", e)))?;
                // The token is kept out of the JSON blob
                account.access_token = access_token;
                account.is_active = true;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    /// Forget the active account and its token
    pub async fn clear_active_account(&self) -> CoreResult<u64> {
        let result = sqlx::query("DELETE FROM accounts WHERE is_active = 1")
            .execute(&self.pool)
            .await?;

        debug!("Cleared {} active account(s)", result.rows_affected());
        Ok(result.rows_affected())
    }

    // ===== SETTINGS METHODS =====

    /// Get a setting value
    pub async fn get_setting(&self, key: &str) -> CoreResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(v,)| v))
    }

    /// Set a setting value
    pub async fn set_setting(&self, key: &str, value: &str) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!("Set setting {} = {}", key, value);
        Ok(())
    }
}

/// Account ids are only unique per instance
fn store_key(account: &StoredAccount) -> String {
    format!("{}@{}", account.account_id, account.instance_url)
}
