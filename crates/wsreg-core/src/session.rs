//! Durable session storage.
//!
//! The session lives in `${WSREG_HOME}/session.json` as a small key/value
//! document:
//!
//! ```json
//! { "currentUser": "ABC123", "userData": { "ticketId": "ABC123", ... } }
//! ```
//!
//! Both keys are written and removed together. There is no server-side
//! validation on restore: whatever was stored is trusted.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::LoginUser;
use crate::config::paths;
use crate::models::{AdminScope, Identity};

/// Key holding the bare ticket id.
pub const CURRENT_USER_KEY: &str = "currentUser";
/// Key holding the serialized identity details.
pub const USER_DATA_KEY: &str = "userData";

/// Identity details as persisted under `userData`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityRecord {
    ticket_id: String,
    first_name: String,
    last_name: String,
    full_name: String,
    is_admin: bool,
    #[serde(default)]
    admin_workshops: AdminScope,
}

impl From<&Identity> for IdentityRecord {
    fn from(identity: &Identity) -> Self {
        Self {
            ticket_id: identity.ticket_id.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            full_name: identity.full_name(),
            is_admin: identity.is_admin,
            admin_workshops: identity.admin_scope.clone(),
        }
    }
}

impl From<IdentityRecord> for Identity {
    fn from(record: IdentityRecord) -> Self {
        Self {
            ticket_id: record.ticket_id,
            first_name: record.first_name,
            last_name: record.last_name,
            is_admin: record.is_admin,
            admin_scope: record.admin_workshops,
        }
    }
}

impl From<LoginUser> for Identity {
    fn from(user: LoginUser) -> Self {
        Self {
            ticket_id: user.ticket_id,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: user.is_admin,
            admin_scope: AdminScope::from(user.admin_workshops),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "currentUser")]
    current_user: String,
    #[serde(rename = "userData")]
    user_data: IdentityRecord,
}

/// File-backed store for the current identity.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at `${WSREG_HOME}/session.json`.
    pub fn open_default() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted identity, if any.
    ///
    /// A missing file is "no session". So is an unreadable or corrupt one;
    /// that case is logged and otherwise ignored.
    pub fn restore(&self) -> Option<Identity> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read session");
                return None;
            }
        };

        match serde_json::from_str::<SessionFile>(&contents) {
            Ok(file) if file.current_user == file.user_data.ticket_id => {
                Some(file.user_data.into())
            }
            Ok(file) => {
                tracing::warn!(
                    current_user = %file.current_user,
                    "session keys disagree, ignoring stored session"
                );
                None
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "corrupt session file");
                None
            }
        }
    }

    /// Persists `identity` as the current session.
    pub fn establish(&self, identity: &Identity) -> Result<()> {
        let file = SessionFile {
            current_user: identity.ticket_id.clone(),
            user_data: IdentityRecord::from(identity),
        };
        let json = serde_json::to_string_pretty(&file).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write session to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        tracing::info!(ticket = %identity.ticket_id, "session established");
        Ok(())
    }

    /// Removes the persisted session. Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("session cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove session {}", self.path.display())),
        }
    }
}
