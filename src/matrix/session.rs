//! Persistence of the Matrix login between restarts.

use std::path::{Path, PathBuf};

use log::{debug, trace};
use matrix_sdk::authentication::matrix::MatrixSession;
use serde::{Deserialize, Serialize};
use tokio::fs;

/// File holding the login and the sync token.
const SESSION_FILE: &str = "session.json";
/// Directory of the SDK SQLite stores.
const SQLITE_DIR: &str = "sqlite";

/// Content of the session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    /// Access token, device and user of the bot login
    user_session: MatrixSession,
    /// Where the next sync resumes, absent until the first sync
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Session directory of the bot.
///
/// # File Structure
///
/// - `session.json`: login and sync token
/// - `sqlite/`: Matrix SDK state and crypto stores, encrypted with the passphrase
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Session read at startup, `None` on first run
    session: Option<PersistedSession>,
    /// Path of `session.json`
    session_path: PathBuf,
    /// Path of the SQLite directory
    sqlite_path: PathBuf,
}

impl SessionStore {
    /// Opens the session directory, creating it when needed.
    ///
    /// A missing or unreadable session file means a fresh login.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;

        let session_path = dir.join(SESSION_FILE);
        let sqlite_path = dir.join(SQLITE_DIR);

        let session = match Self::read(&session_path).await {
            Ok(session) => {
                debug!("found session for {}", session.user_session.meta.user_id);
                Some(session)
            }
            Err(e) => {
                debug!("no usable session at {}: {}", session_path.display(), e);
                None
            }
        };

        Ok(SessionStore {
            session,
            session_path,
            sqlite_path,
        })
    }

    async fn read(path: &Path) -> Result<PersistedSession, anyhow::Error> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Whether a previous login can be restored.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    /// Login read at startup.
    pub fn user_session(&self) -> Option<&MatrixSession> {
        self.session.as_ref().map(|s| &s.user_session)
    }

    /// Sync token read at startup.
    pub fn sync_token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.sync_token.as_deref())
    }

    /// Writes a fresh login, dropping any previous sync token.
    pub async fn save_user_session(
        &self,
        user_session: &MatrixSession,
    ) -> Result<(), anyhow::Error> {
        trace!("saving user session");
        self.write(&PersistedSession {
            user_session: user_session.clone(),
            sync_token: None,
        })
        .await
    }

    /// Updates the sync token, keeping the stored login.
    pub async fn save_sync_token(&self, sync_token: &str) -> Result<(), anyhow::Error> {
        trace!("saving sync token {}", sync_token);
        let mut session = Self::read(&self.session_path).await?;
        session.sync_token = Some(sync_token.to_owned());
        self.write(&session).await
    }

    async fn write(&self, session: &PersistedSession) -> Result<(), anyhow::Error> {
        fs::write(&self.session_path, serde_json::to_string(session)?).await?;
        Ok(())
    }
}
