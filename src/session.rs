//! Session credentials and the token store.
//!
//! The store owns the session exclusively: it is created on login or
//! registration, its access token is swapped on refresh, and it is destroyed
//! on logout or when a refresh attempt fails for good. The client receives
//! the store as an injected collaborator, never through a global.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::spawn_blocking;

use crate::error::ApiError;

/// Access token is treated as stale this long before its real deadline.
const EXPIRY_SLACK_MINUTES: i64 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: String,
    pub user_role: String,
}

impl Session {
    /// True once the access token is within the slack window of its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at - Duration::minutes(EXPIRY_SLACK_MINUTES)
    }
}

/// Persistent holder for the current session's credentials.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, ApiError>;
    async fn save(&self, session: Session) -> Result<(), ApiError>;
    /// Swap the access token and expiry in place after a refresh. The
    /// refresh token and user identity are untouched.
    async fn update_access_token(
        &self,
        access_token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ApiError>;
    async fn clear(&self) -> Result<(), ApiError>;
}

// --- In-memory store --------------------------------------------------------

/// Process-local store. Useful in tests and for embedders that manage
/// persistence themselves.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<Mutex<Option<Session>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.inner.lock().expect("store lock").clone())
    }

    async fn save(&self, session: Session) -> Result<(), ApiError> {
        *self.inner.lock().expect("store lock") = Some(session);
        Ok(())
    }

    async fn update_access_token(
        &self,
        access_token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        if let Some(s) = self.inner.lock().expect("store lock").as_mut() {
            s.access_token = access_token;
            s.expires_at = expires_at;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        *self.inner.lock().expect("store lock") = None;
        Ok(())
    }
}

// --- SQLite-backed store ----------------------------------------------------

enum StoreMsg {
    Load {
        resp: oneshot::Sender<Result<Option<Session>, String>>,
    },
    Save {
        session: Session,
        resp: oneshot::Sender<Result<(), String>>,
    },
    UpdateAccess {
        access_token: String,
        expires_at: DateTime<Utc>,
        resp: oneshot::Sender<Result<(), String>>,
    },
    Clear {
        resp: oneshot::Sender<Result<(), String>>,
    },
}

/// Durable single-row session store. The connection lives on a blocking
/// worker; callers talk to it over a channel, so the async side never
/// touches SQLite directly.
#[derive(Clone)]
pub struct SqliteTokenStore {
    tx: UnboundedSender<StoreMsg>,
}

impl SqliteTokenStore {
    pub fn open(db_path: &str) -> Self {
        let (tx, mut rx) = unbounded_channel::<StoreMsg>();
        let path = db_path.to_string();

        tokio::spawn(async move {
            // single worker connection off the async threads
            let _ = spawn_blocking(move || -> anyhow::Result<()> {
                let conn = Connection::open(path)?;
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "busy_timeout", 250)?;
                conn.execute_batch(
                    r#"
                    CREATE TABLE IF NOT EXISTS session(
                        id            INTEGER PRIMARY KEY CHECK (id = 1),
                        access_token  TEXT NOT NULL,
                        refresh_token TEXT NOT NULL,
                        expires_at    TEXT NOT NULL,
                        user_id       TEXT NOT NULL,
                        user_role     TEXT NOT NULL
                    );
                "#,
                )?;

                while let Some(msg) = rx.blocking_recv() {
                    match msg {
                        StoreMsg::Load { resp } => {
                            let _ = resp.send(load_db(&conn).map_err(|e| e.to_string()));
                        }
                        StoreMsg::Save { session, resp } => {
                            let _ = resp.send(save_db(&conn, &session).map_err(|e| e.to_string()));
                        }
                        StoreMsg::UpdateAccess {
                            access_token,
                            expires_at,
                            resp,
                        } => {
                            let _ = resp.send(
                                update_access_db(&conn, &access_token, expires_at)
                                    .map_err(|e| e.to_string()),
                            );
                        }
                        StoreMsg::Clear { resp } => {
                            let _ = resp.send(clear_db(&conn).map_err(|e| e.to_string()));
                        }
                    }
                }
                Ok(())
            })
            .await;
        });

        Self { tx }
    }

    async fn roundtrip<T>(
        &self,
        msg: StoreMsg,
        resp_rx: oneshot::Receiver<Result<T, String>>,
    ) -> Result<T, ApiError> {
        self.tx
            .send(msg)
            .map_err(|_| ApiError::Store("session store worker stopped".into()))?;
        resp_rx
            .await
            .map_err(|_| ApiError::Store("session store worker dropped reply".into()))?
            .map_err(ApiError::Store)
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn load(&self) -> Result<Option<Session>, ApiError> {
        let (resp, resp_rx) = oneshot::channel();
        self.roundtrip(StoreMsg::Load { resp }, resp_rx).await
    }

    async fn save(&self, session: Session) -> Result<(), ApiError> {
        let (resp, resp_rx) = oneshot::channel();
        self.roundtrip(StoreMsg::Save { session, resp }, resp_rx)
            .await
    }

    async fn update_access_token(
        &self,
        access_token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let (resp, resp_rx) = oneshot::channel();
        self.roundtrip(
            StoreMsg::UpdateAccess {
                access_token,
                expires_at,
                resp,
            },
            resp_rx,
        )
        .await
    }

    async fn clear(&self) -> Result<(), ApiError> {
        let (resp, resp_rx) = oneshot::channel();
        self.roundtrip(StoreMsg::Clear { resp }, resp_rx).await
    }
}

fn load_db(conn: &Connection) -> anyhow::Result<Option<Session>> {
    let row = conn
        .query_row(
            "SELECT access_token, refresh_token, expires_at, user_id, user_role
             FROM session WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    match row {
        None => Ok(None),
        Some((access_token, refresh_token, expires_at, user_id, user_role)) => {
            let expires_at = DateTime::parse_from_rfc3339(&expires_at)?.with_timezone(&Utc);
            Ok(Some(Session {
                access_token,
                refresh_token,
                expires_at,
                user_id,
                user_role,
            }))
        }
    }
}

fn save_db(conn: &Connection, s: &Session) -> anyhow::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO session(id, access_token, refresh_token, expires_at, user_id, user_role)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        params![
            s.access_token,
            s.refresh_token,
            s.expires_at.to_rfc3339(),
            s.user_id,
            s.user_role,
        ],
    )?;
    Ok(())
}

fn update_access_db(
    conn: &Connection,
    access_token: &str,
    expires_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE session SET access_token = ?1, expires_at = ?2 WHERE id = 1",
        params![access_token, expires_at.to_rfc3339()],
    )?;
    Ok(())
}

fn clear_db(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("DELETE FROM session", [])?;
    Ok(())
}
