//! Authenticated HTTP client for the Souq marketplace backend.
//!
//! Every service wrapper funnels through [`ApiClient`]: it builds the full
//! URL from the configured base, attaches the bearer token when the call
//! needs one, and recovers once from token expiry. A 401 on an
//! authenticated call triggers exactly one refresh attempt followed by
//! exactly one retry of the original request; a second 401 is surfaced to
//! the caller. A failed refresh clears the token store and the original
//! 401 is reported. There is no backoff loop here; this is a one-shot
//! recovery, not a resilience mechanism.

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{AuthResponse, RefreshResponse, User};
use crate::session::{Session, TokenStore};

/// Whether a request must carry the session's bearer token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Auth {
    /// Attach the stored access token (when present) and refresh on 401.
    Required,
    /// Anonymous endpoint; never attach credentials.
    Public,
}

impl Auth {
    fn required(self) -> bool {
        matches!(self, Auth::Required)
    }
}

/// Lifetime granted to a token when the server omits `expiresIn` (ms).
const DEFAULT_EXPIRES_IN_MS: i64 = 86_400_000;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Build a client from a resolved configuration and an injected token
    /// store. The store is the only place session credentials live.
    pub fn new(config: ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()?;
        Ok(Self {
            http,
            config,
            store,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    // --- Verbs --------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, ApiError> {
        let res = self.send(Method::GET, path, None, auth).await?;
        Self::decode_response(res, path).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, auth: Auth) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Self::encode_body(path, body)?;
        let res = self.send(Method::POST, path, Some(body), auth).await?;
        Self::decode_response(res, path).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, auth: Auth) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Self::encode_body(path, body)?;
        let res = self.send(Method::PUT, path, Some(body), auth).await?;
        Self::decode_response(res, path).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, ApiError> {
        let res = self.send(Method::DELETE, path, None, auth).await?;
        Self::decode_response(res, path).await
    }

    // --- Session operations -------------------------------------------------

    /// Sign in and persist the returned session in the token store.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let data: AuthResponse = self
            .post(
                "/auth/login",
                &json!({ "email": email, "password": password }),
                Auth::Public,
            )
            .await?;
        self.persist_session(&data).await?;
        Ok(data)
    }

    /// Create an account and persist the returned session.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AuthResponse, ApiError> {
        let data: AuthResponse = self
            .post(
                "/auth/register",
                &json!({
                    "email": email,
                    "password": password,
                    "firstName": first_name,
                    "lastName": last_name,
                }),
                Auth::Public,
            )
            .await?;
        self.persist_session(&data).await?;
        Ok(data)
    }

    /// Tell the backend, then drop local credentials. The local clear
    /// happens even when the logout endpoint is unreachable.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(err) = self
            .post::<Value, _>("/auth/logout", &json!({}), Auth::Required)
            .await
        {
            log::debug!("[auth] logout endpoint failed: {err}");
        }
        self.store.clear().await
    }

    /// The signed-in user, per the backend.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me", Auth::Required).await
    }

    /// True when a session is stored and its access token is not stale.
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self
            .store
            .load()
            .await?
            .map(|s| !s.is_expired())
            .unwrap_or(false))
    }

    async fn persist_session(&self, data: &AuthResponse) -> Result<(), ApiError> {
        let expires_at =
            Utc::now() + ChronoDuration::milliseconds(data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_MS));
        self.store
            .save(Session {
                access_token: data.token.clone(),
                refresh_token: data.refresh_token.clone(),
                expires_at,
                user_id: data.user.id.to_string(),
                user_role: data.user.role.to_lowercase(),
            })
            .await
    }

    // --- Request pipeline ---------------------------------------------------

    /// Issue one request, with the one-shot refresh-and-retry on 401.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<Response, ApiError> {
        let url = self.config.api_url(path);
        let token = if auth.required() {
            self.store.load().await?.map(|s| s.access_token)
        } else {
            None
        };

        let res = self
            .dispatch(method.clone(), &url, body.as_ref(), token.as_deref())
            .await?;

        if res.status() == StatusCode::UNAUTHORIZED && auth.required() {
            log::debug!("[api] 401 on {path}, attempting token refresh");
            if self.refresh_access_token().await? {
                if let Some(session) = self.store.load().await? {
                    log::debug!("[api] refresh ok, retrying {path}");
                    return self
                        .dispatch(method, &url, body.as_ref(), Some(&session.access_token))
                        .await;
                }
            }
        }

        Ok(res)
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut req = self
            .http
            .request(method, url)
            .timeout(Duration::from_millis(self.config.http_timeout_ms))
            .header("Accept", "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }

    /// One refresh attempt. Returns whether a new access token was
    /// persisted; any rejection or transport failure clears the store.
    async fn refresh_access_token(&self) -> Result<bool, ApiError> {
        let Some(session) = self.store.load().await? else {
            return Ok(false);
        };

        let url = self.config.api_url("/auth/refresh");
        let outcome = self
            .http
            .post(&url)
            .timeout(Duration::from_millis(self.config.http_timeout_ms))
            .header("Accept", "application/json")
            .json(&json!({ "refreshToken": session.refresh_token }))
            .send()
            .await;

        match outcome {
            Ok(res) if res.status().is_success() => match res.json::<RefreshResponse>().await {
                Ok(data) => {
                    let expires_at = Utc::now()
                        + ChronoDuration::milliseconds(
                            data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_MS),
                        );
                    self.store
                        .update_access_token(data.token, expires_at)
                        .await?;
                    Ok(true)
                }
                Err(err) => {
                    log::warn!("[api] unreadable refresh response: {err}");
                    self.store.clear().await?;
                    Ok(false)
                }
            },
            Ok(res) => {
                log::warn!("[api] token refresh rejected: http {}", res.status());
                self.store.clear().await?;
                Ok(false)
            }
            Err(err) => {
                log::warn!("[api] token refresh failed: {err}");
                self.store.clear().await?;
                Ok(false)
            }
        }
    }

    // --- Body handling ------------------------------------------------------

    fn encode_body<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|e| ApiError::decode(format!("request body for {path}"), e))
    }

    async fn decode_response<T: DeserializeOwned>(res: Response, path: &str) -> Result<T, ApiError> {
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        // 204s and other empty bodies decode as JSON null.
        let text = res.text().await?;
        let value: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::decode(path, e))?
        };
        serde_json::from_value(value).map_err(|e| ApiError::decode(path, e))
    }
}

/// Best-effort extraction of the server's error message from a JSON body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                trimmed.to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_server_json_message() {
        let msg = error_message(
            StatusCode::FORBIDDEN,
            r#"{"message":"Admin role required","code":"forbidden"}"#,
        );
        assert_eq!(msg, "Admin role required");
    }

    #[test]
    fn error_message_falls_back_to_raw_body_then_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream exploded"),
            "upstream exploded"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }

    #[test]
    fn auth_flag() {
        assert!(Auth::Required.required());
        assert!(!Auth::Public.required());
    }
}
