//! Supabase Auth (GoTrue) over HTTP.

use std::time::Duration;

use chrono::Utc;
use reqwest::{StatusCode, Url};
use tokio::sync::{broadcast, RwLock};

use super::{AuthError, AuthEvent, BoxFuture, IdentityProvider, OAuthProvider, ProviderSession, ProviderUser};
use crate::config::SupabaseConfig;

const EVENT_CAPACITY: usize = 16;

pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<ProviderSession>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SupabaseAuth {
    pub fn new(config: &SupabaseConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
            events,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    async fn fetch_user(&self, access_token: &str) -> Result<Option<ProviderSession>, AuthError> {
        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user: ProviderUser = response.json().await?;
                Ok(Some(ProviderSession {
                    access_token: access_token.to_string(),
                    expires_at: None,
                    user: Some(user),
                }))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AuthError::Provider(format!("user lookup returned {}: {}", status, body)))
            }
        }
    }

    async fn revoke(&self, access_token: &str) -> Result<(), AuthError> {
        let was_held = {
            let mut held = self.session.write().await;
            if held.as_ref().is_some_and(|s| s.access_token == access_token) {
                *held = None;
                true
            } else {
                false
            }
        };
        if was_held {
            self.emit(AuthEvent::signed_out());
        }

        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(AuthError::Provider(format!("logout returned {}", response.status())))
        }
    }
}

impl IdentityProvider for SupabaseAuth {
    fn get_session(&self) -> BoxFuture<'_, Result<Option<ProviderSession>, AuthError>> {
        Box::pin(async move {
            let mut held = self.session.write().await;
            if held.as_ref().is_some_and(|s| s.is_expired(Utc::now())) {
                tracing::info!("Held session expired");
                *held = None;
                drop(held);
                self.emit(AuthEvent::signed_out());
                return Ok(None);
            }
            Ok(held.clone())
        })
    }

    fn get_user<'a>(
        &'a self,
        access_token: &'a str,
    ) -> BoxFuture<'a, Result<Option<ProviderSession>, AuthError>> {
        Box::pin(self.fetch_user(access_token))
    }

    fn set_session<'a>(
        &'a self,
        access_token: &'a str,
    ) -> BoxFuture<'a, Result<ProviderSession, AuthError>> {
        Box::pin(async move {
            let session = self
                .fetch_user(access_token)
                .await?
                .ok_or_else(|| AuthError::Provider("access token was rejected".into()))?;
            *self.session.write().await = Some(session.clone());
            self.emit(AuthEvent::signed_in(session.clone()));
            Ok(session)
        })
    }

    fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &self.endpoint("authorize"),
            &[("provider", provider.as_str()), ("redirect_to", redirect_to)],
        )
        .map_err(|e| AuthError::Provider(format!("invalid provider URL: {}", e)))?;
        Ok(url.into())
    }

    fn sign_out<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, Result<(), AuthError>> {
        Box::pin(self.revoke(access_token))
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
