use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::AuthError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves a bearer token to a user id.
#[async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    async fn resolve_user(&self, token: &str) -> Result<String, AuthError>;
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
}

/// Verifies tokens against Supabase's auth endpoint. The token is the
/// user's Supabase session JWT; a 2xx response carries the user record.
pub struct SupabaseVerifier {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseVerifier {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url,
            anon_key,
        }
    }
}

#[async_trait]
impl TokenVerifier for SupabaseVerifier {
    async fn resolve_user(&self, token: &str) -> Result<String, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            debug!("token verification rejected with {}", response.status());
            return Err(AuthError::InvalidToken);
        }

        let user: SupabaseUser = response
            .json()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        Ok(user.id)
    }
}

/// Fixed token table for tests and local development.
pub struct StaticTokenVerifier {
    tokens: RwLock<HashMap<String, String>>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, token: &str, user_id: &str) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.to_string(), user_id.to_string());
        }
    }
}

impl Default for StaticTokenVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn resolve_user(&self, token: &str) -> Result<String, AuthError> {
        let tokens = self
            .tokens
            .read()
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_verifier_resolves_registered_tokens() {
        let verifier = StaticTokenVerifier::new();
        verifier.register("tok-1", "user-1");

        assert_eq!(verifier.resolve_user("tok-1").await.unwrap(), "user-1");
        assert!(matches!(
            verifier.resolve_user("tok-2").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
