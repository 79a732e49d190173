//! Shared-secret authentication for cabinet operators.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Authenticator that validates requests against a configured API key.
///
/// Accepts the key in either:
/// - `Authorization: Bearer <key>` header
/// - `X-API-Key: <key>` header
pub struct ApiKeyAuthenticator {
    expected_key: String,
    user_id: String,
}

impl ApiKeyAuthenticator {
    pub fn new(api_key: String) -> Self {
        let digest = Sha256::digest(api_key.as_bytes());
        let user_id = format!("key-{}", hex_prefix(&digest, 6));
        Self {
            expected_key: api_key,
            user_id,
        }
    }

    fn extract_key<'a>(&self, request: &'a AuthRequest) -> Option<&'a str> {
        if let Some(auth_header) = request.headers.get("authorization") {
            if let Some(key) = auth_header
                .strip_prefix("Bearer ")
                .or_else(|| auth_header.strip_prefix("bearer "))
            {
                return Some(key);
            }
        }

        request.headers.get("x-api-key").map(String::as_str)
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let provided_key = self
            .extract_key(request)
            .ok_or(AuthError::NotAuthenticated)?;

        if constant_time_eq(provided_key.as_bytes(), self.expected_key.as_bytes()) {
            Ok(Identity {
                user_id: self.user_id.clone(),
                method: "api_key".to_string(),
                claims: HashMap::new(),
            })
        } else {
            Err(AuthError::InvalidCredentials("Invalid API key".to_string()))
        }
    }

    fn method_name(&self) -> &'static str {
        "api_key"
    }
}

fn hex_prefix(bytes: &[u8], len: usize) -> String {
    bytes.iter().take(len).map(|b| format!("{:02x}", b)).collect()
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn make_request(headers: Vec<(&str, &str)>) -> AuthRequest {
        AuthRequest {
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
            source_ip: "127.0.0.1".parse::<IpAddr>().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_bearer_token_valid() {
        let auth = ApiKeyAuthenticator::new("coin-op-123".to_string());
        let request = make_request(vec![("Authorization", "Bearer coin-op-123")]);

        let identity = auth.authenticate(&request).await.unwrap();

        assert!(identity.user_id.starts_with("key-"));
        assert_eq!(identity.user_id.len(), "key-".len() + 12);
        assert_eq!(identity.method, "api_key");
    }

    #[tokio::test]
    async fn test_x_api_key_header_valid() {
        let auth = ApiKeyAuthenticator::new("coin-op-123".to_string());
        let request = make_request(vec![("X-API-Key", "coin-op-123")]);

        assert!(auth.authenticate(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_user_id_stable_per_key() {
        let a = ApiKeyAuthenticator::new("one".to_string());
        let b = ApiKeyAuthenticator::new("one".to_string());
        let c = ApiKeyAuthenticator::new("two".to_string());

        let id_a = a
            .authenticate(&make_request(vec![("X-API-Key", "one")]))
            .await
            .unwrap();
        let id_b = b
            .authenticate(&make_request(vec![("X-API-Key", "one")]))
            .await
            .unwrap();
        let id_c = c
            .authenticate(&make_request(vec![("X-API-Key", "two")]))
            .await
            .unwrap();

        assert_eq!(id_a.user_id, id_b.user_id);
        assert_ne!(id_a.user_id, id_c.user_id);
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let auth = ApiKeyAuthenticator::new("coin-op-123".to_string());
        let request = make_request(vec![("Authorization", "Bearer wrong-key")]);

        let result = auth.authenticate(&request).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_missing_header() {
        let auth = ApiKeyAuthenticator::new("coin-op-123".to_string());

        let result = auth.authenticate(&make_request(vec![])).await;

        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
        assert!(!auth.admits_everyone());
    }

    #[tokio::test]
    async fn test_bearer_lowercase() {
        let auth = ApiKeyAuthenticator::new("coin-op-123".to_string());
        let request = make_request(vec![("Authorization", "bearer coin-op-123")]);

        assert!(auth.authenticate(&request).await.is_ok());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(constant_time_eq(b"", b""));
    }
}
