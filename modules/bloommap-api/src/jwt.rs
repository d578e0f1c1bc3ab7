use anyhow::Result;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const AUDIENCE: &str = "authenticated";
pub const COOKIE_NAME: &str = "sb_access_token";

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

/// Claims carried by a hosted-auth access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl Claims {
    /// Display name from the sign-up metadata, falling back to the email's
    /// local part.
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata
            .nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.email.as_deref().and_then(|e| e.split('@').next()))
    }
}

/// Verifies access tokens signed with the project's shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token for `user_id`. Used by local tooling and tests; real
    /// tokens are issued by the hosted auth service.
    pub fn create_token(&self, user_id: &str, nickname: Option<&str>, ttl_secs: i64) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            aud: AUDIENCE.to_string(),
            exp: now + ttl_secs,
            iat: now,
            email: None,
            user_metadata: UserMetadata {
                nickname: nickname.map(str::to_string),
            },
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a token. Returns claims if valid and not expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[AUDIENCE]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

/// Parse the access token cookie value from a Cookie header string.
pub fn parse_auth_cookie(header: &str) -> Option<&str> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(COOKIE_NAME) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value);
            }
        }
    }
    None
}

/// Extract the token from an `Authorization: Bearer` header value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new("test-secret-key")
    }

    #[test]
    fn roundtrip_token() {
        let svc = test_service();
        let token = svc.create_token("user-1", Some("Blossom"), 3600).unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.aud, "authenticated");
        assert_eq!(claims.display_name(), Some("Blossom"));
    }

    #[test]
    fn rejects_invalid_token() {
        let svc = test_service();
        assert!(svc.verify_token("garbage").is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let svc1 = JwtService::new("secret-a");
        let svc2 = JwtService::new("secret-b");
        let token = svc1.create_token("user-1", None, 3600).unwrap();
        assert!(svc2.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let svc = test_service();
        let token = svc.create_token("user-1", None, -3600).unwrap();
        assert!(svc.verify_token(&token).is_err());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let claims = Claims {
            sub: "u".into(),
            aud: AUDIENCE.into(),
            exp: 0,
            iat: 0,
            email: Some("hana@example.com".into()),
            user_metadata: UserMetadata::default(),
        };
        assert_eq!(claims.display_name(), Some("hana"));
    }

    #[test]
    fn parse_cookie() {
        assert_eq!(
            parse_auth_cookie("sb_access_token=abc123; other=xyz"),
            Some("abc123")
        );
        assert_eq!(
            parse_auth_cookie("other=xyz; sb_access_token=abc123"),
            Some("abc123")
        );
        assert_eq!(parse_auth_cookie("other=xyz"), None);
    }

    #[test]
    fn parse_bearer_header() {
        assert_eq!(parse_bearer("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Basic abc"), None);
    }
}
