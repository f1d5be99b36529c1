/// Session token issuance and verification
///
/// Tokens are HS256-signed JWTs carrying the session claims. The key pair is
/// derived once from the configured secret and is immutable afterwards; both
/// operations are pure computation and never block.
///
/// Verification fails **closed**: a malformed token, a bad signature, and an
/// expired token are all reported identically as `None`. Callers only ever
/// learn "valid claims" or "no valid claims" — this keeps the error surface
/// from acting as an oracle.
///
/// # Example
///
/// ```
/// use linkdesk_shared::auth::token::{Claims, TokenService};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("a-secret-that-is-at-least-32-bytes!!");
/// let claims = Claims::new(Uuid::new_v4(), "ana@example.com", "admin");
///
/// let token = tokens.issue(&claims)?;
/// assert_eq!(tokens.verify(&token).unwrap().sub, claims.sub);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed session lifetime: 24 hours from issuance.
pub const TOKEN_TTL_SECONDS: i64 = 86_400;

/// Error type for token issuance
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign the claims
    #[error("failed to issue token: {0}")]
    Issue(String),
}

/// Decoded session token payload.
///
/// Derived from an [`crate::store::Identity`] at login; validity is entirely
/// a function of the signature and the timestamps, nothing is persisted
/// server-side. The subject may outlive the identity it was minted from —
/// there is no revocation-on-delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — identity id
    pub sub: Uuid,

    /// Email at issuance time
    pub email: String,

    /// Role at issuance time
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp, issuance + 24h)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring [`TOKEN_TTL_SECONDS`] from now.
    pub fn new(sub: Uuid, email: &str, role: &str) -> Self {
        Self::expiring_in(sub, email, role, Duration::seconds(TOKEN_TTL_SECONDS))
    }

    /// Creates claims with a custom lifetime. Useful for tests; a negative
    /// duration produces claims that are already expired.
    pub fn expiring_in(sub: Uuid, email: &str, role: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub,
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Whether the claims are past their expiration.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Issues and verifies signed session tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Derives the signing and verification keys from the process-wide
    /// secret. The secret is validated (present, long enough) by the
    /// configuration layer before this is ever called.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No leeway: a token is invalid one second past `exp`.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Signs the claims into a token string.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Issue(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// Fails closed: any defect — malformed encoding, signature mismatch,
    /// expiry — yields `None` without distinguishing the cause.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-key-at-least-32-bytes-long")
    }

    #[test]
    fn issue_verify_roundtrip() {
        let tokens = service();
        let claims = Claims::new(Uuid::new_v4(), "ana@example.com", "admin");

        let token = tokens.issue(&claims).expect("should issue");
        let verified = tokens.verify(&token).expect("should verify");

        assert_eq!(verified, claims);
    }

    #[test]
    fn expired_token_is_invalid() {
        let tokens = service();
        let claims = Claims::expiring_in(
            Uuid::new_v4(),
            "ana@example.com",
            "admin",
            Duration::seconds(-1),
        );
        assert!(claims.is_expired());

        let token = tokens.issue(&claims).expect("should issue");
        assert!(tokens.verify(&token).is_none());
    }

    #[test]
    fn tampered_token_is_invalid() {
        let tokens = service();
        let claims = Claims::new(Uuid::new_v4(), "ana@example.com", "admin");
        let token = tokens.issue(&claims).expect("should issue");

        // Flip one byte in every position; verification must fail each time.
        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] ^= 1;
            if let Ok(tampered) = String::from_utf8(bytes) {
                assert!(
                    tokens.verify(&tampered).is_none(),
                    "byte {} flip slipped through",
                    i
                );
            }
        }
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let claims = Claims::new(Uuid::new_v4(), "ana@example.com", "admin");
        let token = service().issue(&claims).expect("should issue");

        let other = TokenService::new("another-secret-key-also-32-bytes-yes");
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn garbage_is_invalid() {
        let tokens = service();
        assert!(tokens.verify("").is_none());
        assert!(tokens.verify("not-a-jwt").is_none());
        assert!(tokens.verify("a.b.c").is_none());
    }

    #[test]
    fn claims_carry_24h_ttl() {
        let claims = Claims::new(Uuid::new_v4(), "ana@example.com", "user");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
        assert!(!claims.is_expired());
    }
}
