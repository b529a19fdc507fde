//! Signed bearer tokens.
//!
//! Tokens are compact HS256 JWS strings keyed by the API key secret. A new
//! token is minted for every outgoing request; nothing here caches.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::credentials::{ApiKey, InstanceLocator};
use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of every generated token, in seconds.
pub const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Instance id from the locator.
    pub instance: String,
    /// `api_keys/<key-id>`.
    pub iss: String,
    /// Issued-at, Unix seconds.
    pub iat: u64,
    /// Expiry, always `iat + 86400`.
    pub exp: u64,
    /// User the token acts as.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Superuser flag; only ever serialized as `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub su: Option<bool>,
}

/// A signed token plus its lifetime.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The compact `header.payload.signature` string.
    pub token: String,
    /// Seconds until expiry.
    pub expires_in: u64,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Token payload handed to end-user clients by [`TokenGenerator::authenticate_user`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    /// The signed user token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: u64,
}

/// Mints tokens for one instance and key.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    locator: InstanceLocator,
    key: ApiKey,
}

impl TokenGenerator {
    /// Create a generator from already-parsed credentials.
    #[must_use]
    pub const fn new(locator: InstanceLocator, key: ApiKey) -> Self {
        Self { locator, key }
    }

    /// Parse raw locator and key strings.
    pub fn from_strings(locator: &str, key: &str) -> Result<Self> {
        Ok(Self::new(InstanceLocator::parse(locator)?, ApiKey::parse(key)?))
    }

    /// The locator this generator signs for.
    #[must_use]
    pub const fn locator(&self) -> &InstanceLocator {
        &self.locator
    }

    /// Mint a token issued now.
    pub fn generate(&self, subject: Option<&str>, superuser: bool) -> Result<Token> {
        self.generate_at(unix_now()?, subject, superuser)
    }

    /// Mint a token with an explicit issue time.
    pub fn generate_at(&self, iat: u64, subject: Option<&str>, superuser: bool) -> Result<Token> {
        let exp = iat
            .checked_add(TOKEN_TTL_SECS)
            .ok_or_else(|| Error::Configuration(format!("issue time {iat} overflows expiry")))?;
        let claims = Claims {
            instance: self.locator.instance_id().to_owned(),
            iss: format!("api_keys/{}", self.key.id()),
            iat,
            exp,
            sub: subject.map(str::to_owned),
            su: superuser.then_some(true),
        };
        Ok(Token {
            token: self.sign(&claims)?,
            expires_in: TOKEN_TTL_SECS,
        })
    }

    /// Issue a subject-scoped token in the shape end-user SDKs expect.
    pub fn authenticate_user(&self, user_id: &str) -> Result<AuthenticationResponse> {
        if user_id.is_empty() {
            return Err(Error::InvalidArgument("user id must not be empty".into()));
        }
        let token = self.generate(Some(user_id), false)?;
        Ok(AuthenticationResponse {
            access_token: token.token,
            token_type: "bearer".into(),
            expires_in: token.expires_in,
        })
    }

    /// Check a token's signature against this key and return its claims.
    ///
    /// Expiry is not checked.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Configuration("token is not a compact JWS".into()));
        };
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| Error::Configuration(format!("token signature: {e}")))?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| Error::Configuration("token signature mismatch".into()))?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| Error::Configuration(format!("token payload: {e}")))?;
        serde_json::from_slice(&payload)
            .map_err(|e| Error::Configuration(format!("token claims: {e}")))
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        let payload = serde_json::to_vec(claims)
            .map_err(|e| Error::Configuration(format!("token claims: {e}")))?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.key.secret())
            .map_err(|e| Error::Configuration(format!("API key secret: {e}")))
    }
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| Error::Configuration(format!("system clock before Unix epoch: {e}")))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn generator() -> TokenGenerator {
        TokenGenerator::from_strings("v1:us1:instance-1", "key-1:s3cret").unwrap()
    }

    fn decode_part(part: &str) -> serde_json::Value {
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(part).unwrap()).unwrap()
    }

    #[test]
    fn token_has_three_parts_and_hs256_header() {
        let token = generator().generate(None, false).unwrap();
        let parts: Vec<&str> = token.token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(
            decode_part(parts[0]),
            serde_json::json!({"alg": "HS256", "typ": "JWT"})
        );
        assert_eq!(token.expires_in, 86_400);
    }

    #[test]
    fn claims_follow_credentials() {
        let tokens = generator();
        let token = tokens.generate_at(1_700_000_000, Some("alice"), true).unwrap();
        let claims = tokens.verify(&token.token).unwrap();
        assert_eq!(claims.instance, "instance-1");
        assert_eq!(claims.iss, "api_keys/key-1");
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_086_400);
        assert_eq!(claims.sub.as_deref(), Some("alice"));
        assert_eq!(claims.su, Some(true));
    }

    #[test]
    fn absent_optional_claims_are_not_encoded() {
        let token = generator().generate_at(10, None, false).unwrap();
        let payload = decode_part(token.token.split('.').nth(1).unwrap());
        let obj = payload.as_object().unwrap();
        assert!(!obj.contains_key("sub"));
        assert!(!obj.contains_key("su"));
    }

    #[test]
    fn issue_time_near_the_end_of_time_is_rejected() {
        let tokens = generator();
        assert!(matches!(
            tokens.generate_at(u64::MAX - 10, None, true),
            Err(Error::Configuration(_))
        ));
        let latest = u64::MAX - TOKEN_TTL_SECS;
        let token = tokens.generate_at(latest, None, true).unwrap();
        assert_eq!(tokens.verify(&token.token).unwrap().exp, u64::MAX);
    }

    #[test]
    fn verification_fails_with_another_secret() {
        let token = generator().generate(None, true).unwrap();
        let other = TokenGenerator::from_strings("v1:us1:instance-1", "key-1:other").unwrap();
        assert!(matches!(
            other.verify(&token.token),
            Err(Error::Configuration(_))
        ));
        assert!(generator().verify("not-a-token").is_err());
    }

    #[test]
    fn authenticate_user_wraps_subject_token() {
        let tokens = generator();
        let auth = tokens.authenticate_user("bob").unwrap();
        assert_eq!(auth.token_type, "bearer");
        assert_eq!(auth.expires_in, TOKEN_TTL_SECS);
        let claims = tokens.verify(&auth.access_token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("bob"));
        assert_eq!(claims.su, None);
        assert!(tokens.authenticate_user("").is_err());
    }

    #[test]
    fn malformed_credentials_are_rejected() {
        assert!(matches!(
            TokenGenerator::from_strings("v1:us1", "k:s"),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            TokenGenerator::from_strings("v1:us1:id", "ks"),
            Err(Error::Configuration(_))
        ));
    }

    proptest! {
        #[test]
        fn claims_hold_for_any_valid_credentials(
            version in "[a-z0-9]{1,4}",
            cluster in "[a-z0-9-]{1,12}",
            id in "[A-Za-z0-9-]{1,36}",
            kid in "[A-Za-z0-9-]{1,24}",
            secret in "[A-Za-z0-9+/=]{1,64}",
            iat in 0u64..4_000_000_000,
        ) {
            let tokens = TokenGenerator::from_strings(
                &format!("{version}:{cluster}:{id}"),
                &format!("{kid}:{secret}"),
            ).unwrap();
            let token = tokens.generate_at(iat, None, true).unwrap();
            let claims = tokens.verify(&token.token).unwrap();
            prop_assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
            prop_assert_eq!(claims.instance, id);
            prop_assert_eq!(claims.iss, format!("api_keys/{kid}"));
        }
    }
}
