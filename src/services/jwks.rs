//! Bearer token verification against a remote JSON Web Key Set.
//!
//! The key set is downloaded on every call to [`KeySetVerifier::verify`].
//! Nothing is cached between requests, so key rotation on the issuer side is
//! picked up immediately and an unreachable issuer rejects every token.

use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header,
    jwk::{Jwk, JwkSet, KeyAlgorithm},
};
use serde::Deserialize;

use crate::config::Config;

/// Reasons a token can be rejected.
///
/// Callers collapse all of these into a single 401; the detail is for logs.
#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    /// The key set could not be downloaded or parsed.
    #[error("failed to fetch key set: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The token is malformed, has a bad signature, or failed claim validation.
    #[error("token rejected: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    /// The token header carries no `kid`.
    #[error("token header has no key id")]
    MissingKeyId,

    /// No key in the set matches the token's `kid`.
    #[error("no key with id {0:?} in key set")]
    UnknownKeyId(String),

    /// The key pins an algorithm different from the token header's.
    #[error("key {0:?} does not allow the token's algorithm")]
    AlgorithmMismatch(String),
}

/// Claims kept from a verified token.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp); only checked when present
    #[serde(default)]
    pub exp: Option<u64>,
}

/// Fetches the configured key set and verifies tokens against it.
#[derive(Debug, Clone)]
pub struct KeySetVerifier {
    client: reqwest::Client,
    jwks_url: String,
    issuer: Option<String>,
    audience: Option<String>,
}

impl KeySetVerifier {
    /// Create a verifier for the key set and claim expectations in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (e.g. TLS backend failure).
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            jwks_url: config.jwks_url.clone(),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        })
    }

    /// Download the key set. Non-2xx responses count as failures.
    pub async fn fetch_key_set(&self) -> Result<JwkSet, JwksError> {
        let key_set = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        tracing::debug!(
            "Fetched {} key(s) from {}",
            key_set.keys.len(),
            self.jwks_url
        );

        Ok(key_set)
    }

    /// Fetch the key set and verify `token` against it.
    pub async fn verify(&self, token: &str) -> Result<Claims, JwksError> {
        let key_set = self.fetch_key_set().await?;
        self.verify_with(&key_set, token)
    }

    /// Verify `token` against an already fetched key set.
    ///
    /// # Checks
    ///
    /// 1. Header parses and names a `kid` present in the set
    /// 2. If the key pins an `alg`, it matches the header's
    /// 3. Signature verifies under that key
    /// 4. `exp` (if any) in the future, `nbf` (if any) in the past, no leeway
    /// 5. `iss` and `aud` match when configured
    pub fn verify_with(&self, key_set: &JwkSet, token: &str) -> Result<Claims, JwksError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(JwksError::MissingKeyId)?;
        let jwk = key_set
            .find(&kid)
            .ok_or_else(|| JwksError::UnknownKeyId(kid.clone()))?;

        if !algorithm_allowed(jwk, header.alg) {
            return Err(JwksError::AlgorithmMismatch(kid));
        }

        let key = DecodingKey::from_jwk(jwk)?;

        let mut validation = Validation::new(header.alg);
        validation.required_spec_claims.clear();
        validation.leeway = 0;
        validation.validate_nbf = true;
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = &self.issuer {
            validation.set_issuer(&[iss]);
        }

        let data = decode::<Claims>(token, &key, &validation)?;
        Ok(data.claims)
    }
}

/// A key without an `alg` accepts whatever the header says; the decoding key's
/// family still has to match for the signature check to pass.
fn algorithm_allowed(jwk: &Jwk, alg: Algorithm) -> bool {
    match &jwk.common.key_algorithm {
        None => true,
        Some(pinned) => signing_algorithm(pinned) == Some(alg),
    }
}

/// Signature algorithm a key pins, or `None` for encryption-only algorithms.
fn signing_algorithm(alg: &KeyAlgorithm) -> Option<Algorithm> {
    match alg {
        KeyAlgorithm::HS256 => Some(Algorithm::HS256),
        KeyAlgorithm::HS384 => Some(Algorithm::HS384),
        KeyAlgorithm::HS512 => Some(Algorithm::HS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    }
}
