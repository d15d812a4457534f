//! ES256 provider tokens for token-based APNs authentication
//!
//! Apple rejects provider tokens older than one hour and throttles clients
//! that sign a new one more than once every twenty minutes, so a signed
//! token is reused until it reaches [`TOKEN_TTL_SECS`].

use crate::error::ApnsError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use stayreal_config::ApnsConfig;
use std::sync::Mutex;
use tracing::debug;

/// Age after which a cached provider token is signed again
pub const TOKEN_TTL_SECS: i64 = 50 * 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    iat: i64,
}

struct CachedToken {
    token: String,
    issued_at: i64,
}

/// Signs and caches the provider token shared by every APNs request
pub struct ProviderTokenSigner {
    key: EncodingKey,
    key_id: String,
    team_id: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ProviderTokenSigner {
    /// Creates a signer from a PKCS#8 PEM encoded P-256 key (the `.p8` file
    /// downloaded from the Apple developer portal).
    pub fn new(
        pem: &[u8],
        key_id: impl Into<String>,
        team_id: impl Into<String>,
    ) -> Result<Self, ApnsError> {
        let key = EncodingKey::from_ec_pem(pem)
            .map_err(|e| ApnsError::KeyError(format!("Invalid APNs signing key: {}", e)))?;

        Ok(Self {
            key,
            key_id: key_id.into(),
            team_id: team_id.into(),
            cached: Mutex::new(None),
        })
    }

    /// Reads the signing key from `config.key_path`
    pub fn from_config(config: &ApnsConfig) -> Result<Self, ApnsError> {
        if config.key_id.is_empty() || config.team_id.is_empty() {
            return Err(ApnsError::ConfigError(
                "APNs key_id and team_id are required".to_string(),
            ));
        }

        let pem = std::fs::read(&config.key_path).map_err(|e| {
            ApnsError::KeyError(format!(
                "Failed to read APNs key from {}: {}",
                config.key_path, e
            ))
        })?;

        Self::new(&pem, config.key_id.clone(), config.team_id.clone())
    }

    /// Returns a valid provider token, signing a new one when needed
    pub fn token(&self) -> Result<String, ApnsError> {
        self.token_at(Utc::now().timestamp())
    }

    pub(crate) fn token_at(&self, now: i64) -> Result<String, ApnsError> {
        let mut cached = self.cached.lock().map_err(|_| ApnsError::CacheError)?;

        if let Some(current) = cached.as_ref() {
            if now - current.issued_at < TOKEN_TTL_SECS {
                return Ok(current.token.clone());
            }
        }

        debug!("Signing new APNs provider token");
        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_id.clone());
        let claims = Claims {
            iss: &self.team_id,
            iat: now,
        };
        let token = encode(&header, &claims, &self.key)?;

        *cached = Some(CachedToken {
            token: token.clone(),
            issued_at: now,
        });
        Ok(token)
    }
}
