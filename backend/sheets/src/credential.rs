//! # Service Account
//!
//! Google service account key, as downloaded from the cloud console.
//!
//! Only three fields matter to us:
//! - `client_email`: the JWT issuer
//! - `private_key`: PKCS#8 PEM used to sign the JWT assertion
//! - `token_uri`: where the assertion is exchanged for a bearer token
//!
//! The key is parsed once at startup. After that the credential is only ever
//! read, so a single instance is shared by every request.
use std::{fs::read_to_string, path::Path};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rsa::{
    RsaPrivateKey,
    pkcs1v15::SigningKey,
    pkcs8::DecodePrivateKey,
    signature::{SignatureEncoding, Signer},
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CredentialError, FetchError};

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_HEADER: &str = r#"{"alg":"RS256","typ":"JWT"}"#;
const ASSERTION_LIFETIME_SECS: i64 = 60 * 60;

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

pub struct Credential {
    client_email: String,
    token_uri: String,
    signing_key: SigningKey<Sha256>,
}

impl Credential {
    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let key: ServiceAccountKey = serde_json::from_str(json)?;

        let private_key = RsaPrivateKey::from_pkcs8_pem(&key.private_key)
            .map_err(|e| CredentialError::InvalidKey(e.to_string()))?;

        Ok(Self {
            client_email: key.client_email,
            token_uri: key.token_uri,
            signing_key: SigningKey::<Sha256>::new(private_key),
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref();
        let json = read_to_string(path).map_err(|source| CredentialError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&json)
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Signed RS256 JWT to trade at [`Credential::token_uri`] for an access token.
    pub fn assertion(&self, scope: &str, issued_at: DateTime<Utc>) -> Result<String, FetchError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let claims =
            serde_json::to_vec(&claims).map_err(|e| FetchError::AuthFailure(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(JWT_HEADER),
            URL_SAFE_NO_PAD.encode(claims)
        );

        let signature = self
            .signing_key
            .try_sign(signing_input.as_bytes())
            .map_err(|e| FetchError::AuthFailure(e.to_string()))?;

        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        ))
    }
}
