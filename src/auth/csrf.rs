//! Stateless anti-CSRF tokens: a random identifier plus an HMAC-SHA256
//! signature over it, keyed by a server secret. Nothing is persisted;
//! validity is purely the signature check (the double-submit cookie/header
//! equality lives in the middleware).

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

fn sign(identifier: &str, secret: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(identifier.as_bytes());
    mac
}

/// Issues a fresh token: `"{uuid}.{base64url(HMAC-SHA256(secret, uuid))}"`.
/// Every call produces a distinct identifier.
pub fn issue_token(secret: &str) -> String {
    let identifier = Uuid::new_v4().to_string();
    let signature = sign(&identifier, secret).finalize().into_bytes();
    format!("{}.{}", identifier, URL_SAFE.encode(signature))
}

/// Validates a token against the secret. Malformed input (missing
/// separator, undecodable base64) is simply invalid, never an error. The
/// signature comparison is constant-time.
pub fn validate_token(token: &str, secret: &str) -> bool {
    let Some((identifier, signature)) = token.split_once('.') else {
        return false;
    };
    let Ok(signature) = URL_SAFE.decode(signature) else {
        return false;
    };
    sign(identifier, secret).verify_slice(&signature).is_ok()
}
