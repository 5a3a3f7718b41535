//! `X-Hub-Signature` verification for Zammad webhooks.
//!
//! Zammad signs the raw request body with HMAC-SHA1 keyed by the webhook's
//! shared secret and sends `sha1=<hex digest>`.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::{AppError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

const SIGNATURE_PREFIX: &str = "sha1=";

/// Compute the `sha1=<hex>` signature of `body`.
///
/// # Errors
///
/// Returns `AppError::Config` if the HMAC cannot be keyed.
pub fn sign(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|err| AppError::Config(format!("invalid webhook secret: {err}")))?;
    mac.update(body);
    Ok(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Check `signature` against the HMAC of `body` in constant time.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the signature is malformed or does
/// not match.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> Result<()> {
    let digest = signature
        .trim()
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| AppError::Unauthorized("signature must use sha1=<hex> format".into()))?;
    let expected = hex::decode(digest)
        .map_err(|_| AppError::Unauthorized("signature is not valid hex".into()))?;

    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|err| AppError::Config(format!("invalid webhook secret: {err}")))?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| AppError::Unauthorized("signature mismatch".into()))
}
