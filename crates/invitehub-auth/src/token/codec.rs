//! Opaque invite tokens and their digests.
//!
//! A token is `token_bytes` random bytes encoded as URL-safe base64 without
//! padding. Only the lowercase hex SHA-256 of the encoded string is ever
//! persisted.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

use invitehub_core::config::collaboration::MIN_TOKEN_BYTES;
use invitehub_core::error::AppError;
use invitehub_core::traits::IdGenerator;

/// Hex-encoded SHA-256 of a raw invite token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// The digest as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A freshly generated token.
///
/// Deliberately not `Serialize`. The raw value leaves the process only
/// through the issuance response.
#[derive(Clone)]
pub struct IssuedToken {
    raw: String,
    digest: TokenDigest,
}

impl IssuedToken {
    /// Split into `(raw, digest)`.
    pub fn into_parts(self) -> (String, TokenDigest) {
        (self.raw, self.digest)
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("raw", &"<redacted>")
            .field("digest", &"<redacted>")
            .finish()
    }
}

/// Generates invite tokens and recomputes their digests.
#[derive(Clone)]
pub struct TokenCodec {
    ids: Arc<dyn IdGenerator>,
    token_bytes: usize,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("token_bytes", &self.token_bytes)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec producing `token_bytes` of entropy per token.
    ///
    /// Fewer than [`MIN_TOKEN_BYTES`] is a configuration error.
    pub fn new(ids: Arc<dyn IdGenerator>, token_bytes: usize) -> Result<Self, AppError> {
        if token_bytes < MIN_TOKEN_BYTES {
            return Err(AppError::configuration(format!(
                "Invite tokens need at least {MIN_TOKEN_BYTES} random bytes, got {token_bytes}"
            )));
        }
        Ok(Self { ids, token_bytes })
    }

    /// Generate a new random token and its digest.
    pub fn issue(&self) -> IssuedToken {
        let mut bytes = vec![0u8; self.token_bytes];
        self.ids.fill_bytes(&mut bytes);
        let raw = URL_SAFE_NO_PAD.encode(&bytes);
        let digest = Self::digest_of(&raw);
        IssuedToken { raw, digest }
    }

    /// Digest of a presented raw token.
    pub fn digest_of(raw: &str) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(raw.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invitehub_core::error::ErrorKind;
    use invitehub_core::traits::SeededIdGenerator;

    fn codec() -> TokenCodec {
        TokenCodec::new(Arc::new(SeededIdGenerator::new(7)), MIN_TOKEN_BYTES).unwrap()
    }

    #[test]
    fn test_token_shape() {
        let (raw, digest) = codec().issue().into_parts();
        // 16 bytes -> 22 base64 chars without padding.
        assert_eq!(raw.len(), 22);
        assert!(raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(digest.as_str().len(), 64);
        assert!(
            digest
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_digest_is_recomputable() {
        let (raw, digest) = codec().issue().into_parts();
        assert_eq!(TokenCodec::digest_of(&raw), digest);
        assert_ne!(TokenCodec::digest_of("other"), digest);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            TokenCodec::digest_of("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_tokens_are_distinct() {
        let codec = codec();
        let a = codec.issue();
        let b = codec.issue();
        assert_ne!(a.raw, b.raw);
    }

    #[test]
    fn test_rejects_weak_entropy() {
        let err = TokenCodec::new(Arc::new(SeededIdGenerator::new(1)), 8).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_debug_redacts_raw() {
        let token = codec().issue();
        assert!(!format!("{token:?}").contains(&token.raw));
    }
}
