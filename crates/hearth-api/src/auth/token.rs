//! Admin API tokens
//!
//! A token is `{staff_id}.{secret}`. Only the SHA-256 hex digest of the secret is
//! stored on the staff row.

use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;
use uuid::Uuid;

const SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    pub staff_id: Uuid,
    pub secret: String,
}

impl ApiToken {
    /// Fresh random secret for `staff_id`.
    pub fn generate(staff_id: Uuid) -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::rng().fill(&mut bytes);
        Self {
            staff_id,
            secret: hex::encode(bytes),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (id, secret) = raw.trim().split_once('.')?;
        if secret.is_empty() {
            return None;
        }
        Some(Self {
            staff_id: Uuid::parse_str(id).ok()?,
            secret: secret.to_string(),
        })
    }

    pub fn secret_hash(&self) -> String {
        hash_secret(&self.secret)
    }

    /// Constant-time check against a stored digest.
    pub fn matches(&self, stored_hash: &str) -> bool {
        let computed = self.secret_hash();
        if computed.len() != stored_hash.len() {
            return false;
        }
        computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.staff_id, self.secret)
    }
}

pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_round_trips_and_matches() {
        let token = ApiToken::generate(Uuid::new_v4());
        assert_eq!(token.secret.len(), SECRET_BYTES * 2);

        let parsed = ApiToken::parse(&token.to_string()).unwrap();
        assert_eq!(parsed, token);
        assert!(parsed.matches(&token.secret_hash()));
    }

    #[test]
    fn test_wrong_secret_does_not_match() {
        let token = ApiToken::generate(Uuid::new_v4());
        let other = ApiToken::generate(token.staff_id);
        assert!(!other.matches(&token.secret_hash()));
        assert!(!token.matches(""));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ApiToken::parse("no-dot").is_none());
        assert!(ApiToken::parse("not-a-uuid.secret").is_none());
        assert!(ApiToken::parse(&format!("{}.", Uuid::new_v4())).is_none());
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
