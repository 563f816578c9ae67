//! HMAC-SHA256 Webhook Signatures
//!
//! The platform signs each webhook body with the channel secret and sends
//! the base64-encoded MAC in the `x-line-signature` header.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign a payload with HMAC-SHA256 and return the base64-encoded signature.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verify a base64 HMAC-SHA256 signature against a payload.
pub fn verify_signature(secret: &str, payload: &[u8], signature: &str) -> bool {
    let expected = sign_payload(secret, payload);
    // Constant-time comparison
    expected.len() == signature.len()
        && expected
            .as_bytes()
            .iter()
            .zip(signature.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let secret = "test_secret_12345";
        let payload = b"{\"events\":[]}";
        let sig = sign_payload(secret, payload);
        assert!(verify_signature(secret, payload, &sig));
        assert!(!verify_signature("wrong_secret", payload, &sig));
        assert!(!verify_signature(secret, b"tampered body", &sig));
    }

    #[test]
    fn rejects_truncated_signature() {
        let secret = "test_secret_12345";
        let payload = b"hello";
        let sig = sign_payload(secret, payload);
        assert!(!verify_signature(secret, payload, &sig[..sig.len() - 2]));
        assert!(!verify_signature(secret, payload, ""));
    }
}
