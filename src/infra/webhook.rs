//! Webhook signature verification shared by provider adapters.
//!
//! Signatures are HMAC-SHA256 over the raw payload bytes, hex-encoded by the
//! provider. Verification decodes the supplied hex (case-insensitively) and
//! compares in constant time, closing the timing side channel a naive string
//! comparison would leave open.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the hex-encoded HMAC-SHA256 signature for a payload
pub fn compute_signature(secret: &[u8], payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a provider-supplied hex signature against the raw payload bytes.
/// Malformed hex is rejected outright; comparison is constant-time.
pub fn verify_signature(secret: &[u8], payload: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"whsec_test_1234567890";
    const PAYLOAD: &[u8] = br#"{"event":"payout.completed","id":"po_1"}"#;

    #[test]
    fn test_valid_signature_accepted() {
        let signature = compute_signature(SECRET, PAYLOAD);
        assert!(verify_signature(SECRET, PAYLOAD, &signature));
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let signature = compute_signature(SECRET, PAYLOAD).to_uppercase();
        assert!(verify_signature(SECRET, PAYLOAD, &signature));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signature = compute_signature(SECRET, PAYLOAD);
        assert!(!verify_signature(
            SECRET,
            br#"{"event":"payout.completed","id":"po_2"}"#,
            &signature
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signature = compute_signature(SECRET, PAYLOAD);
        assert!(!verify_signature(b"other-secret", PAYLOAD, &signature));
    }

    #[test]
    fn test_malformed_hex_rejected() {
        assert!(!verify_signature(SECRET, PAYLOAD, "not-hex!!"));
        assert!(!verify_signature(SECRET, PAYLOAD, ""));
    }
}
