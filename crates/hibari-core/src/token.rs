//! Local expiry check for AniList bearer tokens.
//!
//! AniList access tokens are JWTs; the payload segment carries a numeric
//! `exp` claim. Only the payload is decoded and no signature is verified:
//! this guards against *using* a stale token, it is not a security boundary.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

/// Whether the token is expired at `now` (Unix seconds).
///
/// Fails safe: anything that is not a decodable JWT payload with a numeric
/// `exp` counts as expired. The boundary `exp == now` is still valid.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    match expiry(token) {
        Some(exp) => now > exp,
        None => true,
    }
}

/// Whether the token is expired right now.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp())
}

/// Extract the `exp` claim from the payload segment, if there is one.
pub fn expiry(token: &str) -> Option<i64> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() < 2 {
        return None;
    }

    // Pad the URL-safe segment back to a multiple of 4.
    let mut payload = segments[1].to_string();
    while payload.len() % 4 != 0 {
        payload.push('=');
    }

    let bytes = URL_SAFE.decode(payload).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        let encoded = URL_SAFE.encode(payload);
        format!("header.{}.signature", encoded.trim_end_matches('='))
    }

    #[test]
    fn token_without_two_segments_is_expired() {
        assert!(is_expired_at("", 0));
        assert!(is_expired_at("justonesegment", 0));
    }

    #[test]
    fn undecodable_payload_is_expired() {
        assert!(is_expired_at("header.!!!not-base64!!!.sig", 0));
        assert!(is_expired_at(&token_with_payload("not json"), 0));
    }

    #[test]
    fn payload_without_exp_is_expired() {
        assert!(is_expired_at(&token_with_payload(r#"{"sub":"123"}"#), 0));
    }

    #[test]
    fn exp_in_the_past_is_expired() {
        let token = token_with_payload(r#"{"exp": 1000}"#);
        assert!(is_expired_at(&token, 2000));
    }

    #[test]
    fn exp_in_the_future_is_valid() {
        let token = token_with_payload(r#"{"exp": 2000}"#);
        assert!(!is_expired_at(&token, 1000));
    }

    #[test]
    fn exp_equal_to_now_is_still_valid() {
        let token = token_with_payload(r#"{"exp": 1000}"#);
        assert!(!is_expired_at(&token, 1000));
    }

    #[test]
    fn missing_signature_segment_is_tolerated() {
        let encoded = URL_SAFE.encode(r#"{"exp": 2000}"#);
        let token = format!("header.{}", encoded.trim_end_matches('='));
        assert!(!is_expired_at(&token, 1000));
    }

    #[test]
    fn expiry_reads_the_claim() {
        let token = token_with_payload(r#"{"exp": 1234567890}"#);
        assert_eq!(expiry(&token), Some(1234567890));
    }
}
