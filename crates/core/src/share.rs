//! Shareable-link payload codec.
//!
//! A payload travels in a URL query parameter as Base64-encoded,
//! percent-escaped JSON. Decoding is forgiving: text that already looks like
//! raw JSON passes through untouched, and a failed Base64 decode falls back
//! to the raw text. Validation of the resulting text belongs to
//! [`crate::payload::parse`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

/// Decodes a `payload` query-parameter value into candidate JSON text.
pub fn decode_payload_param(param: &str) -> String {
    let raw = match percent_decode_str(param).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            log::warn!("failed to percent-decode payload parameter: {err}");
            param.to_string()
        }
    };

    let text = raw.trim();
    if text.starts_with('{') {
        return text.to_string();
    }

    match BASE64.decode(text) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(decoded) if decoded.trim().starts_with('{') => decoded.trim().to_string(),
            _ => text.to_string(),
        },
        Err(err) => {
            log::warn!("payload parameter is not valid Base64: {err}");
            text.to_string()
        }
    }
}

/// Encodes JSON text into a `payload` query-parameter value.
pub fn encode_payload_param(json: &str) -> String {
    let encoded = BASE64.encode(json.trim());
    utf8_percent_encode(&encoded, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{"box":{"width":10}}"#;

    #[test]
    fn test_round_trip() {
        let param = encode_payload_param(JSON);
        assert_eq!(decode_payload_param(&param), JSON);
    }

    #[test]
    fn test_raw_json_passes_through() {
        assert_eq!(decode_payload_param(JSON), JSON);
        assert_eq!(decode_payload_param(&format!("  {JSON}\n")), JSON);
    }

    #[test]
    fn test_percent_encoded_raw_json() {
        let param = utf8_percent_encode(JSON, NON_ALPHANUMERIC).to_string();
        assert_eq!(decode_payload_param(&param), JSON);
    }

    #[test]
    fn test_bare_base64_decodes() {
        let param = BASE64.encode(JSON);
        assert_eq!(decode_payload_param(&param), JSON);
    }

    #[test]
    fn test_non_json_non_base64_falls_through() {
        // Not JSON and not decodable; the caller's parse will reject it.
        assert_eq!(decode_payload_param("!!not-base64!!"), "!!not-base64!!");
    }

    #[test]
    fn test_base64_of_non_json_falls_through() {
        let param = BASE64.encode("hello world");
        assert_eq!(decode_payload_param(&param), param);
    }
}
