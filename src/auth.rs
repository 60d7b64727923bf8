// Authentication of inbound requests: Discord interaction signatures and the
// relay bearer token used by other bot processes.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

use crate::api::AppState;

pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

// ── Interaction signatures ───────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),
    #[error("malformed hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("invalid public key")]
    Key(#[source] ed25519_dalek::SignatureError),
    #[error("signature does not match")]
    Mismatch,
}

/// Verifies the Ed25519 signature Discord attaches to every interaction:
/// `sign(timestamp ++ body)` with the application key.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    pub fn from_hex(public_key: &str) -> Result<Self, SignatureError> {
        let bytes: [u8; 32] = decode_fixed(public_key)?;
        let key = VerifyingKey::from_bytes(&bytes).map_err(SignatureError::Key)?;
        Ok(Self { key })
    }

    pub fn verify(&self, signature: &str, timestamp: &str, body: &[u8]) -> Result<(), SignatureError> {
        let signature = Signature::from_bytes(&decode_fixed::<64>(signature)?);
        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        self.key
            .verify(&message, &signature)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// Verify using the signature headers of an inbound request.
    pub fn verify_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
        let signature = header(headers, SIGNATURE_HEADER)?;
        let timestamp = header(headers, TIMESTAMP_HEADER)?;
        self.verify(signature, timestamp, body)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(SignatureError::MissingHeader(name))
}

fn decode_fixed<const N: usize>(input: &str) -> Result<[u8; N], SignatureError> {
    let bytes = hex::decode(input.trim())?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| SignatureError::Length {
        expected: N,
        actual,
    })
}

// ── Axum extractor: RelayAuth ────────────────────────────────────────

/// Proof that the request carried the configured relay secret as a bearer
/// token. Usage: `_auth: RelayAuth` in handler parameters.
#[derive(Debug, Clone, Copy)]
pub struct RelayAuth;

impl FromRequestParts<AppState> for RelayAuth {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let reject = |msg: &str| {
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": msg })),
            )
        };

        let Some(secret) = state.relay_secret.as_deref() else {
            return Err(reject("Relay is disabled"));
        };

        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| reject("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| reject("Invalid Authorization header format"))?;

        if token != secret {
            return Err(reject("Invalid token"));
        }
        Ok(RelayAuth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair() -> (SigningKey, String) {
        let signing = SigningKey::from_bytes(&[7u8; 32]);
        let public = hex::encode(signing.verifying_key().to_bytes());
        (signing, public)
    }

    #[test]
    fn test_valid_signature_accepted() {
        let (signing, public) = keypair();
        let body = br#"{"type":1}"#;
        let timestamp = "1700000000";
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body);
        let signature = hex::encode(signing.sign(&message).to_bytes());

        let verifier = SignatureVerifier::from_hex(&public).unwrap();
        verifier.verify(&signature, timestamp, body).unwrap();
    }

    #[test]
    fn test_tampered_body_rejected() {
        let (signing, public) = keypair();
        let signature = hex::encode(signing.sign(b"1700000000{\"type\":1}").to_bytes());

        let verifier = SignatureVerifier::from_hex(&public).unwrap();
        let err = verifier
            .verify(&signature, "1700000000", br#"{"type":2}"#)
            .unwrap_err();
        assert!(matches!(err, SignatureError::Mismatch));
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            SignatureVerifier::from_hex("zz"),
            Err(SignatureError::Hex(_))
        ));
        assert!(matches!(
            SignatureVerifier::from_hex("abcd"),
            Err(SignatureError::Length {
                expected: 32,
                actual: 2
            })
        ));

        let (_, public) = keypair();
        let verifier = SignatureVerifier::from_hex(&public).unwrap();
        assert!(matches!(
            verifier.verify_request(&HeaderMap::new(), b"{}"),
            Err(SignatureError::MissingHeader(SIGNATURE_HEADER))
        ));
    }
}
