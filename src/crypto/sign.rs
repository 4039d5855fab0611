//! Ed25519 identity signatures.
//!
//! The server's long-term signing pair authenticates the handshake; clients
//! hold only the trusted public half.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::crypto::keys::{KeyPair, PrivateKey, PublicKey, Signature};
use crate::error::{Error, Result};

/// Generates a fresh long-term Ed25519 signing keypair.
pub fn generate_sign_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    KeyPair::new(
        PublicKey::from_bytes(verifying_key.to_bytes()),
        PrivateKey::Sign(signing_key.to_keypair_bytes()),
    )
}

/// Signs `message` with a signing private key.
pub fn sign(message: &[u8], private_key: &PrivateKey) -> Result<Signature> {
    let signing_key = SigningKey::from_keypair_bytes(private_key.sign_bytes()?)
        .map_err(|e| Error::invalid_key(e.to_string()))?;
    Ok(Signature::from_bytes(signing_key.sign(message).to_bytes()))
}

/// Verifies `signature` over `message` against a signing public key.
///
/// Constant-time in the underlying backend. Returns `false` on any failure,
/// including an unusable public key.
pub fn verify(signature: &Signature, message: &[u8], public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
        return false;
    };
    let sig = DalekSignature::from_bytes(signature.as_bytes());
    verifying_key.verify(message, &sig).is_ok()
}
