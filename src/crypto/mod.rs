//! Cryptographic primitives for the session protocol.
//!
//! This module is a stateless facade over the suite the wire format is
//! defined against:
//! - X25519 ephemeral key exchange
//! - Ed25519 identity signatures
//! - HKDF-SHA256 directional session-key derivation
//! - XChaCha20-Poly1305 record encryption
//!
//! All secret material is zeroized on drop.

use std::sync::Once;

mod aead;
mod kdf;
mod keys;
mod kx;
mod sign;

pub use aead::{decrypt, encrypt, Aead, Nonce};
pub use keys::{KeyPair, PrivateKey, PublicKey, SessionKey, SessionKeys, Signature};
pub use kx::{client_compute_session_keys, generate_kx_keypair, server_compute_session_keys};
pub use sign::{generate_sign_keypair, sign, verify};

/// Size of public keys in bytes; key-exchange and signing keys share it.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an X25519 private key in bytes.
pub const KX_PRIVATE_KEY_SIZE: usize = 32;

/// Size of an Ed25519 private key in bytes (seed plus public tail).
pub const SIGN_PRIVATE_KEY_SIZE: usize = 64;

/// Size of an Ed25519 signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Size of a directional record key in bytes.
pub const SESSION_KEY_SIZE: usize = 32;

/// Size of the XChaCha20-Poly1305 nonce in bytes.
pub const NONCE_SIZE: usize = 24;

/// Size of the AEAD authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

static INIT: Once = Once::new();

/// Initializes the primitive suite.
///
/// Idempotent and safe to race from multiple threads. The pure-Rust
/// backends keep no global state, so the call only pins the
/// once-per-process contract.
pub fn init() {
    INIT.call_once(|| {});
}
