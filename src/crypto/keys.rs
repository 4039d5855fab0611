//! Fixed-width key and signature containers.
//!
//! These are plain byte holders shared by both halves of the primitive
//! suite; the key-exchange and signing modules convert them to and from the
//! backend types. Secret material is zeroized on drop.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{
    KX_PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE, SESSION_KEY_SIZE, SIGNATURE_SIZE, SIGN_PRIVATE_KEY_SIZE,
};
use crate::error::{Error, Result};

/// A 32-byte public key. Key-exchange and signing public keys share this
/// width; the containing [`KeyPair`]'s role fixes the interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Creates a public key from raw bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this public key.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Converts to raw bytes.
    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Secret half of a keypair.
///
/// The two flavors are disjoint: a key-exchange scalar cannot be used for
/// signing and vice versa. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub enum PrivateKey {
    /// X25519 scalar.
    Kx([u8; KX_PRIVATE_KEY_SIZE]),
    /// Ed25519 keypair bytes: the 32-byte seed followed by the public tail.
    Sign([u8; SIGN_PRIVATE_KEY_SIZE]),
}

impl PrivateKey {
    /// Returns the key-exchange scalar, or an error for a signing key.
    pub(crate) fn kx_bytes(&self) -> Result<&[u8; KX_PRIVATE_KEY_SIZE]> {
        match self {
            PrivateKey::Kx(bytes) => Ok(bytes),
            PrivateKey::Sign(_) => Err(Error::invalid_key(
                "key exchange requires an X25519 private key",
            )),
        }
    }

    /// Returns the signing keypair bytes, or an error for a KX key.
    pub(crate) fn sign_bytes(&self) -> Result<&[u8; SIGN_PRIVATE_KEY_SIZE]> {
        match self {
            PrivateKey::Sign(bytes) => Ok(bytes),
            PrivateKey::Kx(_) => Err(Error::invalid_key(
                "signing requires an Ed25519 private key",
            )),
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKey::Kx(_) => f.write_str("PrivateKey::Kx([REDACTED])"),
            PrivateKey::Sign(_) => f.write_str("PrivateKey::Sign([REDACTED])"),
        }
    }
}

/// A paired public/private key.
///
/// The session role determines whether the pair is a key-exchange or a
/// signing pair. A client session carries the server's trusted signing
/// public key with no private half; see [`KeyPair::from_public_key`].
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// Public half, safe to share.
    pub public_key: PublicKey,
    /// Secret half; absent on a trust-anchor view.
    pub private_key: Option<PrivateKey>,
}

impl KeyPair {
    /// Creates a keypair from both halves.
    pub fn new(public_key: PublicKey, private_key: PrivateKey) -> Self {
        Self {
            public_key,
            private_key: Some(private_key),
        }
    }

    /// Creates a public-only view, e.g. the trusted server signing key a
    /// client is configured with.
    pub fn from_public_key(public_key: PublicKey) -> Self {
        Self {
            public_key,
            private_key: None,
        }
    }

    /// Returns the private half, or an error when this is a public-only view.
    pub(crate) fn private(&self) -> Result<&PrivateKey> {
        self.private_key
            .as_ref()
            .ok_or_else(|| Error::invalid_key("keypair has no private half"))
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    /// Creates a signature from raw bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this signature.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// Converts to raw bytes.
    pub fn to_bytes(self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }
}

/// A 32-byte directional record key. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_SIZE]);

impl SessionKey {
    /// Creates a session key from raw bytes.
    pub fn from_bytes(bytes: [u8; SESSION_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw key bytes. Secret material; handle with care.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}

/// The direction-split record keys derived by the handshake.
///
/// `rx` decrypts incoming frames, `tx` encrypts outgoing ones; a client's
/// `tx` equals its server's `rx` and vice versa.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKeys {
    /// Key for incoming records.
    pub rx: SessionKey,
    /// Key for outgoing records.
    pub tx: SessionKey,
}
