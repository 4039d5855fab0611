//! Record encryption: XChaCha20-Poly1305 with counter-derived nonces.
//!
//! A nonce is fully determined by the 64-bit record counter, so counter
//! discipline in the session is what keeps `(key, nonce)` pairs unique.

use chacha20poly1305::aead::{Aead as AeadCipher, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::crypto::keys::SessionKey;
use crate::crypto::{NONCE_SIZE, TAG_SIZE};
use crate::error::{Error, Result};

/// A 24-byte AEAD nonce derived from a record counter.
///
/// The counter occupies bytes 0..8 little-endian; the remaining bytes are
/// zero.
#[derive(Clone, Copy, Debug)]
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    /// Builds the nonce for a record counter.
    pub fn from_counter(counter: u64) -> Self {
        let mut nonce = [0u8; NONCE_SIZE];
        nonce[..8].copy_from_slice(&counter.to_le_bytes());
        Self(nonce)
    }

    /// Returns the raw nonce bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    /// Returns the counter this nonce encodes.
    pub fn counter(&self) -> u64 {
        let mut counter = [0u8; 8];
        counter.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(counter)
    }
}

impl From<u64> for Nonce {
    fn from(counter: u64) -> Self {
        Self::from_counter(counter)
    }
}

/// XChaCha20-Poly1305 cipher bound to one directional session key.
pub struct Aead {
    cipher: XChaCha20Poly1305,
}

impl Aead {
    /// Creates a cipher instance for the given key.
    pub fn new(key: &SessionKey) -> Self {
        Self {
            cipher: XChaCha20Poly1305::new(key.as_bytes().into()),
        }
    }

    /// Encrypts `plaintext`, returning `ciphertext || tag`.
    pub fn encrypt(&self, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.cipher
            .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext)
            .map_err(|_| Error::malformed("plaintext too large to encrypt"))
    }

    /// Decrypts `ciphertext || tag`, authenticating the whole record.
    ///
    /// # Errors
    ///
    /// [`Error::AuthFailure`] on any tampering, truncation, wrong key, or
    /// wrong nonce.
    pub fn decrypt(&self, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < TAG_SIZE {
            return Err(Error::AuthFailure);
        }
        self.cipher
            .decrypt(XNonce::from_slice(nonce.as_bytes()), ciphertext)
            .map_err(|_| Error::AuthFailure)
    }
}

/// Encrypts one record body with the nonce derived from `counter`.
pub fn encrypt(plaintext: &[u8], counter: u64, key: &SessionKey) -> Result<Vec<u8>> {
    Aead::new(key).encrypt(&Nonce::from_counter(counter), plaintext)
}

/// Decrypts one record body with the nonce derived from `counter`.
pub fn decrypt(ciphertext: &[u8], counter: u64, key: &SessionKey) -> Result<Vec<u8>> {
    Aead::new(key).decrypt(&Nonce::from_counter(counter), ciphertext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SESSION_KEY_SIZE;

    fn test_key() -> SessionKey {
        SessionKey::from_bytes([0x42u8; SESSION_KEY_SIZE])
    }

    #[test]
    fn test_nonce_layout() {
        let nonce = Nonce::from_counter(0x0807060504030201);
        assert_eq!(
            &nonce.as_bytes()[..8],
            &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
        assert_eq!(&nonce.as_bytes()[8..], &[0u8; NONCE_SIZE - 8]);
        assert_eq!(nonce.counter(), 0x0807060504030201);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = b"opcoded parameter list";
        let ciphertext = encrypt(plaintext, 0, &test_key()).unwrap();

        assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);
        assert_eq!(decrypt(&ciphertext, 0, &test_key()).unwrap(), plaintext);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut ciphertext = encrypt(b"secret", 0, &test_key()).unwrap();
        ciphertext[0] ^= 0x01;

        let result = decrypt(&ciphertext, 0, &test_key());
        assert!(matches!(result, Err(Error::AuthFailure)));
    }

    #[test]
    fn test_wrong_counter_fails() {
        let ciphertext = encrypt(b"secret", 3, &test_key()).unwrap();
        let result = decrypt(&ciphertext, 4, &test_key());
        assert!(matches!(result, Err(Error::AuthFailure)));
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = encrypt(b"secret", 0, &test_key()).unwrap();
        let other = SessionKey::from_bytes([0x43u8; SESSION_KEY_SIZE]);

        let result = decrypt(&ciphertext, 0, &other);
        assert!(matches!(result, Err(Error::AuthFailure)));
    }

    #[test]
    fn test_short_ciphertext_fails() {
        let result = decrypt(&[0u8; TAG_SIZE - 1], 0, &test_key());
        assert!(matches!(result, Err(Error::AuthFailure)));
    }

    #[test]
    fn test_counters_produce_distinct_ciphertexts() {
        let a = encrypt(b"same plaintext", 0, &test_key()).unwrap();
        let b = encrypt(b"same plaintext", 1, &test_key()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_plaintext() {
        let ciphertext = encrypt(b"", 0, &test_key()).unwrap();
        assert_eq!(ciphertext.len(), TAG_SIZE);
        assert!(decrypt(&ciphertext, 0, &test_key()).unwrap().is_empty());
    }
}
