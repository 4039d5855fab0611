//! Session-key derivation.
//!
//! Expands the X25519 shared secret into the two directional record keys
//! using HKDF-SHA256. Both ephemeral public keys are bound into the salt,
//! client first, so the derived keys commit to the exact exchange.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::crypto::keys::{PublicKey, SessionKey};
use crate::crypto::{PUBLIC_KEY_SIZE, SESSION_KEY_SIZE};

const CLIENT_TO_SERVER_INFO: &[u8] = b"obscura c2s";
const SERVER_TO_CLIENT_INFO: &[u8] = b"obscura s2c";

/// Derives the `(client-to-server, server-to-client)` key pair.
///
/// Deterministic on its inputs: both endpoints compute the same pair from
/// the same shared secret and ephemeral public keys.
pub(crate) fn derive_directional_keys(
    shared_secret: &[u8; 32],
    client_ephemeral_pk: &PublicKey,
    server_ephemeral_pk: &PublicKey,
) -> (SessionKey, SessionKey) {
    let mut salt = [0u8; 2 * PUBLIC_KEY_SIZE];
    salt[..PUBLIC_KEY_SIZE].copy_from_slice(client_ephemeral_pk.as_bytes());
    salt[PUBLIC_KEY_SIZE..].copy_from_slice(server_ephemeral_pk.as_bytes());

    let hkdf = Hkdf::<Sha256>::new(Some(&salt), shared_secret);

    let mut c2s = [0u8; SESSION_KEY_SIZE];
    let mut s2c = [0u8; SESSION_KEY_SIZE];
    // expand cannot fail for 32-byte outputs
    hkdf.expand(CLIENT_TO_SERVER_INFO, &mut c2s).unwrap();
    hkdf.expand(SERVER_TO_CLIENT_INFO, &mut s2c).unwrap();

    (SessionKey::from_bytes(c2s), SessionKey::from_bytes(s2c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pk(fill: u8) -> PublicKey {
        PublicKey::from_bytes([fill; PUBLIC_KEY_SIZE])
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let shared = [0x42u8; 32];
        let (c2s_a, s2c_a) = derive_directional_keys(&shared, &test_pk(1), &test_pk(2));
        let (c2s_b, s2c_b) = derive_directional_keys(&shared, &test_pk(1), &test_pk(2));

        assert_eq!(c2s_a, c2s_b);
        assert_eq!(s2c_a, s2c_b);
    }

    #[test]
    fn test_directions_are_distinct() {
        let shared = [0x42u8; 32];
        let (c2s, s2c) = derive_directional_keys(&shared, &test_pk(1), &test_pk(2));
        assert_ne!(c2s, s2c);
    }

    #[test]
    fn test_keys_commit_to_public_keys() {
        let shared = [0x42u8; 32];
        let (c2s_a, _) = derive_directional_keys(&shared, &test_pk(1), &test_pk(2));
        let (c2s_b, _) = derive_directional_keys(&shared, &test_pk(2), &test_pk(1));
        let (c2s_c, _) = derive_directional_keys(&shared, &test_pk(1), &test_pk(3));

        assert_ne!(c2s_a, c2s_b);
        assert_ne!(c2s_a, c2s_c);
    }

    #[test]
    fn test_keys_commit_to_shared_secret() {
        let (c2s_a, _) = derive_directional_keys(&[0x42u8; 32], &test_pk(1), &test_pk(2));
        let (c2s_b, _) = derive_directional_keys(&[0x43u8; 32], &test_pk(1), &test_pk(2));
        assert_ne!(c2s_a, c2s_b);
    }
}
