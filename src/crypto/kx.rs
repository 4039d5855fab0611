//! X25519 key exchange and session-key computation.

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey as DalekPublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::crypto::kdf;
use crate::crypto::keys::{KeyPair, PrivateKey, PublicKey, SessionKeys};
use crate::error::{Error, Result};

/// Generates a fresh ephemeral X25519 keypair.
pub fn generate_kx_keypair() -> KeyPair {
    let secret = StaticSecret::random_from_rng(OsRng);
    let public = DalekPublicKey::from(&secret);
    KeyPair::new(
        PublicKey::from_bytes(public.to_bytes()),
        PrivateKey::Kx(secret.to_bytes()),
    )
}

/// X25519 agreement between our private half and the peer's public key.
fn shared_secret(own: &KeyPair, peer_pk: &PublicKey) -> Result<Zeroizing<[u8; 32]>> {
    let secret = StaticSecret::from(*own.private()?.kx_bytes()?);
    let shared = secret.diffie_hellman(&DalekPublicKey::from(peer_pk.to_bytes()));

    // An all-zero output means the peer sent a low-order point.
    if shared.as_bytes() == &[0u8; 32] {
        return Err(Error::invalid_key("peer public key is a low-order point"));
    }

    Ok(Zeroizing::new(*shared.as_bytes()))
}

/// Computes the client's session keys from its ephemeral pair and the
/// server's ephemeral public key: `rx` carries server-to-client traffic,
/// `tx` client-to-server.
pub fn client_compute_session_keys(
    client_kx: &KeyPair,
    server_ephemeral_pk: &PublicKey,
) -> Result<SessionKeys> {
    let shared = shared_secret(client_kx, server_ephemeral_pk)?;
    let (c2s, s2c) =
        kdf::derive_directional_keys(&shared, &client_kx.public_key, server_ephemeral_pk);
    Ok(SessionKeys { rx: s2c, tx: c2s })
}

/// Computes the server's session keys from its ephemeral pair and the
/// client's ephemeral public key: `rx` carries client-to-server traffic,
/// `tx` server-to-client. Mirrors [`client_compute_session_keys`] on
/// matching inputs.
pub fn server_compute_session_keys(
    server_kx: &KeyPair,
    client_ephemeral_pk: &PublicKey,
) -> Result<SessionKeys> {
    let shared = shared_secret(server_kx, client_ephemeral_pk)?;
    let (c2s, s2c) =
        kdf::derive_directional_keys(&shared, client_ephemeral_pk, &server_kx.public_key);
    Ok(SessionKeys { rx: c2s, tx: s2c })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PUBLIC_KEY_SIZE;

    #[test]
    fn test_generate_produces_unique_pairs() {
        let a = generate_kx_keypair();
        let b = generate_kx_keypair();

        assert!(a.private_key.is_some());
        assert_ne!(a.public_key, b.public_key);
        assert_ne!(a.public_key.as_bytes(), &[0u8; PUBLIC_KEY_SIZE]);
    }

    #[test]
    fn test_session_keys_mirror_across_roles() {
        let client = generate_kx_keypair();
        let server = generate_kx_keypair();

        let client_keys = client_compute_session_keys(&client, &server.public_key).unwrap();
        let server_keys = server_compute_session_keys(&server, &client.public_key).unwrap();

        assert_eq!(client_keys.tx, server_keys.rx);
        assert_eq!(client_keys.rx, server_keys.tx);
        assert_ne!(client_keys.tx, client_keys.rx);
    }

    #[test]
    fn test_keys_differ_per_exchange() {
        let client = generate_kx_keypair();
        let server_a = generate_kx_keypair();
        let server_b = generate_kx_keypair();

        let keys_a = client_compute_session_keys(&client, &server_a.public_key).unwrap();
        let keys_b = client_compute_session_keys(&client, &server_b.public_key).unwrap();

        assert_ne!(keys_a.tx, keys_b.tx);
        assert_ne!(keys_a.rx, keys_b.rx);
    }

    #[test]
    fn test_reject_low_order_peer_point() {
        let client = generate_kx_keypair();
        let zero_pk = PublicKey::from_bytes([0u8; PUBLIC_KEY_SIZE]);

        let result = client_compute_session_keys(&client, &zero_pk);
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_reject_keypair_without_private_half() {
        let server = generate_kx_keypair();
        let view = KeyPair::from_public_key(server.public_key);

        let result = client_compute_session_keys(&view, &server.public_key);
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_reject_signing_key_for_exchange() {
        let sign_pair = crate::crypto::generate_sign_keypair();
        let peer = generate_kx_keypair();

        let result = client_compute_session_keys(&sign_pair, &peer.public_key);
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }
}
