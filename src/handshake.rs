//! Handshake wire messages.
//!
//! Both messages use a compact big-endian serialization. `deserialize`
//! rejects truncated input, trailing bytes, and an empty version list.

use bytes::{Buf, BufMut, BytesMut};

use crate::crypto::{PublicKey, Signature, PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
use crate::error::{Error, Result};

/// Exact wire size of a [`ServerHello`].
const SERVER_HELLO_SIZE: usize = 2 + PUBLIC_KEY_SIZE + SIGNATURE_SIZE;

/// First handshake message, client to server.
///
/// Wire layout: `u16` version count, that many big-endian `u16` versions,
/// then the client's 32-byte ephemeral public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    /// Versions the client implements.
    pub supported_versions: Vec<u16>,
    /// The client's ephemeral key-exchange public key.
    pub ephemeral_pk: PublicKey,
}

impl ClientHello {
    /// Serializes the message to wire bytes.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        if self.supported_versions.is_empty() {
            return Err(Error::malformed("client hello carries no versions"));
        }
        let count = u16::try_from(self.supported_versions.len())
            .map_err(|_| Error::malformed("client hello version list too long"))?;

        let mut buf =
            BytesMut::with_capacity(2 + 2 * self.supported_versions.len() + PUBLIC_KEY_SIZE);
        buf.put_u16(count);
        for version in &self.supported_versions {
            buf.put_u16(*version);
        }
        buf.put_slice(self.ephemeral_pk.as_bytes());
        Ok(buf.to_vec())
    }

    /// Parses a message from wire bytes.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut data = data;
        if data.remaining() < 2 {
            return Err(Error::malformed("client hello truncated"));
        }
        let count = data.get_u16() as usize;
        if count == 0 {
            return Err(Error::malformed("client hello carries no versions"));
        }
        if data.remaining() != 2 * count + PUBLIC_KEY_SIZE {
            return Err(Error::malformed(format!(
                "client hello length mismatch: {} bytes after version count",
                data.remaining()
            )));
        }

        let mut supported_versions = Vec::with_capacity(count);
        for _ in 0..count {
            supported_versions.push(data.get_u16());
        }
        let mut pk = [0u8; PUBLIC_KEY_SIZE];
        data.copy_to_slice(&mut pk);

        Ok(Self {
            supported_versions,
            ephemeral_pk: PublicKey::from_bytes(pk),
        })
    }
}

/// Second handshake message, server to client.
///
/// Wire layout: big-endian `u16` selected version, the server's 32-byte
/// ephemeral public key, then the 64-byte transcript signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    /// The version the server selected.
    pub selected_version: u16,
    /// The server's ephemeral key-exchange public key.
    pub ephemeral_pk: PublicKey,
    /// Signature over both ephemeral public keys, client first.
    pub signature: Signature,
}

impl ServerHello {
    /// Serializes the message to wire bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(SERVER_HELLO_SIZE);
        buf.put_u16(self.selected_version);
        buf.put_slice(self.ephemeral_pk.as_bytes());
        buf.put_slice(self.signature.as_bytes());
        buf.to_vec()
    }

    /// Parses a message from wire bytes.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        if data.len() != SERVER_HELLO_SIZE {
            return Err(Error::malformed(format!(
                "server hello must be {SERVER_HELLO_SIZE} bytes, got {}",
                data.len()
            )));
        }

        let mut data = data;
        let selected_version = data.get_u16();
        let mut pk = [0u8; PUBLIC_KEY_SIZE];
        data.copy_to_slice(&mut pk);
        let mut signature = [0u8; SIGNATURE_SIZE];
        data.copy_to_slice(&mut signature);

        Ok(Self {
            selected_version,
            ephemeral_pk: PublicKey::from_bytes(pk),
            signature: Signature::from_bytes(signature),
        })
    }
}
