//! # ObscuraProto
//!
//! Library-level secure session protocol: an authenticated, confidential,
//! ordered byte channel between a client and a server, framing application
//! messages as opcoded, typed parameter lists.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │ Application: PayloadBuilder / PayloadReader   │
//! ├───────────────────────────────────────────────┤
//! │ Session: handshake + duplex record layer      │
//! ├───────────────────────────────────────────────┤
//! │ Crypto: X25519, Ed25519, HKDF, XChaCha20-P    │
//! ├───────────────────────────────────────────────┤
//! │ Transport (caller-provided, bytes in / out)   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! The crate owns no I/O. A transport delivers whole ciphertext frames, in
//! order, to [`Session::decrypt_packet`] and carries the frames produced by
//! [`Session::encrypt_payload`]. Sockets, timeouts, and dispatching
//! decrypted payloads by opcode belong to the caller.
//!
//! Peer authenticity rests on a pre-shared trust anchor: the client is
//! configured with the server's long-term signing public key, and the
//! server signs the handshake transcript with the matching private key.
//! Each handshake derives fresh directional session keys, and record
//! nonces are strict per-direction counters, so sessions never share a
//! `(key, nonce)` pair.
//!
//! ## Example
//!
//! ```
//! use obscura_proto::{crypto, KeyPair, PayloadBuilder, PayloadReader, Role, Session};
//!
//! # fn main() -> obscura_proto::Result<()> {
//! crypto::init();
//!
//! // The server's signing public key reaches the client out of band.
//! let server_identity = crypto::generate_sign_keypair();
//! let trusted = KeyPair::from_public_key(server_identity.public_key);
//!
//! let mut client = Session::new(Role::Client, trusted);
//! let mut server = Session::new(Role::Server, server_identity);
//!
//! let client_hello = client.client_initiate_handshake()?;
//! let server_hello = server.server_respond_to_handshake(&client_hello)?;
//! client.client_finalize_handshake(&server_hello)?;
//!
//! let payload = PayloadBuilder::new(0x0042)
//!     .add_param("ping")
//!     .add_param(7u32)
//!     .build();
//! let frame = client.encrypt_payload(&payload)?;
//! let received = server.decrypt_packet(&frame)?;
//!
//! let mut reader = PayloadReader::new(&received);
//! assert_eq!(reader.read_param::<String>()?, "ping");
//! assert_eq!(reader.read_uint()?, 7);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod crypto;
pub mod error;
pub mod handshake;
pub mod payload;
pub mod session;
pub mod version;

pub use crypto::{KeyPair, PrivateKey, PublicKey, SessionKey, SessionKeys, Signature};
pub use error::{Error, Result};
pub use handshake::{ClientHello, ServerHello};
pub use payload::{FromParam, OpCode, Param, Payload, PayloadBuilder, PayloadReader};
pub use session::{Role, Session};
pub use version::{VersionNegotiator, SUPPORTED_VERSIONS, V1_0};
