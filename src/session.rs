//! Session state machine: two-message handshake plus the duplex record
//! layer.
//!
//! A session is an owned, single-threaded state machine. It performs
//! exactly one handshake, then encrypts and decrypts whole record frames
//! until dropped; the transport's only obligation is to deliver ciphertext
//! frames complete and in order.

use tracing::debug;

use crate::crypto::{self, KeyPair, PublicKey, SessionKeys, PUBLIC_KEY_SIZE};
use crate::error::{Error, Result};
use crate::handshake::{ClientHello, ServerHello};
use crate::payload::Payload;
use crate::version::{VersionNegotiator, SUPPORTED_VERSIONS};

/// Byte width of the record frame's counter prefix.
const COUNTER_PREFIX_SIZE: usize = 8;

/// Endpoint role, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Initiates the handshake and verifies the server's signature.
    Client,
    /// Responds to the handshake with its signed ephemeral key.
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    AwaitServerHello,
    Established,
    Failed,
}

/// One endpoint of an authenticated, confidential, ordered byte channel.
///
/// Construction fixes the role and identity material: a server passes its
/// long-term signing pair, a client passes the trusted server signing
/// public key as a public-only [`KeyPair`]. The handshake then derives
/// fresh directional session keys, and the record layer enforces strict
/// counter discipline in both directions.
pub struct Session {
    role: Role,
    identity: KeyPair,
    ephemeral: Option<KeyPair>,
    state: State,
    selected_version: Option<u16>,
    session_keys: Option<SessionKeys>,
    tx_counter: u64,
    rx_counter: u64,
}

/// The transcript the server signs: both ephemeral public keys, client
/// first.
fn handshake_transcript(client_pk: &PublicKey, server_pk: &PublicKey) -> [u8; 2 * PUBLIC_KEY_SIZE] {
    let mut transcript = [0u8; 2 * PUBLIC_KEY_SIZE];
    transcript[..PUBLIC_KEY_SIZE].copy_from_slice(client_pk.as_bytes());
    transcript[PUBLIC_KEY_SIZE..].copy_from_slice(server_pk.as_bytes());
    transcript
}

impl Session {
    /// Creates a session with the given role and identity material.
    pub fn new(role: Role, identity: KeyPair) -> Self {
        Self {
            role,
            identity,
            ephemeral: None,
            state: State::Init,
            selected_version: None,
            session_keys: None,
            tx_counter: 0,
            rx_counter: 0,
        }
    }

    /// This endpoint's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the handshake has completed and records may flow.
    pub fn is_handshake_complete(&self) -> bool {
        self.state == State::Established
    }

    /// The negotiated protocol version, set once the handshake completes.
    pub fn selected_version(&self) -> Option<u16> {
        self.selected_version
    }

    /// Counter the next outgoing record will carry.
    pub fn tx_counter(&self) -> u64 {
        self.tx_counter
    }

    /// Counter the next incoming record must carry.
    pub fn rx_counter(&self) -> u64 {
        self.rx_counter
    }

    /// Moves the session to its terminal failed state and returns `err`.
    fn fail<T>(&mut self, err: Error) -> Result<T> {
        self.state = State::Failed;
        debug!(role = ?self.role, error = %err, "session failed");
        Err(err)
    }

    /// Starts the handshake on a client session.
    ///
    /// Generates the ephemeral key-exchange pair and returns the
    /// [`ClientHello`] to deliver to the server.
    pub fn client_initiate_handshake(&mut self) -> Result<ClientHello> {
        if self.role != Role::Client {
            return Err(Error::InvalidState("only a client session may initiate"));
        }
        if self.state != State::Init {
            return Err(Error::InvalidState("handshake already initiated"));
        }

        let ephemeral = crypto::generate_kx_keypair();
        let hello = ClientHello {
            supported_versions: SUPPORTED_VERSIONS.to_vec(),
            ephemeral_pk: ephemeral.public_key,
        };

        self.ephemeral = Some(ephemeral);
        self.state = State::AwaitServerHello;
        Ok(hello)
    }

    /// Processes a [`ClientHello`] on a server session and completes the
    /// server side of the handshake.
    ///
    /// Negotiates the version, derives the session keys, and returns the
    /// [`ServerHello`] carrying this server's ephemeral public key and the
    /// transcript signature.
    pub fn server_respond_to_handshake(&mut self, client_hello: &ClientHello) -> Result<ServerHello> {
        if self.role != Role::Server {
            return Err(Error::InvalidState("only a server session may respond"));
        }
        if self.state != State::Init {
            return Err(Error::InvalidState("handshake already performed"));
        }

        let Some(version) =
            VersionNegotiator::negotiate(&client_hello.supported_versions, SUPPORTED_VERSIONS)
        else {
            return self.fail(Error::VersionMismatch);
        };

        let ephemeral = crypto::generate_kx_keypair();
        let session_keys =
            match crypto::server_compute_session_keys(&ephemeral, &client_hello.ephemeral_pk) {
                Ok(keys) => keys,
                Err(err) => return self.fail(err),
            };

        let transcript = handshake_transcript(&client_hello.ephemeral_pk, &ephemeral.public_key);
        let signature_result = match self.identity.private_key.as_ref() {
            Some(private_key) => crypto::sign(&transcript, private_key),
            None => Err(Error::invalid_key("server session has no signing private key")),
        };
        let signature = match signature_result {
            Ok(signature) => signature,
            Err(err) => return self.fail(err),
        };

        let hello = ServerHello {
            selected_version: version,
            ephemeral_pk: ephemeral.public_key,
            signature,
        };

        self.ephemeral = Some(ephemeral);
        self.selected_version = Some(version);
        self.session_keys = Some(session_keys);
        self.tx_counter = 0;
        self.rx_counter = 0;
        self.state = State::Established;
        debug!(version, role = ?self.role, "handshake complete");
        Ok(hello)
    }

    /// Processes the [`ServerHello`] on a client session and completes the
    /// handshake.
    ///
    /// Verifies the selected version and the server's transcript signature
    /// against the trusted signing public key, then derives the session
    /// keys.
    pub fn client_finalize_handshake(&mut self, server_hello: &ServerHello) -> Result<()> {
        if self.role != Role::Client {
            return Err(Error::InvalidState("only a client session may finalize"));
        }
        if self.state != State::AwaitServerHello {
            return Err(Error::InvalidState("no handshake awaiting finalization"));
        }

        if !SUPPORTED_VERSIONS.contains(&server_hello.selected_version) {
            return self.fail(Error::VersionMismatch);
        }

        let Some(ephemeral) = self.ephemeral.clone() else {
            return Err(Error::InvalidState("no handshake awaiting finalization"));
        };

        let transcript =
            handshake_transcript(&ephemeral.public_key, &server_hello.ephemeral_pk);
        if !crypto::verify(&server_hello.signature, &transcript, &self.identity.public_key) {
            return self.fail(Error::AuthFailure);
        }

        let session_keys =
            match crypto::client_compute_session_keys(&ephemeral, &server_hello.ephemeral_pk) {
                Ok(keys) => keys,
                Err(err) => return self.fail(err),
            };

        self.selected_version = Some(server_hello.selected_version);
        self.session_keys = Some(session_keys);
        self.tx_counter = 0;
        self.rx_counter = 0;
        self.state = State::Established;
        debug!(version = server_hello.selected_version, role = ?self.role, "handshake complete");
        Ok(())
    }

    /// Encrypts one payload into a record frame:
    /// `u64_be(counter) || ciphertext || tag`.
    ///
    /// The send counter increments on success; at its maximum the session
    /// fails with [`Error::CounterExhausted`] before emitting anything.
    pub fn encrypt_payload(&mut self, payload: &Payload) -> Result<Vec<u8>> {
        if self.state != State::Established {
            return Err(Error::InvalidState("record sent before handshake completion"));
        }
        if self.tx_counter == u64::MAX {
            return self.fail(Error::CounterExhausted);
        }

        let Some(keys) = self.session_keys.as_ref() else {
            return Err(Error::InvalidState("record sent before handshake completion"));
        };
        let tx_key = keys.tx.clone();

        let plaintext = payload.serialize();
        let ciphertext = match crypto::encrypt(&plaintext, self.tx_counter, &tx_key) {
            Ok(ciphertext) => ciphertext,
            Err(err) => return self.fail(err),
        };

        let mut frame = Vec::with_capacity(COUNTER_PREFIX_SIZE + ciphertext.len());
        frame.extend_from_slice(&self.tx_counter.to_be_bytes());
        frame.extend_from_slice(&ciphertext);
        self.tx_counter += 1;
        Ok(frame)
    }

    /// Decrypts one record frame back into a payload.
    ///
    /// The frame counter must equal the expected receive counter exactly;
    /// there is no acceptance window. A stale or future-indexed frame is
    /// rejected with [`Error::ReplayOrReorder`] without touching session
    /// state, so the in-order stream can continue. Authentication and
    /// framing failures are terminal.
    pub fn decrypt_packet(&mut self, frame: &[u8]) -> Result<Payload> {
        if self.state != State::Established {
            return Err(Error::InvalidState(
                "record received before handshake completion",
            ));
        }
        if frame.len() < COUNTER_PREFIX_SIZE {
            return self.fail(Error::malformed("record frame shorter than its counter prefix"));
        }

        let mut prefix = [0u8; COUNTER_PREFIX_SIZE];
        prefix.copy_from_slice(&frame[..COUNTER_PREFIX_SIZE]);
        let counter = u64::from_be_bytes(prefix);
        if counter != self.rx_counter {
            return Err(Error::ReplayOrReorder {
                expected: self.rx_counter,
                got: counter,
            });
        }

        let Some(keys) = self.session_keys.as_ref() else {
            return Err(Error::InvalidState(
                "record received before handshake completion",
            ));
        };
        let rx_key = keys.rx.clone();

        let plaintext = match crypto::decrypt(&frame[COUNTER_PREFIX_SIZE..], counter, &rx_key) {
            Ok(plaintext) => plaintext,
            Err(err) => return self.fail(err),
        };
        let payload = match Payload::deserialize(&plaintext) {
            Ok(payload) => payload,
            Err(err) => return self.fail(err),
        };

        self.rx_counter += 1;
        Ok(payload)
    }

    #[cfg(test)]
    fn force_tx_counter(&mut self, counter: u64) {
        self.tx_counter = counter;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("state", &self.state)
            .field("selected_version", &self.selected_version)
            .field("tx_counter", &self.tx_counter)
            .field("rx_counter", &self.rx_counter)
            .finish()
    }
}
