//! An implementation of the [Secure Remote Password][1] (SRP-6a)
//! password-authenticated key-exchange protocol, following
//! [RFC 2945](https://tools.ietf.org/html/rfc2945) and
//! [RFC 5054](https://tools.ietf.org/html/rfc5054).
//!
//! SRP lets a client prove knowledge of a password to a server that stores
//! only a salted verifier. The password never crosses the wire, a passive
//! attacker learns nothing, and an active attacker gets exactly one guess
//! per protocol run. On success both sides hold the same session key
//! without having transmitted it.
//!
//! The crate is split into:
//! * A [`verifier`] module for the offline enrollment step: turning
//!   `(salt, username, password)` into the verifier `v` the server stores.
//! * A [`client`] module containing the three-step client session.
//! * A [`server`] module containing the two-step server session.
//! * A [`groups`] module with the standard groups from RFC 5054 Appendix A.
//! * A [`utils`] module exposing the individual protocol equations.
//! * [`types`] and [`errors`] modules for the shared configuration and
//!   error surface.
//!
//! The two sessions never talk to each other; the caller owns the
//! transport and feeds each peer the other's messages. Neither session
//! performs any I/O. The hash is pluggable through the [`Digest`] trait;
//! client, server and verifier generator must agree on the digest, the
//! group and the [`ComputeX`](types::ComputeX) variant.
//!
//! # Usage
//!
//! Enrollment happens once, over a protected channel; the server keeps
//! `(username, salt, v)` and discards the password:
//!
//! ```
//! use rand::rngs::OsRng;
//! use sha2::Sha256;
//! use srp6a::client::SrpClient;
//! use srp6a::groups::G_1024;
//! use srp6a::server::SrpServer;
//! use srp6a::types::SessionConfig;
//! use srp6a::utils::generate_random_salt;
//! use srp6a::verifier::{SrpVerifierGenerator, VerifierConfig};
//!
//! # fn main() -> Result<(), srp6a::errors::SrpError> {
//! let salt = generate_random_salt(&mut OsRng, 16);
//! let generator = SrpVerifierGenerator::<Sha256>::new(VerifierConfig {
//!     group: G_1024.clone(),
//!     ..VerifierConfig::default()
//! })?;
//! let v = generator.generate_verifier(&salt, "alice", "password123");
//!
//! // Authentication: the caller shuttles each output to the other peer.
//! let mut client = SrpClient::<Sha256>::new(SessionConfig::default())?;
//! let mut server = SrpServer::<Sha256>::new(SessionConfig::default())?;
//!
//! client.step1("alice", "password123")?;
//! let b_pub = server.step1("alice", &salt, &v)?;
//! let (a_pub, m1) = client.step2(&salt, &b_pub)?;
//! let m2 = server.step2(&a_pub, &m1)?;
//! client.step3(&m2)?;
//!
//! assert_eq!(client.session_key(), server.session_key());
//! # Ok(())
//! # }
//! ```
//!
//! Any failure after construction leaves the session in its previous state
//! but, for protocol violations (bad public value, bad proof), the peer is
//! not going to recover: build a fresh session per attempt.
//!
//! Note that SRP-6a's `x = H(s | H(I | ":" | P))` is not a modern password
//! hash. Where compatibility allows, run the password through a proper KDF
//! (argon2, scrypt, PBKDF2) before feeding it to this crate.
//!
//! [1]: https://en.wikipedia.org/wiki/Secure_Remote_Password_protocol

pub use digest::Digest;

pub mod client;
pub mod errors;
pub mod groups;
pub mod server;
pub mod types;
pub mod utils;
pub mod verifier;
