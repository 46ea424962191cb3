//! SRP server session.
//!
//! A two-step state machine driving the server side of the SRP-6a
//! handshake. Steps must be called in order on a single owner; a session is
//! single-use and must be discarded after any protocol failure.
//!
//! # Usage
//!
//! Receive the username, look up the stored `(salt, verifier)` record, and
//! produce the challenge to send back:
//!
//! ```ignore
//! use sha2::Sha256;
//! use srp6a::server::SrpServer;
//! use srp6a::types::SessionConfig;
//!
//! let mut server = SrpServer::<Sha256>::new(SessionConfig::default())?;
//! let b_pub = server.step1("alice", &salt, &verifier)?;
//! ```
//!
//! Then process the client's `(A, M1)` reply. `step2` only succeeds if the
//! client proved knowledge of the password; on success it returns the
//! server evidence message `M2` for the final reply:
//!
//! ```ignore
//! let m2 = server.step2(&a_pub, &m1)?;
//! let key = server.session_key().unwrap();
//! ```

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use digest::Digest;
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use subtle::ConstantTimeEq;

use crate::errors::SrpError;
use crate::types::{PrivateValueSource, SessionConfig, SessionState, SrpGroup};
use crate::utils::{
    compute_client_evidence, compute_k, compute_public_server_value, compute_server_evidence,
    compute_server_session_key, compute_u, is_valid_public_value, to_be_bytes,
};

/// Server-side session data, one variant per protocol state.
enum ServerState {
    Init,
    Step1 {
        verifier: BigUint,
        b: BigUint,
        b_pub: BigUint,
    },
    Step2 {
        session_key: BigUint,
    },
}

impl ServerState {
    fn state(&self) -> SessionState {
        match self {
            Self::Init => SessionState::Init,
            Self::Step1 { .. } => SessionState::Step1,
            Self::Step2 { .. } => SessionState::Step2,
        }
    }
}

/// SRP server state machine. The `compute_x` setting of the shared
/// [`SessionConfig`] does not participate here; the verifier is an input.
pub struct SrpServer<D: Digest> {
    group: SrpGroup,
    timeout: Duration,
    rng: StdRng,
    private_value_source: PrivateValueSource,
    last_activity: Instant,
    state: ServerState,
    d: PhantomData<D>,
}

impl<D: Digest> SrpServer<D> {
    /// Create a new server session from the given configuration.
    pub fn new(config: SessionConfig) -> Result<Self, SrpError> {
        config.group.validate()?;
        Ok(Self {
            group: config.group,
            timeout: config.timeout,
            rng: StdRng::from_entropy(),
            private_value_source: config.private_value_source,
            last_activity: Instant::now(),
            state: ServerState::Init,
            d: PhantomData,
        })
    }

    /// Take the user's identity and stored `(salt, verifier)` record and
    /// produce the public challenge value `B`.
    pub fn step1(
        &mut self,
        username: &str,
        salt: &[u8],
        verifier: &BigUint,
    ) -> Result<BigUint, SrpError> {
        if username.is_empty() {
            return Err(SrpError::IllegalArgument { name: "username" });
        }
        if salt.is_empty() {
            return Err(SrpError::IllegalArgument { name: "salt" });
        }
        if verifier.bits() == 0 {
            return Err(SrpError::IllegalArgument { name: "verifier" });
        }
        match &self.state {
            ServerState::Init => {}
            other => {
                return Err(SrpError::StateViolation {
                    expected: SessionState::Init,
                    actual: other.state(),
                })
            }
        }

        let k = compute_k::<D>(&self.group);
        let b = (self.private_value_source)(&mut self.rng, &self.group.n);
        let b_pub = compute_public_server_value(&self.group, &k, verifier, &b);

        self.state = ServerState::Step1 {
            verifier: verifier.clone(),
            b,
            b_pub: b_pub.clone(),
        };
        self.last_activity = Instant::now();
        Ok(b_pub)
    }

    /// Process the client's `(A, M1)` reply; returns the server evidence
    /// message `M2` if and only if the client's proof checks out.
    pub fn step2(
        &mut self,
        a_pub: &BigUint,
        client_evidence: &BigUint,
    ) -> Result<BigUint, SrpError> {
        let (verifier, b, b_pub) = match &self.state {
            ServerState::Step1 { verifier, b, b_pub } => (verifier, b, b_pub),
            other => {
                return Err(SrpError::StateViolation {
                    expected: SessionState::Step1,
                    actual: other.state(),
                })
            }
        };
        if self.has_timed_out() {
            return Err(SrpError::Timeout);
        }
        // Safeguard against malicious A
        if !is_valid_public_value(&self.group.n, a_pub) {
            return Err(SrpError::IllegalParameter { name: "a_pub" });
        }

        let u = compute_u::<D>(&self.group, a_pub, b_pub);
        if u.bits() == 0 {
            return Err(SrpError::IllegalParameter { name: "u" });
        }
        let session_key = compute_server_session_key(&self.group, verifier, &u, a_pub, b);
        let expected = compute_client_evidence::<D>(a_pub, b_pub, &session_key);
        if to_be_bytes(&expected)
            .ct_eq(&to_be_bytes(client_evidence))
            .unwrap_u8()
            != 1
        {
            return Err(SrpError::BadRecordMac { peer: "client" });
        }
        let server_evidence = compute_server_evidence::<D>(a_pub, client_evidence, &session_key);

        self.state = ServerState::Step2 { session_key };
        self.last_activity = Instant::now();
        Ok(server_evidence)
    }

    /// Current protocol state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.state()
    }

    /// The negotiated session key `S`, available once Step2 has succeeded.
    #[must_use]
    pub fn session_key(&self) -> Option<&BigUint> {
        match &self.state {
            ServerState::Step2 { session_key } => Some(session_key),
            _ => None,
        }
    }

    /// The configured inactivity window; zero means no timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Timestamp of the last successful step.
    #[must_use]
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    fn has_timed_out(&self) -> bool {
        self.timeout != Duration::ZERO && self.last_activity.elapsed() > self.timeout
    }
}
