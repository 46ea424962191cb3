//! SRP client session.
//!
//! A three-step state machine driving the client side of the SRP-6a
//! handshake. Steps must be called in order on a single owner; a session is
//! single-use and must be discarded after any protocol failure.
//!
//! # Usage
//!
//! Authorize the session with the user's credentials:
//!
//! ```ignore
//! use sha2::Sha256;
//! use srp6a::client::SrpClient;
//! use srp6a::types::SessionConfig;
//!
//! let mut client = SrpClient::<Sha256>::new(SessionConfig::default())?;
//! client.step1("alice", "password123")?;
//! ```
//!
//! Send the username to the server and receive `salt` and `b_pub` in
//! return, then compute the public value and evidence message to send back:
//!
//! ```ignore
//! let (a_pub, m1) = client.step2(&salt, &b_pub)?;
//! ```
//!
//! Finally check the server's evidence message from the reply. `step3`
//! fails if the server did not prove possession of the same session key:
//!
//! ```ignore
//! client.step3(&m2)?;
//! let key = client.session_key().unwrap();
//! ```

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use digest::Digest;
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use subtle::ConstantTimeEq;

use crate::errors::SrpError;
use crate::types::{ComputeX, PrivateValueSource, SessionConfig, SessionState, SrpGroup};
use crate::utils::{
    compute_client_evidence, compute_client_session_key, compute_k, compute_server_evidence,
    compute_u, is_valid_public_value, to_be_bytes,
};

/// Client-side session data, one variant per protocol state.
enum ClientState {
    Init,
    Step1 {
        username: String,
        password: String,
    },
    Step2 {
        a_pub: BigUint,
        client_evidence: BigUint,
        session_key: BigUint,
    },
    Step3 {
        session_key: BigUint,
    },
}

impl ClientState {
    fn state(&self) -> SessionState {
        match self {
            Self::Init => SessionState::Init,
            Self::Step1 { .. } => SessionState::Step1,
            Self::Step2 { .. } => SessionState::Step2,
            Self::Step3 { .. } => SessionState::Step3,
        }
    }
}

/// SRP client state machine.
pub struct SrpClient<D: Digest> {
    group: SrpGroup,
    compute_x: ComputeX,
    timeout: Duration,
    rng: StdRng,
    private_value_source: PrivateValueSource,
    last_activity: Instant,
    state: ClientState,
    d: PhantomData<D>,
}

impl<D: Digest> SrpClient<D> {
    /// Create a new client session from the given configuration.
    pub fn new(config: SessionConfig) -> Result<Self, SrpError> {
        config.group.validate()?;
        Ok(Self {
            group: config.group,
            compute_x: config.compute_x,
            timeout: config.timeout,
            rng: StdRng::from_entropy(),
            private_value_source: config.private_value_source,
            last_activity: Instant::now(),
            state: ClientState::Init,
            d: PhantomData,
        })
    }

    /// Record the user's credentials and authorize the session to proceed.
    /// No cryptographic work happens here.
    pub fn step1(&mut self, username: &str, password: &str) -> Result<(), SrpError> {
        if username.is_empty() {
            return Err(SrpError::IllegalArgument { name: "username" });
        }
        if password.is_empty() {
            return Err(SrpError::IllegalArgument { name: "password" });
        }
        match &self.state {
            ClientState::Init => {}
            other => {
                return Err(SrpError::StateViolation {
                    expected: SessionState::Init,
                    actual: other.state(),
                })
            }
        }

        self.state = ClientState::Step1 {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        self.last_activity = Instant::now();
        Ok(())
    }

    /// Process the server challenge `(salt, B)`; returns the public value
    /// `A` and evidence message `M1` to send back.
    pub fn step2(&mut self, salt: &[u8], b_pub: &BigUint) -> Result<(BigUint, BigUint), SrpError> {
        if salt.is_empty() {
            return Err(SrpError::IllegalArgument { name: "salt" });
        }
        let (username, password) = match &self.state {
            ClientState::Step1 { username, password } => (username.clone(), password.clone()),
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
        // Safeguard against malicious B
        if !is_valid_public_value(&self.group.n, b_pub) {
            return Err(SrpError::IllegalParameter { name: "b_pub" });
        }

        let x = self.compute_x.compute::<D>(salt, &username, &password);
        let a = (self.private_value_source)(&mut self.rng, &self.group.n);
        let a_pub = self.group.powm(&a);
        let k = compute_k::<D>(&self.group);
        let u = compute_u::<D>(&self.group, &a_pub, b_pub);
        if u.bits() == 0 {
            return Err(SrpError::IllegalParameter { name: "u" });
        }
        let session_key = compute_client_session_key(&self.group, &k, &x, &u, &a, b_pub);
        let client_evidence = compute_client_evidence::<D>(&a_pub, b_pub, &session_key);

        self.state = ClientState::Step2 {
            a_pub: a_pub.clone(),
            client_evidence: client_evidence.clone(),
            session_key,
        };
        self.last_activity = Instant::now();
        Ok((a_pub, client_evidence))
    }

    /// Check the server evidence message `M2`. Failure means the server
    /// does not hold the same session key; discard the session.
    pub fn step3(&mut self, server_evidence: &BigUint) -> Result<(), SrpError> {
        let (a_pub, client_evidence, session_key) = match &self.state {
            ClientState::Step2 {
                a_pub,
                client_evidence,
                session_key,
            } => (a_pub, client_evidence, session_key),
            other => {
                return Err(SrpError::StateViolation {
                    expected: SessionState::Step2,
                    actual: other.state(),
                })
            }
        };
        if self.has_timed_out() {
            return Err(SrpError::Timeout);
        }

        let expected = compute_server_evidence::<D>(a_pub, client_evidence, session_key);
        if to_be_bytes(&expected)
            .ct_eq(&to_be_bytes(server_evidence))
            .unwrap_u8()
            != 1
        {
            return Err(SrpError::BadRecordMac { peer: "server" });
        }

        let session_key = session_key.clone();
        self.state = ClientState::Step3 { session_key };
        self.last_activity = Instant::now();
        Ok(())
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
            ClientState::Step2 { session_key, .. } | ClientState::Step3 { session_key } => {
                Some(session_key)
            }
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
