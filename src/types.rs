//! Additional SRP types.

use core::fmt;
use std::time::Duration;

use digest::Digest;
use num_bigint::BigUint;
use rand::RngCore;

use crate::errors::SrpError;
use crate::groups::G_1024;
use crate::utils::{compute_x_with_username, compute_x_without_username, generate_private_value};

/// Group used for SRP computations
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SrpGroup {
    /// A large safe prime (N = 2q+1, where q is prime)
    pub n: BigUint,
    /// A generator modulo N
    pub g: BigUint,
}

impl SrpGroup {
    /// Initialize a new group from the given prime and generator.
    pub fn new(n: BigUint, g: BigUint) -> Self {
        Self { n, g }
    }

    /// g^exp mod N
    #[must_use]
    pub fn powm(&self, exp: &BigUint) -> BigUint {
        self.g.modpow(exp, &self.n)
    }

    /// Byte length of the prime, the width `PAD` pads to.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        ((self.n.bits() + 7) / 8) as usize
    }

    pub(crate) fn validate(&self) -> Result<(), SrpError> {
        if self.n.bits() == 0 || self.g.bits() == 0 {
            return Err(SrpError::Config {
                reason: "the group prime and generator must not be zero",
            });
        }
        Ok(())
    }
}

/// Selects how the password-derived private key `x` is computed.
///
/// Client, server and verifier generator must be configured with the same
/// variant for the resulting verifiers and session keys to interoperate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeX {
    /// `x = H(s | H(P))`; the user identity is ignored, so the stored
    /// verifier survives a username change.
    WithoutUsername,
    /// `x = H(s | H(I | ":" | P))` per RFC 5054.
    WithUsername,
}

impl ComputeX {
    /// Compute `x` for the configured variant.
    #[must_use]
    pub fn compute<D: Digest>(self, salt: &[u8], username: &str, password: &str) -> BigUint {
        match self {
            Self::WithoutUsername => compute_x_without_username::<D>(salt, password),
            Self::WithUsername => compute_x_with_username::<D>(salt, username, password),
        }
    }
}

/// The states a session moves through. Transitions are strictly forward and
/// a session is single-use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    Step1,
    Step2,
    Step3,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Init => "Init",
            Self::Step1 => "Step1",
            Self::Step2 => "Step2",
            Self::Step3 => "Step3",
        })
    }
}

/// Source of ephemeral private values `a`/`b`.
///
/// The default is [`generate_private_value`]. Replacing it pins the
/// ephemerals and makes every derived value reproducible; the test suite
/// uses this to replay the RFC 5054 vectors through whole sessions.
pub type PrivateValueSource = fn(&mut dyn RngCore, &BigUint) -> BigUint;

/// Configuration accepted by [`SrpClient`](crate::client::SrpClient) and
/// [`SrpServer`](crate::server::SrpServer) constructors.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// SRP group, `rfc-1024` by default.
    pub group: SrpGroup,
    /// How `x` is derived, [`ComputeX::WithoutUsername`] by default.
    pub compute_x: ComputeX,
    /// Inactivity window checked before Step2/Step3 work; zero disables.
    pub timeout: Duration,
    /// Ephemeral private value source.
    pub private_value_source: PrivateValueSource,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            group: G_1024.clone(),
            compute_x: ComputeX::WithoutUsername,
            timeout: Duration::ZERO,
            private_value_source: generate_private_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::big_uint_from_hex;
    use sha1::Sha1;

    #[test]
    fn compute_x_variants_differ() {
        let salt = [0x01u8; 16];
        let with = ComputeX::WithUsername.compute::<Sha1>(&salt, "alice", "password123");
        let without = ComputeX::WithoutUsername.compute::<Sha1>(&salt, "alice", "password123");
        assert_ne!(with, without);

        // WithoutUsername must not look at the identity at all.
        let other = ComputeX::WithoutUsername.compute::<Sha1>(&salt, "bob", "password123");
        assert_eq!(without, other);
    }

    #[test]
    fn group_helpers() {
        let grp = SrpGroup::new(big_uint_from_hex("EEAF0AB9"), big_uint_from_hex("2"));
        assert_eq!(grp.byte_len(), 4);
        assert_eq!(grp.powm(&BigUint::from(3u32)), BigUint::from(8u32));
        assert!(grp.validate().is_ok());

        let bad = SrpGroup::new(BigUint::default(), big_uint_from_hex("2"));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.group, *G_1024);
        assert_eq!(config.compute_x, ComputeX::WithoutUsername);
        assert_eq!(config.timeout, Duration::ZERO);
    }
}
