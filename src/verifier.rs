//! Verifier generation for user enrollment.
//!
//! The verifier `v = g^x mod N` is the only password-derived value the
//! server stores. It is produced once, over a protected channel, and looked
//! up by username during authentication.
//!
//! # Usage
//!
//! ```ignore
//! use sha2::Sha256;
//! use srp6a::verifier::{SrpVerifierGenerator, VerifierConfig};
//!
//! let generator = SrpVerifierGenerator::<Sha256>::new(VerifierConfig::default())?;
//! let v = generator.generate_verifier(&salt, "alice", "password123");
//! store_user(salt, "alice", v);
//! ```
//!
//! The generator must be configured with the same group and `x` derivation
//! variant as the sessions that will later consume the verifier.

use std::marker::PhantomData;

use digest::Digest;
use num_bigint::BigUint;

use crate::errors::SrpError;
use crate::groups::G_2048;
use crate::types::{ComputeX, SrpGroup};
use crate::utils::compute_verifier;

/// Configuration accepted by the [`SrpVerifierGenerator`] constructor.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// SRP group, `rfc-2048` by default.
    pub group: SrpGroup,
    /// How `x` is derived, [`ComputeX::WithoutUsername`] by default.
    pub compute_x: ComputeX,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            group: G_2048.clone(),
            compute_x: ComputeX::WithoutUsername,
        }
    }
}

/// Stateless verifier generator. Reusable and safe to share between
/// threads; every call builds its own digest.
pub struct SrpVerifierGenerator<D: Digest> {
    group: SrpGroup,
    compute_x: ComputeX,
    d: PhantomData<D>,
}

impl<D: Digest> SrpVerifierGenerator<D> {
    /// Create a new generator from the given configuration.
    pub fn new(config: VerifierConfig) -> Result<Self, SrpError> {
        config.group.validate()?;
        Ok(Self {
            group: config.group,
            compute_x: config.compute_x,
            d: PhantomData,
        })
    }

    /// Generate the verifier `v` for the given enrollment parameters.
    #[must_use]
    pub fn generate_verifier(&self, salt: &[u8], username: &str, password: &str) -> BigUint {
        let x = self.compute_x.compute::<D>(salt, username, password);
        compute_verifier(&self.group, &x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::G_1024;
    use crate::types::SrpGroup;
    use num_bigint::BigUint;
    use sha2::Sha256;

    #[test]
    fn defaults_to_rfc_2048() {
        let generator = SrpVerifierGenerator::<Sha256>::new(VerifierConfig::default()).unwrap();
        let v = generator.generate_verifier(&[0x0Au8; 16], "alice", "password123");
        assert!(v < G_2048.n);
        assert!(v.bits() > 0);
    }

    #[test]
    fn matches_direct_computation() {
        let config = VerifierConfig {
            group: G_1024.clone(),
            compute_x: ComputeX::WithUsername,
        };
        let generator = SrpVerifierGenerator::<Sha256>::new(config).unwrap();
        let salt = [0x42u8; 16];
        let v = generator.generate_verifier(&salt, "alice", "password123");

        let x = ComputeX::WithUsername.compute::<Sha256>(&salt, "alice", "password123");
        assert_eq!(v, G_1024.powm(&x));
    }

    #[test]
    fn rejects_zero_group() {
        let config = VerifierConfig {
            group: SrpGroup::new(BigUint::default(), BigUint::default()),
            compute_x: ComputeX::WithoutUsername,
        };
        assert!(SrpVerifierGenerator::<Sha256>::new(config).is_err());
    }
}
