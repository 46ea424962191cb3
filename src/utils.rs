//! The SRP-6a primitive layer.
//!
//! Pure functions implementing the individual protocol equations over
//! [`BigUint`] and a [`Digest`]. Byte-level conventions follow RFC 5054:
//! integers are serialized as minimal unsigned big-endian strings (zero
//! encodes to the empty string), except that `compute_k` pads `g` and
//! `compute_u` pads `A` and `B` to the byte length of the prime. The
//! evidence messages deliberately stay minimal; normalizing the two
//! conventions breaks test-vector compatibility.

use digest::Digest;
use num_bigint::{BigUint, RandBigInt};
use rand::RngCore;

use crate::types::SrpGroup;

/// Minimal unsigned big-endian encoding; zero encodes to the empty string.
#[must_use]
pub fn to_be_bytes(x: &BigUint) -> Vec<u8> {
    if x.bits() == 0 {
        Vec::new()
    } else {
        x.to_bytes_be()
    }
}

/// `PAD(x, len)`: left-zero-pad the minimal encoding to exactly `len` bytes.
/// A value too wide to fit is returned in its minimal encoding.
#[must_use]
pub fn pad(x: &BigUint, len: usize) -> Vec<u8> {
    let bytes = to_be_bytes(x);
    if bytes.len() >= len {
        return bytes;
    }
    let mut buf = vec![0u8; len];
    buf[len - bytes.len()..].copy_from_slice(&bytes);
    buf
}

/// k = H(N | PAD(g))
#[must_use]
pub fn compute_k<D: Digest>(params: &SrpGroup) -> BigUint {
    let n = to_be_bytes(&params.n);
    let mut d = D::new();
    d.update(&n);
    d.update(pad(&params.g, n.len()));
    BigUint::from_bytes_be(&d.finalize())
}

/// u = H(PAD(A) | PAD(B))
#[must_use]
pub fn compute_u<D: Digest>(params: &SrpGroup, a_pub: &BigUint, b_pub: &BigUint) -> BigUint {
    let l = params.byte_len();
    let mut d = D::new();
    d.update(pad(a_pub, l));
    d.update(pad(b_pub, l));
    BigUint::from_bytes_be(&d.finalize())
}

/// x = H(s | H(I | ":" | P)) per RFC 5054.
#[must_use]
pub fn compute_x_with_username<D: Digest>(salt: &[u8], username: &str, password: &str) -> BigUint {
    let inner = {
        let mut d = D::new();
        d.update(username.as_bytes());
        d.update(b":");
        d.update(password.as_bytes());
        d.finalize()
    };
    let mut d = D::new();
    d.update(salt);
    d.update(&inner);
    BigUint::from_bytes_be(&d.finalize())
}

/// x = H(s | H(P)); the identity is left out of the derivation.
#[must_use]
pub fn compute_x_without_username<D: Digest>(salt: &[u8], password: &str) -> BigUint {
    let inner = D::digest(password.as_bytes());
    let mut d = D::new();
    d.update(salt);
    d.update(&inner);
    BigUint::from_bytes_be(&d.finalize())
}

/// v = g^x mod N
#[must_use]
pub fn compute_verifier(params: &SrpGroup, x: &BigUint) -> BigUint {
    params.powm(x)
}

/// A = g^a mod N
#[must_use]
pub fn compute_public_client_value(params: &SrpGroup, a: &BigUint) -> BigUint {
    params.powm(a)
}

/// B = (k*v + g^b) mod N
#[must_use]
pub fn compute_public_server_value(
    params: &SrpGroup,
    k: &BigUint,
    v: &BigUint,
    b: &BigUint,
) -> BigUint {
    let inter = (k * v) % &params.n;
    (inter + params.powm(b)) % &params.n
}

/// S = (B - k*g^x) ^ (a + u*x) mod N
#[must_use]
pub fn compute_client_session_key(
    params: &SrpGroup,
    k: &BigUint,
    x: &BigUint,
    u: &BigUint,
    a: &BigUint,
    b_pub: &BigUint,
) -> BigUint {
    let n = &params.n;
    let interm = (k * params.powm(x)) % n;
    // Because we do operation in modulo N we can get: (kv + g^b) < kv
    let base = if b_pub > &interm {
        (b_pub - &interm) % n
    } else {
        (n + b_pub - &interm) % n
    };
    base.modpow(&(a + u * x), n)
}

/// S = (A * v^u) ^ b mod N
#[must_use]
pub fn compute_server_session_key(
    params: &SrpGroup,
    v: &BigUint,
    u: &BigUint,
    a_pub: &BigUint,
    b: &BigUint,
) -> BigUint {
    let base = (a_pub * v.modpow(u, &params.n)) % &params.n;
    base.modpow(b, &params.n)
}

/// M1 = H(A | B | S), minimal encodings.
#[must_use]
pub fn compute_client_evidence<D: Digest>(
    a_pub: &BigUint,
    b_pub: &BigUint,
    session_key: &BigUint,
) -> BigUint {
    let mut d = D::new();
    d.update(to_be_bytes(a_pub));
    d.update(to_be_bytes(b_pub));
    d.update(to_be_bytes(session_key));
    BigUint::from_bytes_be(&d.finalize())
}

/// M2 = H(A | M1 | S), minimal encodings.
#[must_use]
pub fn compute_server_evidence<D: Digest>(
    a_pub: &BigUint,
    client_evidence: &BigUint,
    session_key: &BigUint,
) -> BigUint {
    let mut d = D::new();
    d.update(to_be_bytes(a_pub));
    d.update(to_be_bytes(client_evidence));
    d.update(to_be_bytes(session_key));
    BigUint::from_bytes_be(&d.finalize())
}

/// A received public value is acceptable iff it is not a multiple of N.
#[must_use]
pub fn is_valid_public_value(n: &BigUint, value: &BigUint) -> bool {
    value % n != BigUint::default()
}

/// Draw a uniform private value in `[1, min(2^256, N) - 1]`.
#[must_use]
pub fn generate_private_value(rng: &mut dyn RngCore, n: &BigUint) -> BigUint {
    let ceiling = BigUint::from(1u8) << 256;
    let bound = if *n < ceiling { n.clone() } else { ceiling };
    rng.gen_biguint_range(&BigUint::from(1u8), &bound)
}

/// `num_bytes` uniform random bytes.
#[must_use]
pub fn generate_random_salt(rng: &mut dyn RngCore, num_bytes: usize) -> Vec<u8> {
    let mut salt = vec![0u8; num_bytes];
    rng.fill_bytes(&mut salt);
    salt
}

/// Parse a hex string into a non-negative integer. ASCII whitespace is
/// stripped first; leading zeros are permitted.
///
/// # Panics
///
/// Panics on an empty string or any non-hex character. Malformed input here
/// is a programmer error: the parser only ever sees compile-time constants
/// (the group table and test vectors).
#[must_use]
pub fn big_uint_from_hex(hex: &str) -> BigUint {
    let cleaned: String = hex.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    assert!(!cleaned.is_empty(), "empty hex string");
    match BigUint::parse_bytes(cleaned.as_bytes(), 16) {
        Some(x) => x,
        None => panic!("invalid hex string {hex:?}"),
    }
}
