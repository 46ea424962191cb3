//! State-machine ordering and timeout behavior for both peers.

use std::thread;
use std::time::Duration;

use num_bigint::BigUint;
use rand::rngs::OsRng;
use sha2::Sha256;

use srp6a::client::SrpClient;
use srp6a::errors::SrpError;
use srp6a::server::SrpServer;
use srp6a::types::{SessionConfig, SessionState};
use srp6a::utils::generate_random_salt;
use srp6a::verifier::{SrpVerifierGenerator, VerifierConfig};

#[test]
fn client_rejects_out_of_order_steps() {
    let mut client = SrpClient::<Sha256>::new(SessionConfig::default()).unwrap();
    let salt = [1u8; 16];
    let one = BigUint::from(1u8);

    // Step3 straight after construction
    assert_eq!(
        client.step3(&one),
        Err(SrpError::StateViolation {
            expected: SessionState::Step2,
            actual: SessionState::Init,
        })
    );
    // Step2 before Step1
    assert_eq!(
        client.step2(&salt, &one),
        Err(SrpError::StateViolation {
            expected: SessionState::Step1,
            actual: SessionState::Init,
        })
    );
    assert_eq!(client.state(), SessionState::Init);

    // Step1 twice
    client.step1("alice", "password").unwrap();
    assert_eq!(
        client.step1("alice", "password"),
        Err(SrpError::StateViolation {
            expected: SessionState::Init,
            actual: SessionState::Step1,
        })
    );
    assert_eq!(client.state(), SessionState::Step1);
}

#[test]
fn server_rejects_out_of_order_steps() {
    let mut server = SrpServer::<Sha256>::new(SessionConfig::default()).unwrap();
    let one = BigUint::from(1u8);

    assert_eq!(
        server.step2(&one, &one),
        Err(SrpError::StateViolation {
            expected: SessionState::Step1,
            actual: SessionState::Init,
        })
    );
    assert_eq!(server.state(), SessionState::Init);

    server.step1("alice", &[1u8; 16], &one).unwrap();
    assert_eq!(
        server.step1("alice", &[1u8; 16], &one),
        Err(SrpError::StateViolation {
            expected: SessionState::Init,
            actual: SessionState::Step1,
        })
    );
    assert_eq!(server.state(), SessionState::Step1);
}

/// A completed session stays completed; it cannot be driven again.
#[test]
fn sessions_are_single_use() {
    let salt = generate_random_salt(&mut OsRng, 16);
    let generator = SrpVerifierGenerator::<Sha256>::new(VerifierConfig {
        group: srp6a::groups::G_1024.clone(),
        ..VerifierConfig::default()
    })
    .unwrap();
    let v = generator.generate_verifier(&salt, "alice", "password");

    let mut client = SrpClient::<Sha256>::new(SessionConfig::default()).unwrap();
    let mut server = SrpServer::<Sha256>::new(SessionConfig::default()).unwrap();

    client.step1("alice", "password").unwrap();
    let b_pub = server.step1("alice", &salt, &v).unwrap();
    let (a_pub, m1) = client.step2(&salt, &b_pub).unwrap();
    let m2 = server.step2(&a_pub, &m1).unwrap();
    client.step3(&m2).unwrap();

    assert_eq!(
        client.step1("alice", "password"),
        Err(SrpError::StateViolation {
            expected: SessionState::Init,
            actual: SessionState::Step3,
        })
    );
    assert_eq!(
        server.step2(&a_pub, &m1),
        Err(SrpError::StateViolation {
            expected: SessionState::Step1,
            actual: SessionState::Step2,
        })
    );
    assert_eq!(
        client.step3(&m2),
        Err(SrpError::StateViolation {
            expected: SessionState::Step2,
            actual: SessionState::Step3,
        })
    );
}

#[test]
fn client_times_out() {
    let config = SessionConfig {
        timeout: Duration::from_millis(1),
        ..SessionConfig::default()
    };
    let mut client = SrpClient::<Sha256>::new(config).unwrap();
    client.step1("alice", "password").unwrap();

    thread::sleep(Duration::from_millis(5));

    let salt = [1u8; 16];
    assert_eq!(
        client.step2(&salt, &BigUint::from(1u8)),
        Err(SrpError::Timeout)
    );
    // a timed-out step never advances the session
    assert_eq!(client.state(), SessionState::Step1);
}

#[test]
fn server_times_out() {
    let config = SessionConfig {
        timeout: Duration::from_millis(1),
        ..SessionConfig::default()
    };
    let mut server = SrpServer::<Sha256>::new(config).unwrap();
    server
        .step1("alice", &[1u8; 16], &BigUint::from(7u32))
        .unwrap();

    thread::sleep(Duration::from_millis(5));

    assert_eq!(
        server.step2(&BigUint::from(1u8), &BigUint::from(1u8)),
        Err(SrpError::Timeout)
    );
    assert_eq!(server.state(), SessionState::Step1);
}

/// A zero timeout disables the inactivity check entirely.
#[test]
fn zero_timeout_never_expires() {
    let salt = generate_random_salt(&mut OsRng, 16);
    let generator = SrpVerifierGenerator::<Sha256>::new(VerifierConfig {
        group: srp6a::groups::G_1024.clone(),
        ..VerifierConfig::default()
    })
    .unwrap();
    let v = generator.generate_verifier(&salt, "alice", "password");

    let mut client = SrpClient::<Sha256>::new(SessionConfig::default()).unwrap();
    let mut server = SrpServer::<Sha256>::new(SessionConfig::default()).unwrap();
    assert_eq!(client.timeout(), Duration::ZERO);

    client.step1("alice", "password").unwrap();
    let b_pub = server.step1("alice", &salt, &v).unwrap();

    thread::sleep(Duration::from_millis(5));

    let (a_pub, m1) = client.step2(&salt, &b_pub).unwrap();
    let m2 = server.step2(&a_pub, &m1).unwrap();
    client.step3(&m2).unwrap();
}

#[test]
fn steps_refresh_last_activity() {
    let mut client = SrpClient::<Sha256>::new(SessionConfig::default()).unwrap();
    let before = client.last_activity();
    thread::sleep(Duration::from_millis(2));
    client.step1("alice", "password").unwrap();
    assert!(client.last_activity() > before);
}
