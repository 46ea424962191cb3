//! Error types.

use core::{error, fmt};

use crate::types::SessionState;

/// SRP authentication error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SrpError {
    /// Invalid construction-time configuration.
    Config {
        /// What was wrong with the configuration
        reason: &'static str,
    },
    /// A step was handed an empty or otherwise unusable argument.
    IllegalArgument {
        /// Argument name
        name: &'static str,
    },
    /// A step was called outside its single legal predecessor state.
    StateViolation {
        /// The state the session must be in for this step
        expected: SessionState,
        /// The state the session is actually in
        actual: SessionState,
    },
    /// The session exceeded its configured inactivity window.
    Timeout,
    /// A protocol value failed validation.
    IllegalParameter {
        /// Parameter name
        name: &'static str,
    },
    /// An evidence message did not match the locally computed one.
    BadRecordMac {
        /// Which peer's proof is invalid
        peer: &'static str,
    },
    /// A group name not present in the catalog.
    UnknownGroup {
        /// The requested name
        name: String,
    },
}

impl fmt::Display for SrpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => {
                write!(f, "invalid_configuration: {reason}")
            }
            Self::IllegalArgument { name } => {
                write!(f, "illegal_argument: '{name}' must not be empty")
            }
            Self::StateViolation { expected, actual } => {
                write!(
                    f,
                    "state_violation: session must be in '{expected}' state (currently '{actual}')"
                )
            }
            Self::Timeout => write!(f, "session timeout"),
            Self::IllegalParameter { name } => {
                write!(f, "illegal_parameter: bad '{name}' value")
            }
            Self::BadRecordMac { peer } => {
                write!(f, "bad_record_mac: incorrect '{peer}' proof")
            }
            Self::UnknownGroup { name } => {
                write!(f, "unknown_group: no such group '{name}'")
            }
        }
    }
}

impl error::Error for SrpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_vocabulary() {
        assert_eq!(
            SrpError::IllegalParameter { name: "b_pub" }.to_string(),
            "illegal_parameter: bad 'b_pub' value"
        );
        assert_eq!(
            SrpError::BadRecordMac { peer: "client" }.to_string(),
            "bad_record_mac: incorrect 'client' proof"
        );
        assert_eq!(
            SrpError::StateViolation {
                expected: SessionState::Step1,
                actual: SessionState::Init,
            }
            .to_string(),
            "state_violation: session must be in 'Step1' state (currently 'Init')"
        );
    }
}
