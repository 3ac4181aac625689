use thiserror::Error;

/// Failures of the token-then-submit registration protocol.
///
/// The `Display` output is the message shown to the user; transport details
/// only go to the log.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Failed to get token")]
    TokenUnavailable,
    #[error("{}", .message.as_deref().unwrap_or("Registration failed"))]
    Rejected { message: Option<String> },
    #[error("Registration error")]
    Transport(#[source] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown form field: {0}")]
    UnknownField(String),
    #[error("field {field} does not accept a {kind} value")]
    ValueKindMismatch {
        field: &'static str,
        kind: &'static str,
    },
}
