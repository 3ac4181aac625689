use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);

/// Positions a new user can register for. The discriminant is the backend `position_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    Lawyer = 1,
    ContentManager = 2,
    Security = 3,
    Designer = 4,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Lawyer,
        Position::ContentManager,
        Position::Security,
        Position::Designer,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Lawyer => "Lawyer",
            Position::ContentManager => "Content manager",
            Position::Security => "Security",
            Position::Designer => "Designer",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for Position {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Position::ALL
            .into_iter()
            .find(|position| position.id() == value)
            .ok_or_else(|| DomainError::UnknownPosition(value.to_string()))
    }
}

impl From<Position> for u8 {
    fn from(value: Position) -> Self {
        value.id()
    }
}

impl FromStr for Position {
    type Err = DomainError;

    /// Parses the radio-button value, i.e. the numeric id as text.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::MissingPosition);
        }
        trimmed
            .parse::<u8>()
            .map_err(|_| DomainError::UnknownPosition(trimmed.to_string()))
            .and_then(Position::try_from)
    }
}
