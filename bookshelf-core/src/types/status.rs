//! Reading status and ownership format enums

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reading progress of a book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// On the to-read list
    #[default]
    Upcoming,

    /// Currently being read
    Reading,

    /// Read to the end
    Finished,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Upcoming, Status::Reading, Status::Finished];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Upcoming => "upcoming",
            Status::Reading => "reading",
            Status::Finished => "finished",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Status::Upcoming),
            "reading" => Ok(Status::Reading),
            "finished" => Ok(Status::Finished),
            _ => Err(ValidationError::UnknownVariant {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

/// How the copy of the book is owned
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Physical,
    Digital,
    Audio,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Physical => "physical",
            Format::Digital => "digital",
            Format::Audio => "audio",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physical" => Ok(Format::Physical),
            "digital" => Ok(Format::Digital),
            "audio" => Ok(Format::Audio),
            _ => Err(ValidationError::UnknownVariant {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("Reading".parse::<Status>().unwrap(), Status::Reading);
        assert_eq!(" finished ".parse::<Status>().unwrap(), Status::Finished);
        assert!("read".parse::<Status>().is_err());
    }

    #[test]
    fn test_status_rejects_unknown_string_on_load() {
        let parsed: Result<Status, _> = serde_json::from_str("\"abandoned\"");
        assert!(parsed.is_err());

        let parsed: Status = serde_json::from_str("\"upcoming\"").unwrap();
        assert_eq!(parsed, Status::Upcoming);
    }

    #[test]
    fn test_format_defaults_to_physical() {
        assert_eq!(Format::default(), Format::Physical);
        assert_eq!("AUDIO".parse::<Format>().unwrap(), Format::Audio);
    }
}
