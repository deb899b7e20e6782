//! Star rating (0 = not rated)

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A 0-5 star rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 5;

    pub const UNRATED: Rating = Rating(0);

    /// Validated constructor, rejects anything outside 0-5
    pub fn new(stars: i64) -> Result<Self, ValidationError> {
        if (0..=i64::from(Self::MAX)).contains(&stars) {
            Ok(Rating(stars as u8))
        } else {
            Err(ValidationError::RatingOutOfRange(stars))
        }
    }

    /// Clamp to the nearest bound instead of rejecting
    pub fn saturating(stars: i64) -> Self {
        Rating(stars.clamp(0, i64::from(Self::MAX)) as u8)
    }

    pub fn stars(self) -> u8 {
        self.0
    }

    pub fn is_rated(self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}
