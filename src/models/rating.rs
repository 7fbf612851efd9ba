//! Recall grades offered after each item is shown.
use crate::error::SessionError;

/// Four-grade recall scale. Fail and Hard are lapses, Good and Easy are successes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    Fail = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Fail, Rating::Hard, Rating::Good, Rating::Easy];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn is_success(self) -> bool {
        self >= Rating::Good
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Fail => "Fail",
            Rating::Hard => "Hard",
            Rating::Good => "Good",
            Rating::Easy => "Easy",
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = SessionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Rating::Fail),
            2 => Ok(Rating::Hard),
            3 => Ok(Rating::Good),
            4 => Ok(Rating::Easy),
            other => Err(SessionError::InvalidRating(other)),
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}
