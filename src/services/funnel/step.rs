use std::fmt;

use serde::{Deserialize, Serialize};

/// Funnel steps in order. Movement is linear, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Dates,
    RoomSelect,
    GuestInfo,
    Review,
    Payment,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Dates,
        Step::RoomSelect,
        Step::GuestInfo,
        Step::Review,
        Step::Payment,
    ];

    pub fn index(self) -> usize {
        match self {
            Step::Dates => 0,
            Step::RoomSelect => 1,
            Step::GuestInfo => 2,
            Step::Review => 3,
            Step::Payment => 4,
        }
    }

    pub fn next(self) -> Option<Step> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Dates => "dates",
            Step::RoomSelect => "room_select",
            Step::GuestInfo => "guest_info",
            Step::Review => "review",
            Step::Payment => "payment",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_order() {
        assert_eq!(Step::Dates.next(), Some(Step::RoomSelect));
        assert_eq!(Step::Review.next(), Some(Step::Payment));
        assert_eq!(Step::Payment.next(), None);
        assert_eq!(Step::Dates.previous(), None);
        assert_eq!(Step::GuestInfo.previous(), Some(Step::RoomSelect));
    }

    #[test]
    fn test_index_matches_all() {
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }
}
