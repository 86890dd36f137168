//! A single pairwise game. Both dispositions are queried once through the
//! mistake-prone accessor at creation time and frozen into the deal; the deal
//! itself only records which side, if any, was the lone cheater.

use contracts::{Disposition, Outcome};

use crate::trader::TraderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DealKind {
    BothCooperate,
    BothCheat,
    OnlyOneCheated { first_cheated: bool },
}

impl DealKind {
    fn of(first: Disposition, second: Disposition) -> Self {
        if first != second {
            return Self::OnlyOneCheated {
                first_cheated: first == Disposition::Cheat,
            };
        }
        match first {
            Disposition::Cheat => Self::BothCheat,
            Disposition::Cooperate => Self::BothCooperate,
        }
    }

    fn dispositions(self) -> (Disposition, Disposition) {
        match self {
            Self::BothCooperate => (Disposition::Cooperate, Disposition::Cooperate),
            Self::BothCheat => (Disposition::Cheat, Disposition::Cheat),
            Self::OnlyOneCheated { first_cheated: true } => {
                (Disposition::Cheat, Disposition::Cooperate)
            }
            Self::OnlyOneCheated {
                first_cheated: false,
            } => (Disposition::Cooperate, Disposition::Cheat),
        }
    }
}

/// One completed game between two distinct traders. Immutable after
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct Deal {
    first: TraderId,
    second: TraderId,
    kind: DealKind,
}

impl Deal {
    /// Panics if both sides are the same trader; that is a wiring bug, not a
    /// recoverable condition.
    pub fn new(
        first: TraderId,
        first_disposition: Disposition,
        second: TraderId,
        second_disposition: Disposition,
    ) -> Self {
        assert!(first != second, "a trader cannot make deals with itself");
        Self {
            first,
            second,
            kind: DealKind::of(first_disposition, second_disposition),
        }
    }

    /// The given participant's outcome. Panics for a non-participant.
    pub fn result_for(&self, participant: TraderId) -> Outcome {
        let (first, second) = self.kind.dispositions();
        if participant == self.first {
            Outcome::of(first, second)
        } else if participant == self.second {
            Outcome::of(second, first)
        } else {
            panic!("trader {participant:?} is not a participant of this deal");
        }
    }
}
