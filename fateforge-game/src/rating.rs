//! Outcome rating: a letter grade tallied from the decisions of a
//! finished run.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decisions::DecisionId;

/// The five "shield" decisions spread across mutually exclusive branches.
/// No single path can reach more than three of them, which is what the
/// grade thresholds below are tuned around. Keep both lists literal.
pub const FAVORABLE_DECISIONS: [DecisionId; 5] = [4, 6, 10, 13, 15];

/// Letter grade for a completed run, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(()),
        }
    }
}

/// Tally the favorable decisions in `taken` and map the count to a grade.
/// Pure and order-independent: only multiset membership matters.
#[must_use]
pub fn compute_rating(taken: &[DecisionId]) -> Grade {
    let favorable = taken
        .iter()
        .filter(|id| FAVORABLE_DECISIONS.contains(id))
        .count();
    match favorable {
        3 => Grade::A,
        2 => Grade::B,
        1 => Grade::C,
        _ => Grade::D,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries_follow_the_tally() {
        assert_eq!(compute_rating(&[1, 4, 10, 12, 13]), Grade::A);
        assert_eq!(compute_rating(&[1, 4, 10, 12, 14]), Grade::B);
        assert_eq!(compute_rating(&[3, 9, 10, 12, 17]), Grade::C);
        assert_eq!(compute_rating(&[3, 9, 11, 12, 18]), Grade::D);
        assert_eq!(compute_rating(&[]), Grade::D);
    }

    #[test]
    fn rating_is_order_independent() {
        let run = [1, 4, 10, 12, 13];
        let reversed: Vec<_> = run.iter().rev().copied().collect();
        let shuffled = [10, 1, 13, 12, 4];
        assert_eq!(compute_rating(&run), compute_rating(&reversed));
        assert_eq!(compute_rating(&run), compute_rating(&shuffled));
    }

    #[test]
    fn unfavorable_decisions_never_score() {
        assert_eq!(compute_rating(&[5, 7, 9, 11, 14, 16, 17, 18]), Grade::D);
    }

    #[test]
    fn grade_parses_back_from_display() {
        for grade in [Grade::A, Grade::B, Grade::C, Grade::D] {
            assert_eq!(grade.to_string().parse(), Ok(grade));
        }
        assert_eq!("F".parse::<Grade>(), Err(()));
    }
}
