//! Placement order of in-context examples.
//!
//! Selected examples arrive ranked best-first. The policy decides whether
//! the best example sits at the top of the prompt (`descending`), right
//! before the query (`ascending`), or anywhere (`random`).

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unknown order policy name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid order policy: {0} (expected descending, ascending or random)")]
pub struct InvalidOrder(pub String);

/// Ordering applied to each example group before prompt assembly
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OrderPolicy {
    /// Most relevant first (input order)
    #[default]
    Descending,
    /// Least relevant first, most relevant adjacent to the query
    Ascending,
    /// Uniformly random permutation
    Random,
}

impl OrderPolicy {
    /// Name used in configuration and output file names
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Descending => "descending",
            Self::Ascending => "ascending",
            Self::Random => "random",
        }
    }

    /// Reorder `examples`, returning the same elements in policy order
    pub fn apply<T, R: Rng + ?Sized>(self, mut examples: Vec<T>, rng: &mut R) -> Vec<T> {
        match self {
            Self::Descending => {}
            Self::Ascending => examples.reverse(),
            Self::Random => examples.shuffle(rng),
        }
        examples
    }
}

impl fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderPolicy {
    type Err = InvalidOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "descending" => Ok(Self::Descending),
            "ascending" => Ok(Self::Ascending),
            "random" => Ok(Self::Random),
            _ => Err(InvalidOrder(s.to_string())),
        }
    }
}

impl TryFrom<String> for OrderPolicy {
    type Error = InvalidOrder;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
