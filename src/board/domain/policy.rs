//! Directional rules for task relocation.

use super::{BoardDomainError, Column};
use serde::{Deserialize, Serialize};

/// Which destinations a relocation may target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePolicy {
    /// Any existing column, any slot.
    #[default]
    Unrestricted,
    /// The task's own column, or the column immediately to its right.
    AdjacentForward,
}

impl MovePolicy {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unrestricted => "unrestricted",
            Self::AdjacentForward => "adjacent_forward",
        }
    }

    /// Returns whether a task in `source` may be relocated to `destination`.
    ///
    /// `next_after_source` is the column positioned immediately right of
    /// the source, if any.
    #[must_use]
    pub fn permits(
        self,
        source: &Column,
        destination: &Column,
        next_after_source: Option<&Column>,
    ) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::AdjacentForward => {
                destination.id() == source.id()
                    || next_after_source.is_some_and(|next| next.id() == destination.id())
            }
        }
    }
}

impl TryFrom<&str> for MovePolicy {
    type Error = BoardDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "unrestricted" => Ok(Self::Unrestricted),
            "adjacent_forward" => Ok(Self::AdjacentForward),
            _ => Err(BoardDomainError::UnknownMovePolicy(value.to_owned())),
        }
    }
}
