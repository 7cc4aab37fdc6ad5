//! The two dimensions of a grid.

use serde::{Deserialize, Serialize};

/// Either the row dimension or the column dimension of a grid.
///
/// A search runs along one axis: each vector on that axis is a candidate,
/// and selector fields are resolved against the keys of the [`opposite`]
/// axis.
///
/// [`opposite`]: Axis::opposite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Returns the other axis.
    pub const fn opposite(self) -> Axis {
        match self {
            Axis::Row => Axis::Column,
            Axis::Column => Axis::Row,
        }
    }

    /// Returns the display name of this axis.
    pub const fn as_str(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
