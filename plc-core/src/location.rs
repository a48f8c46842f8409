use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::Serialize;

/// 1-based source line a node or diagnostic refers to.
///
/// Line `0` is reserved for facts that are not anchored to any source line,
/// such as a diagnostic about the program as a whole.
#[derive(Debug, Default, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line(pub u32);

impl Line {
    pub const UNKNOWN: Line = Line(0);

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_known(self) -> bool {
        self.0 > 0
    }
}

impl FromStr for Line {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Line)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
