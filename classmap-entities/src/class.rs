use std::{fmt, num::ParseIntError, str::FromStr};

use crate::geo::MapPoint;

/// Numeric identifier of a class as assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(i64);

impl ClassId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn to_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for ClassId {
    fn from(from: i64) -> Self {
        Self(from)
    }
}

impl From<ClassId> for i64 {
    fn from(from: ClassId) -> Self {
        from.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClassId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A class that should appear on the map, located by a free-text address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMarkerEntry {
    pub class_id: ClassId,
    pub address: String,
}

impl ClassMarkerEntry {
    pub fn new(class_id: impl Into<ClassId>, address: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            address: address.into(),
        }
    }
}

/// Short description shown in the overlay of a class marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    pub name: String,
    pub description: String,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyClass {
    pub id          : ClassId,
    pub name        : String,
    pub description : String,
    pub location    : String,
    /// `None` means "price on request".
    pub cost        : Option<u32>,
    pub pos         : Option<MapPoint>,
}
