//! Count tables keyed by coded enumerations and departments.

use crate::directory::DepartmentId;
use crate::normalization::CodedEnum;
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;
use std::fmt;

/// Counts per variant of a coded enumeration.
///
/// Every variant is present, including those with a zero count. Serializes
/// as a map from canonical label to count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown<T: CodedEnum> {
    counts: Vec<(T, usize)>,
}

impl<T: CodedEnum> Default for Breakdown<T> {
    fn default() -> Self {
        Self {
            counts: T::ALL.iter().map(|&variant| (variant, 0)).collect(),
        }
    }
}

impl<T: CodedEnum> Breakdown<T> {
    pub(super) fn record(&mut self, value: T) {
        if let Some((_, count)) = self.counts.iter_mut().find(|(variant, _)| *variant == value) {
            *count += 1;
        }
    }

    /// Returns the count for `value`.
    #[must_use]
    pub fn get(&self, value: T) -> usize {
        self.counts
            .iter()
            .find(|(variant, _)| *variant == value)
            .map_or(0, |&(_, count)| count)
    }

    /// Iterates variants in code order with their counts.
    pub fn counts(&self) -> impl Iterator<Item = (T, usize)> + '_ {
        self.counts.iter().copied()
    }
}

impl<T: CodedEnum> Serialize for Breakdown<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (variant, count) in &self.counts {
            map.serialize_entry(variant.label(), count)?;
        }
        map.end()
    }
}

/// Department grouping key; tasks without an owner land in `Unassigned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DepartmentBucket {
    /// Owned by this department.
    Department(DepartmentId),
    /// No owning department recorded.
    Unassigned,
}

impl From<Option<DepartmentId>> for DepartmentBucket {
    fn from(department: Option<DepartmentId>) -> Self {
        department.map_or(Self::Unassigned, Self::Department)
    }
}

impl fmt::Display for DepartmentBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Department(id) => write!(f, "{id}"),
            Self::Unassigned => f.write_str("unassigned"),
        }
    }
}

impl Serialize for DepartmentBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Counts per department.
pub type DepartmentBreakdown = BTreeMap<DepartmentBucket, usize>;
