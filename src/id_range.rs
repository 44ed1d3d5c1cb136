// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use crate::util::log2_floor;
use crate::{ParamError, Result};

/// A non-empty, half-open range of transaction ids `[start, end)`.
///
/// Id ranges are ordered only when they are disjoint: `a < b` iff `a` ends
/// at or before the start of `b`. Overlapping ranges are incomparable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdRange {
    start: u64,
    end: u64,
}

impl IdRange {
    pub fn new(start: i64, end: i64) -> Result<IdRange> {
        if start < 0 || start >= end {
            return Err(ParamError::InvalidRange { start, end });
        }
        Ok(IdRange {
            start: start as u64,
            end: end as u64,
        })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }

    pub fn overlaps(&self, other: &IdRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, id: u64) -> bool {
        self.start <= id && id < self.end
    }

    pub fn contains_range(&self, other: &IdRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Bitwise evaluation of [`IdRange::contains`], in the shape a decoder
    /// would synthesize it.
    ///
    /// The bits above the highest bit where `start` and `end - 1` differ
    /// form a prefix that must match exactly; the remaining low bits are
    /// compared against the low bits of both bounds. When the range is a
    /// power of two in size and aligned to that size, the low bits span the
    /// whole block and only the prefix compare is left.
    pub fn contains_masked(&self, id: u64) -> bool {
        let last = self.end - 1;
        if self.start == last {
            return id == self.start;
        }
        let largest_delta_bit = log2_floor(self.start ^ last);
        let smallest_common_bit = largest_delta_bit + 1;
        let uncommon_mask = if smallest_common_bit >= 64 {
            u64::MAX
        } else {
            (1u64 << smallest_common_bit) - 1
        };
        let prefix_matches = (id & !uncommon_mask) == (self.start & !uncommon_mask);
        if self.is_aligned_pow2() {
            return prefix_matches;
        }
        let uncommon_bits = id & uncommon_mask;
        prefix_matches
            && (self.start & uncommon_mask) <= uncommon_bits
            && uncommon_bits <= (last & uncommon_mask)
    }

    fn is_aligned_pow2(&self) -> bool {
        let size = self.size();
        size.is_power_of_two() && (self.start & (size - 1)) == 0
    }

    /// Moves the range by `offset`, which may be negative as long as the
    /// result still starts at or above zero and ends within `i64`.
    pub fn shift(&self, offset: i64) -> Result<IdRange> {
        let start = self.start as i64;
        let end = self.end as i64;
        match (start.checked_add(offset), end.checked_add(offset)) {
            (Some(start), Some(end)) => IdRange::new(start, end),
            _ => Err(ParamError::InvalidRange {
                start: start.saturating_add(offset),
                end: end.saturating_add(offset),
            }),
        }
    }
}

/// The single id 0.
impl Default for IdRange {
    fn default() -> Self {
        IdRange { start: 0, end: 1 }
    }
}

impl PartialOrd for IdRange {
    fn partial_cmp(&self, other: &IdRange) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.end <= other.start {
            Some(Ordering::Less)
        } else if other.end <= self.start {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
