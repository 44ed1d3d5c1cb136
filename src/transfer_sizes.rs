// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::util::{is_pow2, log2_ceil};
use crate::{ParamError, Result};

/// The set of power-of-two transfer sizes `s` with `min <= s <= max`.
///
/// `(0, 0)` is the only empty representation, exposed as
/// [`TransferSizes::NONE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TransferSizes {
    min: u32,
    max: u32,
}

impl TransferSizes {
    pub const NONE: TransferSizes = TransferSizes { min: 0, max: 0 };

    pub fn new(min: u32, max: u32) -> Result<TransferSizes> {
        let valid = min <= max
            && (min == 0 || is_pow2(min as u64))
            && (max == 0 || is_pow2(max as u64))
            && ((min == 0) == (max == 0));
        if !valid {
            return Err(ParamError::InvalidTransferSize { min, max });
        }
        Ok(TransferSizes { min, max })
    }

    /// Supports exactly one transfer size.
    pub fn exact(size: u32) -> Result<TransferSizes> {
        TransferSizes::new(size, size)
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn none(&self) -> bool {
        self.min == 0
    }

    pub fn is_some(&self) -> bool {
        !self.none()
    }

    pub fn contains(&self, size: u32) -> bool {
        is_pow2(size as u64) && self.min <= size && size <= self.max
    }

    /// Tests membership of `1 << lg_size`.
    pub fn contains_lg(&self, lg_size: u32) -> bool {
        if self.none() {
            return false;
        }
        log2_ceil(self.min as u64) <= lg_size && lg_size <= log2_ceil(self.max as u64)
    }

    /// Subset test. The empty set is contained by everything.
    pub fn contains_sizes(&self, other: &TransferSizes) -> bool {
        other.none() || (self.min <= other.min && other.max <= self.max)
    }

    /// The sizes both sides support.
    pub fn intersect(&self, other: &TransferSizes) -> TransferSizes {
        if self.none() || other.none() || other.max < self.min || self.max < other.min {
            TransferSizes::NONE
        } else {
            TransferSizes {
                min: self.min.max(other.min),
                max: self.max.min(other.max),
            }
        }
    }

    /// The smallest range covering both sides.
    pub fn mincover(&self, other: &TransferSizes) -> TransferSizes {
        if self.none() {
            *other
        } else if other.none() {
            *self
        } else {
            TransferSizes {
                min: self.min.min(other.min),
                max: self.max.max(other.max),
            }
        }
    }
}

impl fmt::Display for TransferSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransferSizes[{}, {}]", self.min, self.max)
    }
}
