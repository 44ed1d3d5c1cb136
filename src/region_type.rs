// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Caching and side-effect guarantees of a memory region.
///
/// Variants are declared weakest first, so the derived order ranks each
/// type below the ones offering stronger guarantees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RegionType {
    /// Gets may have side effects.
    #[default]
    GetEffects,
    /// Puts may have side effects; gets are idempotent.
    PutEffects,
    /// Not cached anywhere, but accesses are effect-free.
    Uncached,
    /// Cached by a client that the manager tracks.
    Tracked,
    /// The manager itself holds cached copies.
    Cached,
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RegionType::GetEffects => "GET_EFFECTS",
            RegionType::PutEffects => "PUT_EFFECTS",
            RegionType::Uncached => "UNCACHED",
            RegionType::Tracked => "TRACKED",
            RegionType::Cached => "CACHED",
        };
        write!(f, "{s}")
    }
}
