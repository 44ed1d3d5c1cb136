// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use itertools::Itertools;
use num_bigint::BigInt;
use regex::Regex;

use crate::util::{big_hex, big_is_negative, big_is_zero, big_lowest_bit};
use crate::{ParamError, Result};

/// A set of addresses described by a `base` and a `mask`.
///
/// An address `x` is a member iff `(x ^ base) & !mask == 0`: bits that are
/// clear in `mask` must equal the corresponding bit of `base`, and bits set
/// in `mask` are free. Free bits need not be contiguous, so a single set can
/// describe a striped region (mask `0xf0f` matches two separate bands). A
/// negative mask is sign-extended and leaves every higher bit free, which
/// makes the set infinite.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AddressSet {
    base: BigInt,
    mask: BigInt,
}

impl AddressSet {
    pub fn new(base: impl Into<BigInt>, mask: impl Into<BigInt>) -> Result<AddressSet> {
        let base = base.into();
        let mask = mask.into();
        if big_is_negative(&base) {
            return Err(ParamError::InvalidAddressSet {
                base: big_hex(&base),
                mask: big_hex(&mask),
                reason: "negative base is ambiguous",
            });
        }
        if !big_is_zero(&(&base & &mask)) {
            return Err(ParamError::InvalidAddressSet {
                base: big_hex(&base),
                mask: big_hex(&mask),
                reason: "base has bits set inside the mask",
            });
        }
        Ok(AddressSet { base, mask })
    }

    /// Every address.
    pub fn everything() -> AddressSet {
        AddressSet {
            base: BigInt::from(0u32),
            mask: BigInt::from(-1),
        }
    }

    /// All addresses whose `bit` equals `value`.
    pub(crate) fn bit_half(bit: &BigInt, value: bool) -> AddressSet {
        AddressSet {
            base: if value { bit.clone() } else { BigInt::from(0u32) },
            mask: !bit,
        }
    }

    pub fn base(&self) -> &BigInt {
        &self.base
    }

    pub fn mask(&self) -> &BigInt {
        &self.mask
    }

    pub fn contains(&self, address: &BigInt) -> bool {
        big_is_zero(&((address ^ &self.base) & !&self.mask))
    }

    /// Maps any address into this set by forcing the fixed bits.
    pub fn legalize(&self, address: &BigInt) -> BigInt {
        &self.base | (&self.mask & address)
    }

    /// True iff some address is a member of both sets. Where both masks are
    /// clear the bases must agree.
    pub fn overlaps(&self, other: &AddressSet) -> bool {
        big_is_zero(&(!(&self.mask | &other.mask) & (&self.base ^ &other.base)))
    }

    /// Subset test: every free bit of `other` is free here, and the fixed
    /// bits of `other.base` match.
    pub fn contains_set(&self, other: &AddressSet) -> bool {
        big_is_zero(&((&other.mask | (&self.base ^ &other.base)) & !&self.mask))
    }

    /// The largest power of two the set is guaranteed aligned to: the lowest
    /// clear bit of the mask. Zero for an infinite set of all ones.
    pub fn alignment(&self) -> BigInt {
        (&self.mask + 1u32) & !&self.mask
    }

    /// True iff the set has no holes, i.e. `mask + 1` is a power of two.
    pub fn contiguous(&self) -> bool {
        self.alignment() == &self.mask + 1u32
    }

    pub fn finite(&self) -> bool {
        !big_is_negative(&self.mask)
    }

    /// The highest member address, if the set is finite.
    pub fn max_address(&self) -> Option<BigInt> {
        self.finite().then(|| &self.base | &self.mask)
    }

    /// Frees every bit in `ignore`, widening the match.
    pub fn widen(&self, ignore: &BigInt) -> AddressSet {
        AddressSet {
            base: &self.base & !ignore,
            mask: &self.mask | ignore,
        }
    }

    /// The addresses both sets contain, if any.
    pub fn intersect(&self, other: &AddressSet) -> Option<AddressSet> {
        self.overlaps(other).then(|| AddressSet {
            base: &self.base | &other.base,
            mask: &self.mask & &other.mask,
        })
    }

    /// Splits a finite set into contiguous `(base, size)` fragments, lowest
    /// address first. `None` for infinite sets and for masks with 64 or more
    /// holes, whose fragment count does not fit a `u64`.
    pub fn to_ranges(&self) -> Option<Vec<(BigInt, BigInt)>> {
        if !self.finite() {
            return None;
        }
        let size = self.alignment();
        let fragments = &self.mask & !(&size - 1u32);
        let bits = AddressSet::enumerate_bits(&fragments);
        if bits.len() >= 64 {
            return None;
        }
        let ranges = (0u64..(1u64 << bits.len()))
            .map(|i| {
                let offset = bits
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| (i >> j) & 1 == 1)
                    .fold(self.base.clone(), |acc, (_, bit)| acc | bit);
                (offset, size.clone())
            })
            .collect();
        Some(ranges)
    }

    /// The individual set bits of a non-negative `mask`, lowest first.
    pub fn enumerate_bits(mask: &BigInt) -> Vec<BigInt> {
        let mut remaining = mask.clone();
        let mut bits = Vec::new();
        while !big_is_zero(&remaining) && !big_is_negative(&remaining) {
            let bit = big_lowest_bit(&remaining);
            remaining &= !&bit;
            bits.push(bit);
        }
        bits
    }

    /// Decomposes the byte range `[base, base + size)` into the fewest
    /// aligned power-of-two sets, in ascending order.
    ///
    /// Chunks are peeled from both fringes: the low cursor gives up the
    /// block its own alignment allows, the high cursor likewise, until both
    /// cursors sit on the boundaries of the single largest interior block.
    /// An empty range decomposes into nothing.
    pub fn misaligned(base: impl Into<BigInt>, size: impl Into<BigInt>) -> Result<Vec<AddressSet>> {
        let mut lo = base.into();
        let size = size.into();
        if big_is_negative(&lo) || big_is_negative(&size) {
            return Err(ParamError::InvalidAddressSet {
                base: big_hex(&lo),
                mask: big_hex(&size),
                reason: "misaligned range must have non-negative base and size",
            });
        }
        let mut hi = &lo + &size;
        let mut head = Vec::new();
        let mut tail = Vec::new();

        while lo < hi {
            let span = &hi - &lo;
            let fit = BigInt::from(1u32) << (span.bits() - 1);
            // zero is aligned to everything
            let lo_align = big_lowest_bit(&lo);
            let hi_align = big_lowest_bit(&hi);
            if !big_is_zero(&lo_align) && lo_align < fit {
                head.push(AddressSet {
                    base: lo.clone(),
                    mask: &lo_align - 1u32,
                });
                lo += lo_align;
            } else if hi_align < fit {
                hi -= &hi_align;
                tail.push(AddressSet {
                    base: hi.clone(),
                    mask: hi_align - 1u32,
                });
            } else {
                head.push(AddressSet {
                    base: lo.clone(),
                    mask: &fit - 1u32,
                });
                lo += fit;
            }
        }

        head.extend(tail.into_iter().rev());
        Ok(head)
    }

    /// Merges pairs of sets that differ only in `bit` of their base.
    fn unify_bit(sets: Vec<AddressSet>, bit: &BigInt) -> Vec<AddressSet> {
        let mut groups: IndexMap<AddressSet, Vec<AddressSet>> = IndexMap::new();
        for set in sets.into_iter().unique() {
            let key = AddressSet {
                base: &set.base & !bit,
                mask: set.mask.clone(),
            };
            groups.entry(key).or_default().push(set);
        }
        groups
            .into_iter()
            .map(|(key, mut members)| {
                if members.len() == 1 {
                    members.remove(0)
                } else {
                    AddressSet {
                        mask: &key.mask | bit,
                        base: key.base,
                    }
                }
            })
            .collect()
    }

    /// Folds sets that together describe a wider set into that set, one base
    /// bit at a time, and returns the result in canonical order.
    ///
    /// A merge at one bit can enable a merge at a bit already visited, so the
    /// passes repeat until nothing changes.
    pub fn unify(sets: &[AddressSet]) -> Vec<AddressSet> {
        let bits = sets
            .iter()
            .fold(BigInt::from(0u32), |acc, set| acc | &set.base);
        let bits = AddressSet::enumerate_bits(&bits);
        let mut current = sets.iter().cloned().sorted().dedup().collect::<Vec<_>>();
        loop {
            let next = bits
                .iter()
                .fold(current.clone(), |acc, bit| AddressSet::unify_bit(acc, bit))
                .into_iter()
                .sorted()
                .collect::<Vec<_>>();
            if next == current {
                return next;
            }
            current = next;
        }
    }
}

/// Smallest base first; among equal bases the wider mask first.
impl Ord for AddressSet {
    fn cmp(&self, other: &AddressSet) -> Ordering {
        self.base
            .cmp(&other.base)
            .then_with(|| other.mask.cmp(&self.mask))
    }
}

impl PartialOrd for AddressSet {
    fn partial_cmp(&self, other: &AddressSet) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AddressSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AddressSet({}, {})",
            big_hex(&self.base),
            big_hex(&self.mask)
        )
    }
}

static ADDRESS_SET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:AddressSet\(\s*)?0x([0-9a-fA-F_]+)\s*[,/]\s*(~)?\s*0x([0-9a-fA-F_]+)\s*\)?\s*$",
    )
    .unwrap()
});

fn parse_hex(digits: &str) -> Option<BigInt> {
    let digits = digits.replace('_', "");
    BigInt::parse_bytes(digits.as_bytes(), 16)
}

/// Accepts the `Display` form (`AddressSet(0x1000, 0xfff)`, with `~0x..`
/// for inverted masks) and the short form `0x1000/0xfff`.
impl FromStr for AddressSet {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<AddressSet> {
        let err = || ParamError::ParseAddressSet {
            text: s.to_string(),
        };
        let captures = ADDRESS_SET_RE.captures(s).ok_or_else(err)?;
        let base = parse_hex(&captures[1]).ok_or_else(err)?;
        let mut mask = parse_hex(&captures[3]).ok_or_else(err)?;
        if captures.get(2).is_some() {
            mask = !mask;
        }
        AddressSet::new(base, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(base: i64, mask: i64) -> AddressSet {
        AddressSet::new(base, mask).unwrap()
    }

    #[test]
    fn test_rejects_misaligned_base() {
        assert!(AddressSet::new(0x1001, 0xfff).is_err());
        assert!(AddressSet::new(-0x1000, 0xfff).is_err());
        assert!(AddressSet::new(0x1000, -0x2000).is_ok());
    }

    #[test]
    fn test_derived() {
        let a = set(0x1000, 0xfff);
        assert_eq!(a.alignment(), BigInt::from(0x1000));
        assert!(a.contiguous());
        assert!(a.finite());
        assert_eq!(a.max_address(), Some(BigInt::from(0x1fff)));

        let striped = set(0x1000, 0xf0f);
        assert_eq!(striped.alignment(), BigInt::from(0x10));
        assert!(!striped.contiguous());

        let all = AddressSet::everything();
        assert!(!all.finite());
        assert!(all.contiguous());
        assert_eq!(all.max_address(), None);
        assert!(all.contains(&BigInt::from(u64::MAX)));
    }

    #[test]
    fn test_widen() {
        let a = set(0x1100, 0x0ff);
        let wide = a.widen(&BigInt::from(0xf00));
        assert_eq!(wide, set(0x1000, 0xfff));
        assert!(wide.contains_set(&a));
        assert!(!a.contains_set(&wide));
    }

    #[test]
    fn test_intersect() {
        let a = set(0x0, 0xff);
        let b = set(0x40, 0x30f);
        assert_eq!(a.intersect(&b), Some(set(0x40, 0x0f)));
        assert_eq!(a.intersect(&set(0x100, 0xff)), None);
    }

    #[test]
    fn test_to_ranges() {
        let ranges = set(0x1000, 0xf0f).to_ranges().unwrap();
        assert_eq!(ranges.len(), 16);
        assert_eq!(ranges[0], (BigInt::from(0x1000), BigInt::from(0x10)));
        assert_eq!(ranges[1], (BigInt::from(0x1100), BigInt::from(0x10)));
        assert_eq!(ranges[15], (BigInt::from(0x1f00), BigInt::from(0x10)));
        assert_eq!(AddressSet::everything().to_ranges(), None);
    }

    #[test]
    fn test_unify() {
        let sets = [set(0x0, 0xff), set(0x100, 0xff), set(0x300, 0xff)];
        assert_eq!(
            AddressSet::unify(&sets),
            vec![set(0x0, 0x1ff), set(0x300, 0xff)]
        );
        let quad = [
            set(0x0, 0xf),
            set(0x10, 0xf),
            set(0x20, 0xf),
            set(0x30, 0xf),
        ];
        assert_eq!(AddressSet::unify(&quad), vec![set(0x0, 0x3f)]);
    }

    #[test]
    fn test_unify_repeats_until_stable() {
        // merging at bit 0x20 makes a merge at bit 0x10 possible
        let sets = [set(0x0, 0xf), set(0x20, 0xf), set(0x10, 0x2f)];
        assert_eq!(AddressSet::unify(&sets), vec![set(0x0, 0x3f)]);
    }

    #[test]
    fn test_to_ranges_too_many_fragments() {
        // 64 fragment bits above a one-byte hole
        let mask = (BigInt::from(1u32) << 65u32) - 2u32;
        let wide = AddressSet::new(0u32, mask).unwrap();
        assert_eq!(wide.to_ranges(), None);
        let narrow = AddressSet::new(0u32, BigInt::from(0xfeu32)).unwrap();
        assert_eq!(narrow.to_ranges().unwrap().len(), 128);
    }

    #[test]
    fn test_parse_and_display() {
        let a: AddressSet = "AddressSet(0x1000, 0xfff)".parse().unwrap();
        assert_eq!(a, set(0x1000, 0xfff));
        assert_eq!(a.to_string(), "AddressSet(0x1000, 0xfff)");
        let b: AddressSet = "0x2000/0x1_ff".parse().unwrap();
        assert_eq!(b, set(0x2000, 0x1ff));
        let all: AddressSet = "AddressSet(0x0, ~0x0)".parse().unwrap();
        assert_eq!(all, AddressSet::everything());
        assert_eq!(all.to_string(), "AddressSet(0x0, ~0x0)");
        assert!("AddressSet(0x1001, 0xfff)".parse::<AddressSet>().is_err());
        assert_eq!(
            "nonsense".parse::<AddressSet>(),
            Err(ParamError::ParseAddressSet {
                text: "nonsense".to_string()
            })
        );
    }
}
