// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigInt;

use crate::util::{big_log2_ceil, is_pow2, log2_ceil, log2_up};
use crate::{ClientPortParameters, ManagerPortParameters, ParamError, Result};

/// Field widths of the wires shared by one link.
///
/// `address_bits` counts only the address bits above the byte lanes of one
/// beat; the lane bits are implied by the data width and carried by the
/// byte mask instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BundleParameters {
    address_bits: u32,
    data_bits: u32,
    source_bits: u32,
    sink_bits: u32,
    size_bits: u32,
}

impl BundleParameters {
    /// The narrowest legal bundle; the identity of [`union`](Self::union).
    pub const EMPTY: BundleParameters = BundleParameters {
        address_bits: 1,
        data_bits: 8,
        source_bits: 1,
        sink_bits: 1,
        size_bits: 1,
    };

    /// Every field needs at least one bit, and the data path is a power of
    /// two of at least one byte.
    pub fn new(
        address_bits: u32,
        data_bits: u32,
        source_bits: u32,
        sink_bits: u32,
        size_bits: u32,
    ) -> Result<BundleParameters> {
        let fields = [
            ("address_bits", address_bits, 1),
            ("data_bits", data_bits, 8),
            ("source_bits", source_bits, 1),
            ("sink_bits", sink_bits, 1),
            ("size_bits", size_bits, 1),
        ];
        if let Some((field, value, _)) = fields.iter().find(|(_, value, min)| value < min) {
            return Err(ParamError::InvalidBundle {
                field: *field,
                value: *value,
            });
        }
        if !is_pow2(data_bits as u64) {
            return Err(ParamError::InvalidBundle {
                field: "data_bits",
                value: data_bits,
            });
        }
        Ok(BundleParameters {
            address_bits,
            data_bits,
            source_bits,
            sink_bits,
            size_bits,
        })
    }

    /// Widths needed to carry every address, id and size either side of
    /// the link can produce.
    pub fn from_ports(
        client: &ClientPortParameters,
        manager: &ManagerPortParameters,
    ) -> Result<BundleParameters> {
        let max_transfer = client.max_transfer().max(manager.max_transfer());
        let Some(data_bits) = manager.beat_bytes().checked_mul(8) else {
            log::warn!("beat bytes {} do not fit a data width", manager.beat_bytes());
            return Err(ParamError::InvalidBundle {
                field: "data_bits",
                value: manager.beat_bytes(),
            });
        };
        let full_address_bits = big_log2_ceil(&(manager.max_address() + BigInt::from(1u32)));
        let lane_bits = log2_ceil(manager.beat_bytes() as u64) as u64;
        BundleParameters::new(
            full_address_bits.saturating_sub(lane_bits).max(1) as u32,
            data_bits,
            log2_up(client.end_source_id()),
            log2_up(manager.end_sink_id()),
            log2_up(log2_ceil(max_transfer as u64) as u64 + 1),
        )
    }

    pub fn address_bits(&self) -> u32 {
        self.address_bits
    }

    pub fn data_bits(&self) -> u32 {
        self.data_bits
    }

    pub fn source_bits(&self) -> u32 {
        self.source_bits
    }

    pub fn sink_bits(&self) -> u32 {
        self.sink_bits
    }

    pub fn size_bits(&self) -> u32 {
        self.size_bits
    }

    /// Address bits below the beat width, which select a byte lane.
    pub fn addr_lo_bits(&self) -> u32 {
        log2_ceil(self.data_bits as u64 / 8)
    }

    /// Width of a full byte address: the high bits plus the lane bits.
    pub fn full_address_bits(&self) -> u32 {
        self.address_bits + self.addr_lo_bits()
    }

    /// Pointwise maximum.
    pub fn union(&self, other: &BundleParameters) -> BundleParameters {
        BundleParameters {
            address_bits: self.address_bits.max(other.address_bits),
            data_bits: self.data_bits.max(other.data_bits),
            source_bits: self.source_bits.max(other.source_bits),
            sink_bits: self.sink_bits.max(other.sink_bits),
            size_bits: self.size_bits.max(other.size_bits),
        }
    }

    pub fn union_all<'a>(bundles: impl IntoIterator<Item = &'a BundleParameters>) -> BundleParameters {
        bundles
            .into_iter()
            .fold(BundleParameters::EMPTY, |acc, b| acc.union(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(BundleParameters::new(32, 64, 4, 1, 3).is_ok());
        assert_eq!(
            BundleParameters::new(32, 48, 4, 1, 3),
            Err(ParamError::InvalidBundle {
                field: "data_bits",
                value: 48
            })
        );
        assert_eq!(
            BundleParameters::new(32, 64, 0, 1, 3),
            Err(ParamError::InvalidBundle {
                field: "source_bits",
                value: 0
            })
        );
        assert!(BundleParameters::new(32, 4, 1, 1, 1).is_err());
    }

    #[test]
    fn test_union() {
        let a = BundleParameters::new(32, 64, 4, 1, 3).unwrap();
        let b = BundleParameters::new(12, 128, 2, 3, 2).unwrap();
        let u = a.union(&b);
        assert_eq!(u, BundleParameters::new(32, 128, 4, 3, 3).unwrap());
        assert_eq!(BundleParameters::union_all([&a, &b]), u);
        assert_eq!(BundleParameters::union_all([]), BundleParameters::EMPTY);
    }

    #[test]
    fn test_addr_lo_bits() {
        assert_eq!(BundleParameters::EMPTY.addr_lo_bits(), 0);
        let bundle = BundleParameters::new(29, 64, 1, 1, 1).unwrap();
        assert_eq!(bundle.addr_lo_bits(), 3);
        assert_eq!(bundle.full_address_bits(), 32);
    }
}
