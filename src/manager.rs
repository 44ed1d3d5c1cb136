// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use num_bigint::BigInt;

use crate::util::big_hex;
use crate::validate::check_descriptor_addresses;
use crate::{AddressSet, IdRange, ParamError, RegionType, Result, TransferSizes};

/// Operations a manager may accept from its clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ManagerOp {
    Acquire,
    Arithmetic,
    Logical,
    Get,
    PutFull,
    PutPartial,
    Hint,
}

impl ManagerOp {
    pub const ALL: [ManagerOp; 7] = [
        ManagerOp::Acquire,
        ManagerOp::Arithmetic,
        ManagerOp::Logical,
        ManagerOp::Get,
        ManagerOp::PutFull,
        ManagerOp::PutPartial,
        ManagerOp::Hint,
    ];
}

impl fmt::Display for ManagerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Everything a manager declares about itself. Fill in what differs from
/// the defaults and validate it with [`ManagerParameters::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagerConfig {
    pub name: String,
    pub address: Vec<AddressSet>,
    pub sink_id: IdRange,
    pub region_type: RegionType,
    pub executable: bool,
    /// Requests to managers sharing a fifo id complete in issue order.
    pub fifo_id: Option<u32>,
    /// Replaces the generated device descriptor text.
    pub custom_dts: Option<String>,
    pub supports_acquire: TransferSizes,
    pub supports_arithmetic: TransferSizes,
    pub supports_logical: TransferSizes,
    pub supports_get: TransferSizes,
    pub supports_put_full: TransferSizes,
    pub supports_put_partial: TransferSizes,
    pub supports_hint: TransferSizes,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            name: "disconnected".to_string(),
            address: Vec::new(),
            sink_id: IdRange::default(),
            region_type: RegionType::GetEffects,
            executable: false,
            fifo_id: None,
            custom_dts: None,
            supports_acquire: TransferSizes::NONE,
            supports_arithmetic: TransferSizes::NONE,
            supports_logical: TransferSizes::NONE,
            supports_get: TransferSizes::NONE,
            supports_put_full: TransferSizes::NONE,
            supports_put_partial: TransferSizes::NONE,
            supports_hint: TransferSizes::NONE,
        }
    }
}

/// A validated manager descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagerParameters {
    config: ManagerConfig,
    max_transfer: u32,
    max_address: BigInt,
    min_alignment: BigInt,
}

impl ManagerConfig {
    fn supports(&self, op: ManagerOp) -> TransferSizes {
        match op {
            ManagerOp::Acquire => self.supports_acquire,
            ManagerOp::Arithmetic => self.supports_arithmetic,
            ManagerOp::Logical => self.supports_logical,
            ManagerOp::Get => self.supports_get,
            ManagerOp::PutFull => self.supports_put_full,
            ManagerOp::PutPartial => self.supports_put_partial,
            ManagerOp::Hint => self.supports_hint,
        }
    }
}

impl ManagerParameters {
    /// Validates `config`:
    /// - at least one address set, all finite and pairwise disjoint
    /// - put-full capability contains put-partial capability
    /// - no set is aligned to less than the largest supported transfer
    pub fn new(config: ManagerConfig) -> Result<ManagerParameters> {
        let name = config.name.as_str();

        if config.address.is_empty() {
            log::warn!("{name}: no address sets");
            return Err(ParamError::EmptyAddress {
                name: name.to_string(),
            });
        }
        if let Some(set) = config.address.iter().find(|set| !set.finite()) {
            log::warn!("{name}: {set} is not finite");
            return Err(ParamError::InfiniteAddress {
                name: name.to_string(),
                set: set.clone(),
            });
        }
        check_descriptor_addresses(name, &config.address)?;

        if !config
            .supports_put_full
            .contains_sizes(&config.supports_put_partial)
        {
            log::warn!("{name}: put-partial exceeds put-full");
            return Err(ParamError::CapabilitySubset {
                name: name.to_string(),
                what: "put-partial",
                outer: config.supports_put_full,
                inner: config.supports_put_partial,
            });
        }

        let max_transfer = ManagerOp::ALL
            .iter()
            .map(|&op| config.supports(op).max())
            .max()
            .unwrap_or(0);
        let max_address = config
            .address
            .iter()
            .filter_map(AddressSet::max_address)
            .max()
            .unwrap_or_default();
        let min_alignment = config
            .address
            .iter()
            .map(AddressSet::alignment)
            .min()
            .unwrap_or_default();

        // a device cannot serve a transfer wider than its own alignment
        if min_alignment < BigInt::from(max_transfer) {
            log::warn!("{name}: alignment {min_alignment:#x} < max transfer {max_transfer}");
            return Err(ParamError::AlignmentViolation {
                name: name.to_string(),
                alignment: min_alignment,
                max_transfer,
            });
        }

        log::debug!(
            "manager {name}: {} address sets up to {max_address:#x}, sinks {}, max transfer {max_transfer}",
            config.address.len(),
            config.sink_id
        );

        Ok(ManagerParameters {
            config,
            max_transfer,
            max_address,
            min_alignment,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn address(&self) -> &[AddressSet] {
        &self.config.address
    }

    pub fn sink_id(&self) -> IdRange {
        self.config.sink_id
    }

    pub fn region_type(&self) -> RegionType {
        self.config.region_type
    }

    pub fn executable(&self) -> bool {
        self.config.executable
    }

    pub fn fifo_id(&self) -> Option<u32> {
        self.config.fifo_id
    }

    pub fn supports(&self, op: ManagerOp) -> TransferSizes {
        self.config.supports(op)
    }

    /// Largest transfer size across all operations.
    pub fn max_transfer(&self) -> u32 {
        self.max_transfer
    }

    pub fn max_address(&self) -> &BigInt {
        &self.max_address
    }

    pub fn min_alignment(&self) -> &BigInt {
        &self.min_alignment
    }

    /// True iff any of this manager's sets contains `address`.
    pub fn contains(&self, address: &BigInt) -> bool {
        self.config.address.iter().any(|set| set.contains(address))
    }

    /// Device descriptor text: one `reg` entry per address set, which
    /// therefore must all be contiguous.
    pub fn dts(&self) -> Result<String> {
        if let Some(custom) = &self.config.custom_dts {
            return Ok(custom.clone());
        }
        let first = &self.config.address[0];
        let mut text = format!("{}@{:x} {{\n", self.config.name, first.base());
        for set in &self.config.address {
            if !set.contiguous() {
                return Err(ParamError::NonContiguous {
                    name: self.config.name.clone(),
                    set: set.clone(),
                });
            }
            let size = set.mask() + 1u32;
            text.push_str(&format!(
                "  reg = <{} {}>;\n",
                big_hex(set.base()),
                big_hex(&size)
            ));
        }
        text.push_str("};\n");
        Ok(text)
    }
}
