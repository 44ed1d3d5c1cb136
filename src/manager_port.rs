// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use num_bigint::BigInt;

use crate::address_decoder;
use crate::util::is_pow2;
use crate::validate::{check_ids, check_port_addresses, check_unique_names};
use crate::{AddressSet, ManagerOp, ManagerParameters, ParamError, Result, TransferSizes};

mod lookup;
mod supports;

const PORT: &str = "manager port";

/// The managers reachable through one port, with the port's beat width.
///
/// Managers are kept in the order they were given; that order defines the
/// bit positions of the vectors returned by `find_safe` and `find_fast`.
#[derive(Clone, Debug)]
pub struct ManagerPortParameters {
    managers: IndexMap<String, ManagerParameters>,
    beat_bytes: u32,
    min_latency: u32,
    routing_mask: BigInt,
    /// Each manager's address sets widened by `!routing_mask`, deduplicated.
    fast_address: Vec<Vec<AddressSet>>,
}

impl ManagerPortParameters {
    /// Validates that the port is non-empty, that `beat_bytes` is a power of
    /// two, and that no two managers share a sink id or an address. The
    /// routing mask is derived with [`address_decoder::routing_mask`].
    pub fn new(
        managers: Vec<ManagerParameters>,
        beat_bytes: u32,
        min_latency: u32,
    ) -> Result<ManagerPortParameters> {
        if managers.is_empty() {
            log::warn!("{PORT} has no managers");
            return Err(ParamError::EmptyPort { kind: "manager" });
        }
        if !is_pow2(beat_bytes as u64) {
            log::warn!("{PORT}: beat bytes {beat_bytes} is not a power of two");
            return Err(ParamError::InvalidBeatBytes { beat_bytes });
        }
        check_unique_names(PORT, managers.iter().map(ManagerParameters::name))?;

        let sink_ids = managers
            .iter()
            .map(|m| (m.name(), m.sink_id()))
            .collect::<Vec<_>>();
        check_ids(PORT, &sink_ids)?;

        let addresses = managers
            .iter()
            .map(|m| (m.name(), m.address()))
            .collect::<Vec<_>>();
        check_port_addresses(PORT, &addresses)?;

        let address_lists = managers
            .iter()
            .map(|m| m.address().to_vec())
            .collect::<Vec<_>>();
        let routing_mask = address_decoder::routing_mask(&address_lists, &BigInt::from(0u32))?;

        let managers = managers
            .into_iter()
            .map(|m| (m.name().to_string(), m))
            .collect::<IndexMap<_, _>>();

        log::debug!(
            "{PORT}: {} managers, beat bytes {beat_bytes}, routing mask {routing_mask:#x}",
            managers.len()
        );

        Ok(ManagerPortParameters {
            fast_address: widen_all(&managers, &routing_mask),
            managers,
            beat_bytes,
            min_latency,
            routing_mask,
        })
    }

    /// Replaces the derived routing mask with one computed elsewhere.
    ///
    /// The mask is not checked. It must distinguish every pair of managers,
    /// otherwise `find_fast` and everything built on it return meaningless
    /// results for the addresses it fails to tell apart.
    pub fn with_routing_mask(mut self, routing_mask: BigInt) -> ManagerPortParameters {
        self.fast_address = widen_all(&self.managers, &routing_mask);
        self.routing_mask = routing_mask;
        self
    }

    pub fn managers(&self) -> impl Iterator<Item = &ManagerParameters> {
        self.managers.values()
    }

    pub fn get(&self, name: &str) -> Option<&ManagerParameters> {
        self.managers.get(name)
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    pub fn beat_bytes(&self) -> u32 {
        self.beat_bytes
    }

    pub fn min_latency(&self) -> u32 {
        self.min_latency
    }

    /// Address bits that suffice to tell the managers apart.
    pub fn routing_mask(&self) -> &BigInt {
        &self.routing_mask
    }

    /// One past the largest sink id.
    pub fn end_sink_id(&self) -> u64 {
        self.managers().map(|m| m.sink_id().end()).max().unwrap_or(0)
    }

    pub fn max_address(&self) -> BigInt {
        self.managers()
            .map(|m| m.max_address().clone())
            .max()
            .unwrap_or_default()
    }

    pub fn max_transfer(&self) -> u32 {
        self.managers().map(ManagerParameters::max_transfer).max().unwrap_or(0)
    }

    /// Sizes of `op` every manager supports; safe to issue without knowing
    /// which manager the address selects.
    pub fn all_support(&self, op: ManagerOp) -> TransferSizes {
        self.managers()
            .map(|m| m.supports(op))
            .reduce(|acc, sizes| acc.intersect(&sizes))
            .unwrap_or(TransferSizes::NONE)
    }

    /// True iff at least one manager supports `op` at all.
    pub fn any_support(&self, op: ManagerOp) -> bool {
        self.managers().any(|m| m.supports(op).is_some())
    }
}

fn widen_all(
    managers: &IndexMap<String, ManagerParameters>,
    routing_mask: &BigInt,
) -> Vec<Vec<AddressSet>> {
    let ignore = !routing_mask;
    managers
        .values()
        .map(|m| {
            let mut widened = m
                .address()
                .iter()
                .map(|set| set.widen(&ignore))
                .collect::<Vec<_>>();
            widened.sort();
            widened.dedup();
            widened
        })
        .collect()
}
