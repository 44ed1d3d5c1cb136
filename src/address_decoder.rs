// SPDX-License-Identifier: Apache-2.0

//! Derivation of the routing mask: the smallest set of address bits that
//! still tells every port's address sets apart.
//!
//! The search keeps a list of partitions. A partition is the group of ports
//! an address could still belong to, given the values of the bits selected
//! so far. Each step tries every remaining bit, splits every partition on
//! it, and keeps the bit whose split leaves the smallest partitions. Ports
//! whose sets are free in that bit land on both sides of the split.

use itertools::Itertools;
use num_bigint::BigInt;

use crate::validate::check_port_addresses;
use crate::{AddressSet, Result};

type Port = Vec<AddressSet>;
type Partition = Vec<Port>;

/// Finds a mask such that the sets of each port, widened by `!mask`, still
/// overlap no set of any other port. Bits in `given_bits` are always part of
/// the result.
///
/// Fails with `OverlappingAddress` if the ports overlap to begin with.
pub fn routing_mask(ports: &[Vec<AddressSet>], given_bits: &BigInt) -> Result<BigInt> {
    let non_empty = ports
        .iter()
        .filter(|port| !port.is_empty())
        .map(|port| port.iter().cloned().sorted().collect::<Port>())
        .sorted()
        .collect::<Vec<Port>>();

    if non_empty.len() <= 1 {
        return Ok(given_bits.clone());
    }

    check_port_addresses("address decoder", &labelled(&non_empty))?;

    let max_base = non_empty
        .iter()
        .flatten()
        .map(|set| set.base())
        .max()
        .cloned()
        .unwrap_or_default();
    let (bits_to_take, bits_to_try): (Vec<BigInt>, Vec<BigInt>) = (0..max_base.bits())
        .map(|i| BigInt::from(1u32) << i)
        .partition(|bit| (given_bits & bit) == *bit);

    let partitions = bits_to_take
        .iter()
        .fold(vec![non_empty.clone()], |acc, bit| {
            partition_partitions(&acc, bit)
        });
    let selected = select_bits(partitions, bits_to_try.into_iter().rev().collect());
    let mask = selected
        .iter()
        .fold(given_bits.clone(), |acc, bit| acc | bit);

    let ignore = !&mask;
    let widened = non_empty
        .iter()
        .map(|port| port.iter().map(|set| set.widen(&ignore)).collect::<Port>())
        .collect::<Vec<Port>>();
    check_port_addresses("address decoder (widened by routing mask)", &labelled(&widened))?;

    log::debug!(
        "routing mask {:#x} distinguishes {} ports",
        mask,
        non_empty.len()
    );
    Ok(mask)
}

fn labelled(ports: &[Port]) -> Vec<(String, &Port)> {
    ports
        .iter()
        .enumerate()
        .map(|(i, port)| (format!("port #{i}"), port))
        .collect()
}

/// Splits `port` into the sets reachable when `bit` is 0 and when it is 1.
fn partition_port(port: &Port, bit: &BigInt) -> (Port, Port) {
    let low = AddressSet::bit_half(bit, false);
    let high = AddressSet::bit_half(bit, true);
    let subset_low = port.iter().filter(|set| set.overlaps(&low)).cloned().collect();
    let subset_high = port.iter().filter(|set| set.overlaps(&high)).cloned().collect();
    (subset_low, subset_high)
}

fn partition_ports(ports: &Partition, bit: &BigInt) -> (Partition, Partition) {
    let (low, high): (Partition, Partition) =
        ports.iter().map(|port| partition_port(port, bit)).unzip();
    (
        low.into_iter().filter(|port| !port.is_empty()).collect(),
        high.into_iter().filter(|port| !port.is_empty()).collect(),
    )
}

fn partition_partitions(partitions: &[Partition], bit: &BigInt) -> Vec<Partition> {
    let (low, high): (Vec<Partition>, Vec<Partition>) = partitions
        .iter()
        .map(|partition| partition_ports(partition, bit))
        .unzip();
    let mut result = low
        .into_iter()
        .chain(high)
        .filter(|partition| !partition.is_empty())
        .collect::<Vec<Partition>>();
    // identical partitions need only be resolved once; ports and sets are
    // kept sorted so structural equality is enough
    result.sort();
    result.dedup();
    result
}

/// Larger partitions dominate: compare the sizes largest first.
fn score(partitions: &[Partition]) -> Vec<usize> {
    partitions
        .iter()
        .map(|partition| partition.len())
        .sorted_by(|a, b| b.cmp(a))
        .collect()
}

fn select_bits(mut partitions: Vec<Partition>, mut bits: Vec<BigInt>) -> Vec<BigInt> {
    let mut selected = Vec::new();
    while !partitions.iter().all(|partition| partition.len() <= 1) {
        let best = bits
            .iter()
            .enumerate()
            .map(|(index, bit)| {
                let result = partition_partitions(&partitions, bit);
                (score(&result), index, result)
            })
            .min_by(|a, b| a.0.cmp(&b.0));
        let Some((_, index, result)) = best else {
            // out of bits; the caller's verification reports the ambiguity
            break;
        };
        let bit = bits.remove(index);
        log::trace!("selected routing bit {bit:#x}, {} partitions", result.len());
        selected.push(bit);
        partitions = result;
    }
    selected
}
