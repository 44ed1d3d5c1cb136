// SPDX-License-Identifier: Apache-2.0

use itertools::Itertools;

use crate::{AddressSet, ParamError, Result};

fn overlap_error(owner: String, a: &AddressSet, b: &AddressSet) -> ParamError {
    log::warn!("{owner}: address sets {a} and {b} overlap");
    ParamError::OverlappingAddress {
        owner,
        a: a.clone(),
        b: b.clone(),
    }
}

/// Checks that the address sets claimed by a single descriptor are
/// pairwise disjoint.
pub(crate) fn check_descriptor_addresses(name: &str, sets: &[AddressSet]) -> Result<()> {
    match sets.iter().tuple_combinations().find(|(a, b)| a.overlaps(b)) {
        Some((a, b)) => Err(overlap_error(name.to_string(), a, b)),
        None => Ok(()),
    }
}

/// Checks that no set of one named port overlaps a set of another. Sets
/// within the same port are not compared with each other.
pub(crate) fn check_port_addresses<N, P>(owner: &str, ports: &[(N, P)]) -> Result<()>
where
    N: AsRef<str>,
    P: AsRef<[AddressSet]>,
{
    for ((x_name, x), (y_name, y)) in ports.iter().map(|(n, p)| (n, p)).tuple_combinations() {
        for a in x.as_ref() {
            if let Some(b) = y.as_ref().iter().find(|b| a.overlaps(b)) {
                let owner = format!("{owner}: {} and {}", x_name.as_ref(), y_name.as_ref());
                return Err(overlap_error(owner, a, b));
            }
        }
    }
    Ok(())
}
