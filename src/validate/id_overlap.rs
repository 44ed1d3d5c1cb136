// SPDX-License-Identifier: Apache-2.0

use itertools::Itertools;

use crate::{IdRange, ParamError, Result};

/// Checks that no two named id ranges on `port` overlap.
pub(crate) fn check_ids(port: &str, ids: &[(&str, IdRange)]) -> Result<()> {
    for ((first, a), (second, b)) in ids.iter().tuple_combinations() {
        if a.overlaps(b) {
            log::warn!("{port}: ids of {first} {a} and {second} {b} overlap");
            return Err(ParamError::OverlappingId {
                port: port.to_string(),
                first: first.to_string(),
                second: second.to_string(),
                a: *a,
                b: *b,
            });
        }
    }
    Ok(())
}
