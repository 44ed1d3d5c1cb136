// SPDX-License-Identifier: Apache-2.0

//! Cross-checks shared by descriptors, ports and the address decoder.

use std::collections::HashSet;

use crate::{ParamError, Result};

mod address_overlap;
mod id_overlap;

pub(crate) use address_overlap::{check_descriptor_addresses, check_port_addresses};
pub(crate) use id_overlap::check_ids;

/// Rejects a port whose descriptors do not have distinct names.
pub(crate) fn check_unique_names<'a>(
    port: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            log::warn!("{port}: duplicate descriptor name '{name}'");
            return Err(ParamError::DuplicateName {
                port: port.to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
