// SPDX-License-Identifier: Apache-2.0

use crate::util::log2_up;
use crate::{BundleParameters, ClientPortParameters, ManagerPortParameters, ParamError, Result};

/// One link: a client port talking to a manager port.
#[derive(Clone, Debug)]
pub struct EdgeParameters {
    client: ClientPortParameters,
    manager: ManagerPortParameters,
    max_transfer: u32,
    bundle: BundleParameters,
}

impl EdgeParameters {
    /// Pairs the two ports. Fails if no transfer on the link can fill a
    /// single beat of the manager's data path.
    pub fn new(client: ClientPortParameters, manager: ManagerPortParameters) -> Result<EdgeParameters> {
        let max_transfer = client.max_transfer().max(manager.max_transfer());
        if max_transfer < manager.beat_bytes() {
            let managers = manager
                .managers()
                .map(|m| m.name().to_string())
                .collect::<Vec<_>>();
            log::warn!(
                "link's max transfer ({max_transfer}) < {managers:?}'s beat bytes ({})",
                manager.beat_bytes()
            );
            return Err(ParamError::TransferTooSmall {
                max_transfer,
                beat_bytes: manager.beat_bytes(),
                managers,
            });
        }
        let bundle = BundleParameters::from_ports(&client, &manager)?;
        log::debug!(
            "edge: {} clients -> {} managers, max transfer {max_transfer}, {bundle:?}",
            client.len(),
            manager.len()
        );
        Ok(EdgeParameters {
            client,
            manager,
            max_transfer,
            bundle,
        })
    }

    pub fn client(&self) -> &ClientPortParameters {
        &self.client
    }

    pub fn manager(&self) -> &ManagerPortParameters {
        &self.manager
    }

    pub fn max_transfer(&self) -> u32 {
        self.max_transfer
    }

    /// log2 of the largest transfer, as carried in the size field. At
    /// least 1, so a link moving single bytes still has a size to encode.
    pub fn max_lg_size(&self) -> u32 {
        log2_up(self.max_transfer as u64)
    }

    pub fn bundle(&self) -> &BundleParameters {
        &self.bundle
    }
}
