// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::{IdRange, ParamError, Result, TransferSizes};

/// Operations a client may accept from the managers it talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientOp {
    Probe,
    Arithmetic,
    Logical,
    Get,
    PutFull,
    PutPartial,
    Hint,
}

impl ClientOp {
    pub const ALL: [ClientOp; 7] = [
        ClientOp::Probe,
        ClientOp::Arithmetic,
        ClientOp::Logical,
        ClientOp::Get,
        ClientOp::PutFull,
        ClientOp::PutPartial,
        ClientOp::Hint,
    ];
}

impl fmt::Display for ClientOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub name: String,
    pub source_id: IdRange,
    /// The client expects responses in the order it issued requests.
    pub requests_fifo: bool,
    /// Sizes for which the client accepts both Probe and Grant.
    pub supports_probe: TransferSizes,
    pub supports_arithmetic: TransferSizes,
    pub supports_logical: TransferSizes,
    pub supports_get: TransferSizes,
    pub supports_put_full: TransferSizes,
    pub supports_put_partial: TransferSizes,
    pub supports_hint: TransferSizes,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            name: "disconnected".to_string(),
            source_id: IdRange::default(),
            requests_fifo: false,
            supports_probe: TransferSizes::NONE,
            supports_arithmetic: TransferSizes::NONE,
            supports_logical: TransferSizes::NONE,
            supports_get: TransferSizes::NONE,
            supports_put_full: TransferSizes::NONE,
            supports_put_partial: TransferSizes::NONE,
            supports_hint: TransferSizes::NONE,
        }
    }
}

impl ClientConfig {
    fn supports(&self, op: ClientOp) -> TransferSizes {
        match op {
            ClientOp::Probe => self.supports_probe,
            ClientOp::Arithmetic => self.supports_arithmetic,
            ClientOp::Logical => self.supports_logical,
            ClientOp::Get => self.supports_get,
            ClientOp::PutFull => self.supports_put_full,
            ClientOp::PutPartial => self.supports_put_partial,
            ClientOp::Hint => self.supports_hint,
        }
    }
}

/// A validated client descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientParameters {
    config: ClientConfig,
    max_transfer: u32,
}

impl ClientParameters {
    pub fn new(config: ClientConfig) -> Result<ClientParameters> {
        let name = config.name.as_str();
        let subset_error = |what: &'static str, outer: TransferSizes, inner: TransferSizes| {
            log::warn!("{name}: {what} capability {inner} is not within {outer}");
            ParamError::CapabilitySubset {
                name: name.to_string(),
                what,
                outer,
                inner,
            }
        };

        if !config
            .supports_put_full
            .contains_sizes(&config.supports_put_partial)
        {
            return Err(subset_error(
                "put-partial",
                config.supports_put_full,
                config.supports_put_partial,
            ));
        }

        // only a cache, which must accept probes, serves these operations
        let probed = [
            ("arithmetic", config.supports_arithmetic),
            ("logical", config.supports_logical),
            ("get", config.supports_get),
            ("put-full", config.supports_put_full),
            ("hint", config.supports_hint),
        ];
        if let Some((what, inner)) = probed
            .into_iter()
            .find(|(_, inner)| !config.supports_probe.contains_sizes(inner))
        {
            return Err(subset_error(what, config.supports_probe, inner));
        }

        let max_transfer = ClientOp::ALL
            .iter()
            .map(|&op| config.supports(op).max())
            .max()
            .unwrap_or(0);

        log::debug!(
            "client {name}: sources {}, max transfer {max_transfer}",
            config.source_id
        );

        Ok(ClientParameters {
            config,
            max_transfer,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn source_id(&self) -> IdRange {
        self.config.source_id
    }

    pub fn requests_fifo(&self) -> bool {
        self.config.requests_fifo
    }

    pub fn supports(&self, op: ClientOp) -> TransferSizes {
        self.config.supports(op)
    }

    pub fn max_transfer(&self) -> u32 {
        self.max_transfer
    }
}
