// SPDX-License-Identifier: Apache-2.0

use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use paste::paste;

use crate::mux::{any_hot, mux_one_hot};
use crate::validate::{check_ids, check_unique_names};
use crate::{ClientOp, ClientParameters, ParamError, Result, TransferSizes};

const PORT: &str = "client port";

macro_rules! client_support {
    ($($op:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<all_support_ $op>](&self) -> TransferSizes {
                    self.all_support(ClientOp::[<$op:camel>])
                }

                pub fn [<any_support_ $op>](&self) -> bool {
                    self.any_support(ClientOp::[<$op:camel>])
                }

                pub fn [<supports_ $op>](&self, source: u64, lg_size: u32) -> bool {
                    self.supports(ClientOp::[<$op:camel>], source, lg_size)
                }
            )*
        }
    };
}

/// The clients sharing one port.
///
/// Source ids are exact, so unlike the manager side there is a single
/// lookup that is correct for every id.
#[derive(Clone, Debug)]
pub struct ClientPortParameters {
    clients: IndexMap<String, ClientParameters>,
    unsafe_atomics: bool,
    min_latency: u32,
}

impl ClientPortParameters {
    /// Validates that the port is non-empty and that no two clients share a
    /// source id.
    pub fn new(clients: Vec<ClientParameters>, min_latency: u32) -> Result<ClientPortParameters> {
        if clients.is_empty() {
            log::warn!("{PORT} has no clients");
            return Err(ParamError::EmptyPort { kind: "client" });
        }
        check_unique_names(PORT, clients.iter().map(ClientParameters::name))?;

        let source_ids = clients
            .iter()
            .map(|c| (c.name(), c.source_id()))
            .collect::<Vec<_>>();
        check_ids(PORT, &source_ids)?;

        let clients = clients
            .into_iter()
            .map(|c| (c.name().to_string(), c))
            .collect::<IndexMap<_, _>>();

        log::debug!("{PORT}: {} clients", clients.len());

        Ok(ClientPortParameters {
            clients,
            unsafe_atomics: false,
            min_latency,
        })
    }

    /// Allows atomics to be serviced by managers that cannot guarantee
    /// their atomicity against other clients.
    pub fn with_unsafe_atomics(mut self, unsafe_atomics: bool) -> ClientPortParameters {
        self.unsafe_atomics = unsafe_atomics;
        self
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientParameters> {
        self.clients.values()
    }

    pub fn get(&self, name: &str) -> Option<&ClientParameters> {
        self.clients.get(name)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn unsafe_atomics(&self) -> bool {
        self.unsafe_atomics
    }

    pub fn min_latency(&self) -> u32 {
        self.min_latency
    }

    /// One past the largest source id.
    pub fn end_source_id(&self) -> u64 {
        self.clients().map(|c| c.source_id().end()).max().unwrap_or(0)
    }

    pub fn max_transfer(&self) -> u32 {
        self.clients().map(ClientParameters::max_transfer).max().unwrap_or(0)
    }

    pub fn all_support(&self, op: ClientOp) -> TransferSizes {
        self.clients()
            .map(|c| c.supports(op))
            .reduce(|acc, sizes| acc.intersect(&sizes))
            .unwrap_or(TransferSizes::NONE)
    }

    pub fn any_support(&self, op: ClientOp) -> bool {
        self.clients().any(|c| c.supports(op).is_some())
    }

    /// The client owning source id `source`, if any.
    pub fn find_client(&self, source: u64) -> Option<&ClientParameters> {
        self.clients().find(|c| c.source_id().contains(source))
    }

    /// One bit per client, set iff its source range contains `source`.
    pub fn find(&self, source: u64) -> FixedBitSet {
        let mut hits = FixedBitSet::with_capacity(self.len());
        for (i, c) in self.clients().enumerate() {
            hits.set(i, c.source_id().contains_masked(source));
        }
        hits
    }

    pub fn contains(&self, source: u64) -> bool {
        any_hot(&self.find(source))
    }

    fn select<T: Clone>(&self, source: u64, member: impl Fn(&ClientParameters) -> T) -> Option<T> {
        let values = self.clients().map(member).collect::<Vec<_>>();
        mux_one_hot(&self.find(source), &values)
    }

    pub fn find_id_start(&self, source: u64) -> Option<u64> {
        self.select(source, |c| c.source_id().start())
    }

    pub fn find_id_end(&self, source: u64) -> Option<u64> {
        self.select(source, |c| c.source_id().end())
    }

    /// True iff the client owning `source` accepts `op` of size
    /// `1 << lg_size`.
    pub fn supports(&self, op: ClientOp, source: u64, lg_size: u32) -> bool {
        self.select(source, |c| c.supports(op))
            .is_some_and(|sizes| sizes.contains_lg(lg_size))
    }

    client_support!(
        probe,
        arithmetic,
        logical,
        get,
        put_full,
        put_partial,
        hint,
    );
}
