// SPDX-License-Identifier: Apache-2.0

use fixedbitset::FixedBitSet;
use num_bigint::BigInt;

use crate::mux::{all_same, any_hot, mux_one_hot};
use crate::{ManagerParameters, ManagerPortParameters};

impl ManagerPortParameters {
    /// The manager owning `address`, if any.
    pub fn find(&self, address: &BigInt) -> Option<&ManagerParameters> {
        self.managers().find(|m| m.contains(address))
    }

    /// The manager owning sink id `sink`, if any.
    pub fn find_by_id(&self, sink: u64) -> Option<&ManagerParameters> {
        self.managers().find(|m| m.sink_id().contains(sink))
    }

    /// One bit per manager, set iff one of its address sets contains
    /// `address`. Checks every set of every manager, so the result is exact
    /// for any address, and all clear for an address nobody owns.
    pub fn find_safe(&self, address: &BigInt) -> FixedBitSet {
        let mut hits = FixedBitSet::with_capacity(self.len());
        for (i, m) in self.managers().enumerate() {
            hits.set(i, m.contains(address));
        }
        hits
    }

    /// Same as [`find_safe`](Self::find_safe), but only inspects the bits of
    /// the routing mask.
    ///
    /// The address must belong to some manager. For any other address the
    /// result is unspecified: it may select a manager, several, or none.
    pub fn find_fast(&self, address: &BigInt) -> FixedBitSet {
        let mut hits = FixedBitSet::with_capacity(self.len());
        for (i, sets) in self.fast_address.iter().enumerate() {
            hits.set(i, sets.iter().any(|set| set.contains(address)));
        }
        hits
    }

    /// True iff some manager owns `address`. There is no fast variant: under
    /// the fast precondition the answer is always true.
    pub fn contains_safe(&self, address: &BigInt) -> bool {
        any_hot(&self.find_safe(address))
    }

    pub fn contains_by_id(&self, sink: u64) -> bool {
        self.managers().any(|m| m.sink_id().contains(sink))
    }

    /// Selects a per-manager value with the exact lookup.
    pub(crate) fn select_safe<T: Clone>(
        &self,
        address: &BigInt,
        member: impl Fn(&ManagerParameters) -> T,
    ) -> Option<T> {
        let values = self.managers().map(member).collect::<Vec<_>>();
        mux_one_hot(&self.find_safe(address), &values)
    }

    /// Selects a per-manager value with the routing-mask lookup. When every
    /// manager agrees on the value no lookup is needed at all.
    pub(crate) fn select_fast<T: Clone + PartialEq>(
        &self,
        address: &BigInt,
        member: impl Fn(&ManagerParameters) -> T,
    ) -> Option<T> {
        let values = self.managers().map(member).collect::<Vec<_>>();
        if all_same(&values) {
            return values.into_iter().next();
        }
        mux_one_hot(&self.find_fast(address), &values)
    }

    /// FIFO domain of the manager owning `address`.
    pub fn find_fifo_id_safe(&self, address: &BigInt) -> Option<u32> {
        self.select_safe(address, ManagerParameters::fifo_id).flatten()
    }

    pub fn find_fifo_id_fast(&self, address: &BigInt) -> Option<u32> {
        self.select_fast(address, ManagerParameters::fifo_id).flatten()
    }

    /// First sink id of the manager owning `address`.
    pub fn find_id_start_safe(&self, address: &BigInt) -> Option<u64> {
        self.select_safe(address, |m| m.sink_id().start())
    }

    pub fn find_id_start_fast(&self, address: &BigInt) -> Option<u64> {
        self.select_fast(address, |m| m.sink_id().start())
    }

    /// One past the last sink id of the manager owning `address`.
    pub fn find_id_end_safe(&self, address: &BigInt) -> Option<u64> {
        self.select_safe(address, |m| m.sink_id().end())
    }

    pub fn find_id_end_fast(&self, address: &BigInt) -> Option<u64> {
        self.select_fast(address, |m| m.sink_id().end())
    }
}
