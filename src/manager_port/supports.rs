// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigInt;
use paste::paste;

use crate::{ManagerOp, ManagerPortParameters, TransferSizes};

macro_rules! manager_support {
    ($($op:ident),* $(,)?) => {
        paste! {
            $(
                pub fn [<all_support_ $op>](&self) -> TransferSizes {
                    self.all_support(ManagerOp::[<$op:camel>])
                }

                pub fn [<any_support_ $op>](&self) -> bool {
                    self.any_support(ManagerOp::[<$op:camel>])
                }

                pub fn [<supports_ $op _safe>](&self, address: &BigInt, lg_size: u32) -> bool {
                    self.supports_safe(ManagerOp::[<$op:camel>], address, lg_size)
                }

                pub fn [<supports_ $op _fast>](&self, address: &BigInt, lg_size: u32) -> bool {
                    self.supports_fast(ManagerOp::[<$op:camel>], address, lg_size)
                }
            )*
        }
    };
}

impl ManagerPortParameters {
    /// True iff the manager owning `address` accepts `op` of size
    /// `1 << lg_size`. False for addresses nobody owns.
    pub fn supports_safe(&self, op: ManagerOp, address: &BigInt, lg_size: u32) -> bool {
        self.select_safe(address, |m| m.supports(op))
            .is_some_and(|sizes| sizes.contains_lg(lg_size))
    }

    /// Routing-mask variant of [`supports_safe`](Self::supports_safe), with
    /// the same precondition as `find_fast`.
    pub fn supports_fast(&self, op: ManagerOp, address: &BigInt, lg_size: u32) -> bool {
        self.select_fast(address, |m| m.supports(op))
            .is_some_and(|sizes| sizes.contains_lg(lg_size))
    }

    manager_support!(
        acquire,
        arithmetic,
        logical,
        get,
        put_full,
        put_partial,
        hint,
    );
}
