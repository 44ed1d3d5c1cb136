// SPDX-License-Identifier: Apache-2.0

use fixedbitset::FixedBitSet;

/// Software form of a one-hot multiplexer: returns the value whose select
/// bit is set. With no bit set there is nothing to select. With more than
/// one bit set the select vector is not one-hot and the lowest hit wins.
pub fn mux_one_hot<T: Clone>(select: &FixedBitSet, values: &[T]) -> Option<T> {
    select.ones().next().and_then(|i| values.get(i)).cloned()
}

/// OR-reduction of a select vector.
pub fn any_hot(select: &FixedBitSet) -> bool {
    select.ones().next().is_some()
}

/// True iff every value equals the first one.
pub(crate) fn all_same<T: PartialEq>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
