// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigInt;
use thiserror::Error;

use crate::{AddressSet, IdRange, TransferSizes};

pub type Result<T> = std::result::Result<T, ParamError>;

/// Configuration errors raised while constructing parameter objects.
///
/// Every error is fatal to the configuration being built; no partially
/// validated object is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("invalid id range [{start}, {end}): ids must be non-negative and the range non-empty")]
    InvalidRange { start: i64, end: i64 },

    #[error("invalid transfer sizes [{min}, {max}]")]
    InvalidTransferSize { min: u32, max: u32 },

    #[error("invalid address set (base {base}, mask {mask}): {reason}")]
    InvalidAddressSet {
        base: String,
        mask: String,
        reason: &'static str,
    },

    #[error("cannot parse address set from '{text}'")]
    ParseAddressSet { text: String },

    #[error("{port}: ids of {first} {a} and {second} {b} overlap")]
    OverlappingId {
        port: String,
        first: String,
        second: String,
        a: IdRange,
        b: IdRange,
    },

    #[error("{owner}: address sets {a} and {b} overlap")]
    OverlappingAddress {
        owner: String,
        a: AddressSet,
        b: AddressSet,
    },

    #[error("{name}: {what} capability {inner} is not contained in {outer}")]
    CapabilitySubset {
        name: String,
        what: &'static str,
        outer: TransferSizes,
        inner: TransferSizes,
    },

    #[error("{name}: alignment {alignment:#x} is smaller than the max transfer size {max_transfer}")]
    AlignmentViolation {
        name: String,
        alignment: BigInt,
        max_transfer: u32,
    },

    #[error("link's max transfer ({max_transfer}) < beat bytes ({beat_bytes}) of {managers:?}")]
    TransferTooSmall {
        max_transfer: u32,
        beat_bytes: u32,
        managers: Vec<String>,
    },

    #[error("{name}: address set {set} is not finite")]
    InfiniteAddress { name: String, set: AddressSet },

    #[error("{name}: a manager must claim at least one address set")]
    EmptyAddress { name: String },

    #[error("{name}: address set {set} is not contiguous")]
    NonContiguous { name: String, set: AddressSet },

    #[error("a {kind} port must contain at least one descriptor")]
    EmptyPort { kind: &'static str },

    #[error("{port}: descriptor name '{name}' is used more than once")]
    DuplicateName { port: String, name: String },

    #[error("beat bytes must be a power of two, got {beat_bytes}")]
    InvalidBeatBytes { beat_bytes: u32 },

    #[error("invalid bundle field {field} = {value}")]
    InvalidBundle { field: &'static str, value: u32 },
}
