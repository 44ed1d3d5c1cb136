// SPDX-License-Identifier: Apache-2.0

//! Parameter negotiation and address routing for TileLink-style
//! interconnects.
//!
//! Managers (memory-mapped slaves) and clients (masters) describe what they
//! can do; a port groups the descriptors behind one link and checks that
//! they are consistent; an edge pairs a client port with a manager port and
//! derives the wire widths of the link.

pub mod address_decoder;
mod address_set;
mod bundle;
mod client;
mod client_port;
mod edge;
mod error;
mod id_range;
mod manager;
mod manager_port;
pub mod mux;
mod region_type;
mod transfer_sizes;
pub mod util;
mod validate;

pub use address_set::AddressSet;
pub use bundle::BundleParameters;
pub use client::{ClientConfig, ClientOp, ClientParameters};
pub use client_port::ClientPortParameters;
pub use edge::EdgeParameters;
pub use error::{ParamError, Result};
pub use id_range::IdRange;
pub use manager::{ManagerConfig, ManagerOp, ManagerParameters};
pub use manager_port::ManagerPortParameters;
pub use mux::{any_hot, mux_one_hot};
pub use region_type::RegionType;
pub use transfer_sizes::TransferSizes;

pub use fixedbitset::FixedBitSet;
pub use num_bigint::BigInt;
