// Copyright 2024 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Device network ports and their topology.
//!
//! # Network modes
//!
//! A device reports its network mode on the bond port (`bond0`):
//!
//! * `layer3` - all ports bonded, routed IP addresses;
//! * `layer2-bonded` - all ports bonded, tagged virtual networks only;
//! * `layer2-individual` - all ports independent, tagged virtual networks only;
//! * `hybrid` - one port bonded with layer 3 addressing, the others (`eth1`,
//!   `eth3`) split out for virtual networks;
//! * `hybrid-bonded` - a `layer3` bond with a virtual network attached. This
//!   mode is only observed, it is reached by attaching a network.
//!
//! Use [`Converter`] to move a device between modes.

mod classify;
mod converter;
mod devices;
#[cfg(test)]
mod fake;
mod operations;
mod policy;
mod protocol;
mod recipes;
mod types;

pub use self::classify::{bond_mode, device_mode, eth_ports_in_bond, transition_required};
pub use self::converter::Converter;
pub use self::devices::{Device, Port};
pub use self::operations::PortOperations;
pub use self::policy::{
    Policy, DEFAULT_BOND_NAME, DEFAULT_HYBRID_PORTS, DEFAULT_LAYER3_ADDRESSES,
};
pub use self::recipes::{recipe, Step};
pub use self::types::{AddressFamily, AddressRequest, NetworkAttachment, NetworkType, PortType};
