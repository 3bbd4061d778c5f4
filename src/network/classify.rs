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

//! Classification of device topologies.
//!
//! All functions here work on snapshots and never talk to the provider.

use super::devices::{Device, Port};
use super::policy::Policy;
use super::types::NetworkType;
use crate::{Error, ErrorKind, Result};

/// Network mode of a device.
///
/// This is the mode of its bond port as defined by the policy.
pub fn device_mode(device: &Device, policy: &Policy) -> Result<NetworkType> {
    bond_mode(device, policy.bond_name())
}

/// Network mode of the given bond of a device.
///
/// Fails with `InvalidInput` if the device has no such bond port.
pub fn bond_mode<S: AsRef<str>>(device: &Device, bond_name: S) -> Result<NetworkType> {
    bond_port(device, bond_name).map(Port::network_type)
}

/// Physical ports that belong to the given bond.
pub fn eth_ports_in_bond<S: AsRef<str>>(device: &Device, bond_name: S) -> Vec<&Port> {
    let bond_name = bond_name.as_ref();
    device
        .physical_ports()
        .filter(|p| p.bond_name() == Some(bond_name))
        .collect()
}

/// Whether converting from one mode to another requires any operations.
///
/// `layer3` and `hybrid-bonded` are considered equivalent: the latter is
/// a layer 3 bond with a virtual network attached, and no mode-changing
/// operation exists between them in either direction.
pub fn transition_required(from: NetworkType, to: NetworkType) -> bool {
    if from == to {
        return false;
    }

    !matches!(
        (from, to),
        (NetworkType::Layer3, NetworkType::HybridBonded)
            | (NetworkType::HybridBonded, NetworkType::Layer3)
    )
}

pub(crate) fn bond_port<S: AsRef<str>>(device: &Device, bond_name: S) -> Result<&Port> {
    let bond_name = bond_name.as_ref();
    device
        .port(bond_name)
        .filter(|p| p.is_bond())
        .ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Device {} has no bond port {}", device.id(), bond_name),
            )
        })
}
