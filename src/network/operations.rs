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

//! Idempotent port operations.

use super::devices::{Device, Port};
use super::policy::Policy;
use super::types::NetworkType;
use crate::{DeviceDirectory, Error, ErrorKind, Result};

/// Port operations that are safe to repeat.
///
/// Each operation first checks the given snapshot and skips the remote call
/// if the port already has the requested property. The returned port only
/// reflects the targeted port: fetch the device again before making further
/// decisions, since the provider may change sibling ports as well.
#[derive(Debug)]
pub struct PortOperations<'a, D: ?Sized> {
    directory: &'a D,
    policy: &'a Policy,
}

impl<'a, D: DeviceDirectory + ?Sized> PortOperations<'a, D> {
    /// Create port operations on top of a device directory.
    pub fn new(directory: &'a D, policy: &'a Policy) -> PortOperations<'a, D> {
        PortOperations { directory, policy }
    }

    /// Add the port to its bond unless it is already bonded.
    pub async fn bond(&self, port: &Port, bulk: bool) -> Result<Port> {
        if port.is_bonded() {
            trace!("Port {} is already bonded", port.name());
            return Ok(port.clone());
        }

        debug!("Bonding port {} ({}), bulk: {}", port.name(), port.id(), bulk);
        let result = self.directory.bond(port.id(), bulk).await?;
        trace!("Received {:?}", result);
        Ok(result)
    }

    /// Remove the port from its bond unless it is already unbonded.
    pub async fn disbond(&self, port: &Port, bulk: bool) -> Result<Port> {
        if !port.is_bonded() {
            trace!("Port {} is already disbonded", port.name());
            return Ok(port.clone());
        }

        debug!(
            "Disbonding port {} ({}), bulk: {}",
            port.name(),
            port.id(),
            bulk
        );
        let result = self.directory.disbond(port.id(), bulk).await?;
        trace!("Received {:?}", result);
        Ok(result)
    }

    /// Convert the named port of the device to layer 2.
    ///
    /// Nothing is done if the port is already in one of the layer 2 modes.
    pub async fn to_layer2(&self, device: &Device, port_name: &str) -> Result<Port> {
        let port = find_port(device, port_name)?;
        if port.network_type().is_layer2() {
            trace!(
                "Port {} of device {} is already in {}",
                port_name,
                device.id(),
                port.network_type()
            );
            return Ok(port.clone());
        }

        debug!(
            "Converting port {} of device {} from {} to layer 2",
            port_name,
            device.id(),
            port.network_type()
        );
        let result = self.directory.convert_to_layer2(port.id()).await?;
        trace!("Received {:?}", result);
        Ok(result)
    }

    /// Convert the named port of the device to layer 3.
    ///
    /// Nothing is done if the port is already in the `layer3` or `hybrid` mode.
    /// Otherwise the addresses from the policy are requested.
    pub async fn to_layer3(&self, device: &Device, port_name: &str) -> Result<Port> {
        let port = find_port(device, port_name)?;
        if matches!(
            port.network_type(),
            NetworkType::Layer3 | NetworkType::Hybrid
        ) {
            trace!(
                "Port {} of device {} is already in {}",
                port_name,
                device.id(),
                port.network_type()
            );
            return Ok(port.clone());
        }

        debug!(
            "Converting port {} of device {} from {} to layer 3 with addresses {:?}",
            port_name,
            device.id(),
            port.network_type(),
            self.policy.layer3_addresses()
        );
        let result = self
            .directory
            .convert_to_layer3(port.id(), self.policy.layer3_addresses())
            .await?;
        trace!("Received {:?}", result);
        Ok(result)
    }

    /// Attach a virtual network to the port unless it is already attached.
    ///
    /// Attaching a network to a `layer3` bond port turns it `hybrid-bonded`.
    pub async fn assign_network(&self, port: &Port, network_id: &str, native: bool) -> Result<Port> {
        if let Some(existing) = port.virtual_network(network_id) {
            if existing.native == native {
                trace!(
                    "Network {} is already attached to port {}",
                    network_id,
                    port.name()
                );
                return Ok(port.clone());
            }
        }

        debug!(
            "Attaching network {} to port {} ({}), native: {}",
            network_id,
            port.name(),
            port.id(),
            native
        );
        let result = self
            .directory
            .assign_network(port.id(), network_id, native)
            .await?;
        trace!("Received {:?}", result);
        Ok(result)
    }

    /// Detach a virtual network from the port unless it is not attached.
    pub async fn unassign_network(&self, port: &Port, network_id: &str) -> Result<Port> {
        if port.virtual_network(network_id).is_none() {
            trace!(
                "Network {} is not attached to port {}",
                network_id,
                port.name()
            );
            return Ok(port.clone());
        }

        debug!(
            "Detaching network {} from port {} ({})",
            network_id,
            port.name(),
            port.id()
        );
        let result = self
            .directory
            .unassign_network(port.id(), network_id)
            .await?;
        trace!("Received {:?}", result);
        Ok(result)
    }
}

fn find_port<'d>(device: &'d Device, port_name: &str) -> Result<&'d Port> {
    device.port(port_name).ok_or_else(|| {
        Error::new(
            ErrorKind::ResourceNotFound,
            format!("Port {} was not found on device {}", port_name, device.id()),
        )
    })
}
