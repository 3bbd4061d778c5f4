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

//! Access to the provider's device API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::network::{AddressRequest, Device, Port};
use crate::{Error, ErrorKind, Result};

/// Provider API used to read and change device ports.
///
/// Implement this trait on top of your API client. Every mutating call returns
/// the targeted port as the provider reports it right after the call. Other
/// ports of the device may change as a side effect, so the returned port must
/// not be used to judge the state of the device.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    /// Fetch the current state of a device with all its ports.
    async fn get_device(&self, device_id: &str) -> Result<Device>;

    /// Fetch a single port of a device by its interface name.
    ///
    /// Fails with `ResourceNotFound` if the device has no such port.
    async fn get_port(&self, device_id: &str, name: &str) -> Result<Port> {
        let device = self.get_device(device_id).await?;
        device.port(name).cloned().ok_or_else(|| {
            Error::new(
                ErrorKind::ResourceNotFound,
                format!("Port {} was not found on device {}", name, device_id),
            )
        })
    }

    /// Add the port to its bond.
    ///
    /// With `bulk` all sibling ports are bonded in the same call.
    async fn bond(&self, port_id: &str, bulk: bool) -> Result<Port>;

    /// Remove the port from its bond.
    ///
    /// With `bulk` all sibling ports are disbonded in the same call.
    async fn disbond(&self, port_id: &str, bulk: bool) -> Result<Port>;

    /// Convert the port to layer 2, removing its IP addresses.
    async fn convert_to_layer2(&self, port_id: &str) -> Result<Port>;

    /// Convert the port to layer 3, requesting the given IP addresses.
    async fn convert_to_layer3(&self, port_id: &str, addresses: &[AddressRequest])
        -> Result<Port>;

    /// Attach a virtual network to the port.
    async fn assign_network(&self, port_id: &str, network_id: &str, native: bool)
        -> Result<Port>;

    /// Detach a virtual network from the port.
    async fn unassign_network(&self, port_id: &str, network_id: &str) -> Result<Port>;
}

#[async_trait]
impl<T: DeviceDirectory + ?Sized> DeviceDirectory for Arc<T> {
    async fn get_device(&self, device_id: &str) -> Result<Device> {
        (**self).get_device(device_id).await
    }

    async fn get_port(&self, device_id: &str, name: &str) -> Result<Port> {
        (**self).get_port(device_id, name).await
    }

    async fn bond(&self, port_id: &str, bulk: bool) -> Result<Port> {
        (**self).bond(port_id, bulk).await
    }

    async fn disbond(&self, port_id: &str, bulk: bool) -> Result<Port> {
        (**self).disbond(port_id, bulk).await
    }

    async fn convert_to_layer2(&self, port_id: &str) -> Result<Port> {
        (**self).convert_to_layer2(port_id).await
    }

    async fn convert_to_layer3(
        &self,
        port_id: &str,
        addresses: &[AddressRequest],
    ) -> Result<Port> {
        (**self).convert_to_layer3(port_id, addresses).await
    }

    async fn assign_network(
        &self,
        port_id: &str,
        network_id: &str,
        native: bool,
    ) -> Result<Port> {
        (**self).assign_network(port_id, network_id, native).await
    }

    async fn unassign_network(&self, port_id: &str, network_id: &str) -> Result<Port> {
        (**self).unassign_network(port_id, network_id).await
    }
}
