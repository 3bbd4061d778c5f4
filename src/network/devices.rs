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

//! Devices and their network ports.

use macaddr::MacAddr6;

use super::protocol;
use super::types::{NetworkAttachment, NetworkType, PortType};

/// A network port of a device.
///
/// This is a read replica of the provider state: it is never updated in place.
/// Fetch the device again to get the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Port {
    inner: protocol::Port,
}

/// A bare metal device with its network ports.
///
/// This is a read replica of the provider state, see [`Port`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Device {
    inner: protocol::Device,
}

impl Port {
    /// Create a port representation.
    ///
    /// Used by device directory implementations that do not deserialize
    /// ports from the provider JSON directly.
    pub fn new<S1, S2>(id: S1, name: S2, port_type: PortType, network_type: NetworkType) -> Port
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Port {
            inner: protocol::Port {
                id: id.into(),
                name: name.into(),
                port_type,
                network_type,
                data: protocol::PortData::default(),
                disbond_operation_supported: port_type == PortType::Physical,
                virtual_networks: Vec::new(),
            },
        }
    }

    /// Set the bond this port belongs to.
    pub fn with_bond<S: Into<String>>(mut self, bond: S) -> Self {
        self.inner.data.bond = Some(bond.into());
        self
    }

    /// Set whether this port is bonded.
    pub fn with_bonded(mut self, bonded: bool) -> Self {
        self.inner.data.bonded = bonded;
        self
    }

    /// Set the MAC address.
    pub fn with_mac(mut self, mac: MacAddr6) -> Self {
        self.inner.data.mac = Some(mac);
        self
    }

    /// Set the network mode.
    pub fn with_network_type(mut self, network_type: NetworkType) -> Self {
        self.inner.network_type = network_type;
        self
    }

    /// Add an attached virtual network.
    pub fn with_virtual_network(mut self, attachment: NetworkAttachment) -> Self {
        self.inner.virtual_networks.push(attachment);
        self
    }

    transparent_property! {
        /// Unique ID of the port.
        id: ref String
    }

    transparent_property! {
        /// Interface name (e.g. `eth0` or `bond0`).
        name: ref String
    }

    transparent_property! {
        /// Type of the port.
        port_type: PortType
    }

    transparent_property! {
        /// Current network mode of the port.
        network_type: NetworkType
    }

    transparent_property! {
        /// Whether the provider supports disbonding this port.
        disbond_operation_supported: bool
    }

    transparent_property! {
        /// Virtual networks attached to the port.
        virtual_networks: ref Vec<NetworkAttachment>
    }

    /// Whether the port is a member of a bond aggregate.
    #[inline]
    pub fn is_bonded(&self) -> bool {
        self.inner.data.bonded
    }

    /// Whether this is a bond aggregation port.
    #[inline]
    pub fn is_bond(&self) -> bool {
        self.inner.port_type == PortType::Bond
    }

    /// Name of the bond this port belongs to (if any).
    #[inline]
    pub fn bond_name(&self) -> Option<&str> {
        self.inner.data.bond.as_deref()
    }

    /// MAC address of the port (if known).
    #[inline]
    pub fn mac(&self) -> Option<MacAddr6> {
        self.inner.data.mac
    }

    /// Find an attached virtual network by its ID.
    pub fn virtual_network<S: AsRef<str>>(&self, id: S) -> Option<&NetworkAttachment> {
        let id = id.as_ref();
        self.inner.virtual_networks.iter().find(|vn| vn.id == id)
    }
}

impl Device {
    /// Create a device representation.
    pub fn new<S, I>(id: S, ports: I) -> Device
    where
        S: Into<String>,
        I: IntoIterator<Item = Port>,
    {
        Device {
            inner: protocol::Device {
                id: id.into(),
                hostname: None,
                network_ports: ports.into_iter().collect(),
            },
        }
    }

    /// Set the host name.
    pub fn with_hostname<S: Into<String>>(mut self, hostname: S) -> Self {
        self.inner.hostname = Some(hostname.into());
        self
    }

    transparent_property! {
        /// Unique ID of the device.
        id: ref String
    }

    transparent_property! {
        /// Host name of the device (if set).
        hostname: ref Option<String>
    }

    /// Network ports of the device.
    ///
    /// The order of ports carries no meaning.
    #[inline]
    pub fn ports(&self) -> &[Port] {
        &self.inner.network_ports
    }

    /// Find a port by its interface name.
    pub fn port<S: AsRef<str>>(&self, name: S) -> Option<&Port> {
        let name = name.as_ref();
        self.inner.network_ports.iter().find(|p| p.name() == name)
    }

    /// Physical (bondable) ports of the device.
    pub fn physical_ports(&self) -> impl Iterator<Item = &Port> {
        self.inner.network_ports.iter().filter(|p| !p.is_bond())
    }
}
