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

protocol_enum! {
    /// Network mode of a port.
    ///
    /// The network mode of a device is the network mode of its bond port.
    enum NetworkType {
        /// Bonded ports carrying routed IP addresses.
        Layer3 = "layer3",
        /// Bonded ports carrying tagged virtual networks, no IP addresses.
        Layer2Bonded = "layer2-bonded",
        /// Independent ports carrying tagged virtual networks, no IP addresses.
        Layer2Individual = "layer2-individual",
        /// One port carries layer 3 addressing, a sibling carries virtual networks.
        Hybrid = "hybrid",
        /// A layer 3 bond with a virtual network attached.
        ///
        /// This mode is observed, it cannot be requested.
        HybridBonded = "hybrid-bonded"
    }
}

impl NetworkType {
    /// Whether this mode is one of the layer 2 modes.
    #[inline]
    pub fn is_layer2(&self) -> bool {
        matches!(self, NetworkType::Layer2Bonded | NetworkType::Layer2Individual)
    }

    /// Whether a conversion to this mode can be requested.
    #[inline]
    pub fn is_requestable(&self) -> bool {
        *self != NetworkType::HybridBonded
    }
}

protocol_enum! {
    /// Type of a device port.
    enum PortType {
        /// A bondable physical port (`eth0`, `eth1`, ...).
        Physical = "NetworkPort",
        /// A bond aggregation port (`bond0`).
        Bond = "NetworkBondPort"
    }
}

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AddressFamily {
    /// IPv4.
    V4,
    /// IPv6.
    V6,
}

impl From<AddressFamily> for u8 {
    fn from(value: AddressFamily) -> u8 {
        match value {
            AddressFamily::V4 => 4,
            AddressFamily::V6 => 6,
        }
    }
}

impl TryFrom<u8> for AddressFamily {
    type Error = String;

    fn try_from(value: u8) -> ::std::result::Result<AddressFamily, String> {
        match value {
            4 => Ok(AddressFamily::V4),
            6 => Ok(AddressFamily::V6),
            other => Err(format!("Unexpected address family {}", other)),
        }
    }
}

/// An IP address requested when converting a port to layer 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressRequest {
    /// Address family.
    pub address_family: AddressFamily,
    /// Whether the address is public.
    pub public: bool,
}

impl AddressRequest {
    /// A public IPv4 address.
    pub const PUBLIC_IPV4: AddressRequest = AddressRequest {
        address_family: AddressFamily::V4,
        public: true,
    };

    /// A private IPv4 address.
    pub const PRIVATE_IPV4: AddressRequest = AddressRequest {
        address_family: AddressFamily::V4,
        public: false,
    };

    /// A public IPv6 address.
    pub const PUBLIC_IPV6: AddressRequest = AddressRequest {
        address_family: AddressFamily::V6,
        public: true,
    };
}

/// A virtual network attached to a port.
///
/// Whether the network is native (untagged) is a property of the attachment,
/// not of the port or the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// ID of the virtual network.
    pub id: String,
    /// VXLAN tag of the virtual network (if known).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vxlan: Option<u32>,
    /// Whether the network is attached as native.
    #[serde(default, skip_serializing_if = "crate::utils::is_default")]
    pub native: bool,
}

impl NetworkAttachment {
    /// Tagged attachment of a network.
    pub fn tagged<S: Into<String>>(id: S) -> NetworkAttachment {
        NetworkAttachment {
            id: id.into(),
            vxlan: None,
            native: false,
        }
    }

    /// Native attachment of a network.
    pub fn native<S: Into<String>>(id: S) -> NetworkAttachment {
        NetworkAttachment {
            id: id.into(),
            vxlan: None,
            native: true,
        }
    }
}
