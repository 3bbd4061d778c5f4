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

//! Conversion policy.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::types::AddressRequest;
use crate::Result;

/// Name of the bond port managed by default.
pub const DEFAULT_BOND_NAME: &str = "bond0";

/// Ports split out of the bond in the hybrid mode.
///
/// This follows the provider's port layout: the second port of each pair.
pub const DEFAULT_HYBRID_PORTS: &[&str] = &["eth1", "eth3"];

/// Addresses requested when converting a bond port to layer 3.
pub const DEFAULT_LAYER3_ADDRESSES: &[AddressRequest] = &[
    AddressRequest::PUBLIC_IPV4,
    AddressRequest::PRIVATE_IPV4,
    AddressRequest::PUBLIC_IPV6,
];

/// Fixed values used by a conversion.
///
/// The defaults match the provider's port layout and must not be changed for
/// real devices. They can be loaded from YAML or overridden in tests:
///
/// ```yaml
/// bond_name: bond0
/// hybrid_ports: [eth1, eth3]
/// layer3_addresses:
///   - address_family: 4
///     public: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    bond_name: String,
    hybrid_ports: Vec<String>,
    layer3_addresses: Vec<AddressRequest>,
}

impl Default for Policy {
    fn default() -> Policy {
        Policy {
            bond_name: DEFAULT_BOND_NAME.to_string(),
            hybrid_ports: DEFAULT_HYBRID_PORTS.iter().map(|s| s.to_string()).collect(),
            layer3_addresses: DEFAULT_LAYER3_ADDRESSES.to_vec(),
        }
    }
}

impl Policy {
    /// Load a policy from a YAML string.
    ///
    /// Missing fields are filled with defaults.
    pub fn from_yaml_str<S: AsRef<str>>(value: S) -> Result<Policy> {
        let policy: Policy = serde_yaml::from_str(value.as_ref())?;
        debug!("Loaded conversion policy {:?}", policy);
        Ok(policy)
    }

    /// Load a policy from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Policy> {
        let path = path.as_ref();
        trace!("Reading conversion policy from {}", path.display());
        let mut value = String::new();
        let _ = File::open(path)?.read_to_string(&mut value)?;
        Policy::from_yaml_str(value)
    }

    /// Use a different bond port name.
    pub fn with_bond_name<S: Into<String>>(mut self, name: S) -> Self {
        self.bond_name = name.into();
        self
    }

    /// Use different port names for the hybrid mode.
    pub fn with_hybrid_ports<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.hybrid_ports = names.into_iter().map(Into::into).collect();
        self
    }

    /// Use a different layer 3 address request.
    pub fn with_layer3_addresses<I>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = AddressRequest>,
    {
        self.layer3_addresses = addresses.into_iter().collect();
        self
    }

    /// Name of the bond port of a device.
    #[inline]
    pub fn bond_name(&self) -> &str {
        &self.bond_name
    }

    /// Ports split out of the bond in the hybrid mode (if present).
    #[inline]
    pub fn hybrid_ports(&self) -> &[String] {
        &self.hybrid_ports
    }

    /// Addresses requested when converting to layer 3.
    #[inline]
    pub fn layer3_addresses(&self) -> &[AddressRequest] {
        &self.layer3_addresses
    }
}
