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

//! JSON structures and protocol bits for device ports.

#![allow(missing_docs)]

use macaddr::MacAddr6;

use super::devices::Port as PortWrapper;
use super::types::{NetworkAttachment, NetworkType, PortType};

/// Provider-specific port data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortData {
    #[serde(default)]
    pub bonded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bond: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::utils::deser_opt_mac",
        serialize_with = "crate::utils::ser_opt_mac",
        skip_serializing_if = "Option::is_none"
    )]
    pub mac: Option<MacAddr6>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub port_type: PortType,
    pub network_type: NetworkType,
    #[serde(default)]
    pub data: PortData,
    #[serde(default)]
    pub disbond_operation_supported: bool,
    #[serde(default)]
    pub virtual_networks: Vec<NetworkAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default)]
    pub network_ports: Vec<PortWrapper>,
}
