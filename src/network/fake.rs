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

//! Simulated device directory for tests.
//!
//! Models the provider side effects the conversion relies on: converting a
//! bond to layer 3 bonds all its members back, disbonding the last member
//! drops the layer 3 addressing, and the mode of a bond is derived from the
//! state of its members.

#![allow(missing_debug_implementations)]

use std::future;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::devices::{Device, Port};
use super::types::{AddressRequest, NetworkAttachment, NetworkType, PortType};
use crate::{DeviceDirectory, Error, ErrorKind, Result};

/// A recorded directory call, with ports identified by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetDevice(String),
    GetPort(String, String),
    Bond(String, bool),
    Disbond(String, bool),
    ConvertToLayer2(String),
    ConvertToLayer3(String, Vec<AddressRequest>),
    AssignNetwork(String, String, bool),
    UnassignNetwork(String, String),
}

struct SimBond {
    name: String,
    layer3: bool,
    networks: Vec<NetworkAttachment>,
}

struct SimEth {
    name: String,
    bond: Option<String>,
    bonded: bool,
    networks: Vec<NetworkAttachment>,
}

struct State {
    device_id: String,
    bonds: Vec<SimBond>,
    eths: Vec<SimEth>,
    calls: Vec<Call>,
    fail_at: Option<usize>,
    hold_at: Option<usize>,
    ignore_conversions: bool,
}

#[derive(Clone)]
pub struct FakeDirectory {
    state: Arc<Mutex<State>>,
}

fn port_id(name: &str) -> String {
    format!("port-{}", name)
}

impl State {
    fn record(&mut self, call: Call) -> Result<()> {
        self.calls.push(call);
        if self.fail_at == Some(self.calls.len() - 1) {
            // Fail only once, so that a retry can proceed.
            self.fail_at = None;
            return Err(Error::new(
                ErrorKind::InternalServerError,
                format!("Injected failure at call {}", self.calls.len() - 1),
            ));
        }
        Ok(())
    }

    fn name_of(&self, port_id: &str) -> Result<String> {
        self.bonds
            .iter()
            .map(|b| &b.name)
            .chain(self.eths.iter().map(|e| &e.name))
            .find(|name| self::port_id(name) == port_id)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::ResourceNotFound, format!("No port {}", port_id)))
    }

    fn bond_index(&self, name: &str) -> Option<usize> {
        self.bonds.iter().position(|b| b.name == name)
    }

    fn eth_index(&self, name: &str) -> Option<usize> {
        self.eths.iter().position(|e| e.name == name)
    }

    fn bond_mode(&self, bond: &SimBond) -> NetworkType {
        let members: Vec<_> = self
            .eths
            .iter()
            .filter(|e| e.bond.as_deref() == Some(bond.name.as_str()))
            .collect();
        let bonded = members.iter().filter(|e| e.bonded).count();
        if bonded == 0 && !members.is_empty() {
            NetworkType::Layer2Individual
        } else if !bond.layer3 {
            if bonded == members.len() {
                NetworkType::Layer2Bonded
            } else {
                NetworkType::Layer2Individual
            }
        } else if bonded == members.len() {
            if bond.networks.is_empty() {
                NetworkType::Layer3
            } else {
                NetworkType::HybridBonded
            }
        } else {
            NetworkType::Hybrid
        }
    }

    fn set_bonded(&mut self, name: &str, bonded: bool, bulk: bool) -> Result<()> {
        if let Some(idx) = self.bond_index(name) {
            let bond_name = self.bonds[idx].name.clone();
            for eth in self.eths.iter_mut() {
                if eth.bond.as_deref() == Some(bond_name.as_str()) {
                    eth.bonded = bonded;
                }
            }
            self.after_membership_change(&bond_name);
            return Ok(());
        }

        let idx = self
            .eth_index(name)
            .ok_or_else(|| Error::new(ErrorKind::ResourceNotFound, name.to_string()))?;
        if self.eths[idx].bonded == bonded {
            return Err(Error::new(
                ErrorKind::Conflict,
                format!("Port {} bonded state is already {}", name, bonded),
            ));
        }
        let bond_name = self.eths[idx]
            .bond
            .clone()
            .ok_or_else(|| Error::new(ErrorKind::Conflict, format!("Port {} has no bond", name)))?;

        self.eths[idx].bonded = bonded;
        if bulk {
            for eth in self.eths.iter_mut() {
                if eth.bond.as_deref() == Some(bond_name.as_str()) {
                    eth.bonded = bonded;
                }
            }
        }
        self.after_membership_change(&bond_name);
        Ok(())
    }

    fn after_membership_change(&mut self, bond_name: &str) {
        let any_bonded = self
            .eths
            .iter()
            .any(|e| e.bond.as_deref() == Some(bond_name) && e.bonded);
        if !any_bonded {
            if let Some(idx) = self.bond_index(bond_name) {
                self.bonds[idx].layer3 = false;
            }
        }
    }

    fn convert(&mut self, name: &str, layer3: bool) -> Result<()> {
        let idx = self.bond_index(name).ok_or_else(|| {
            Error::new(
                ErrorKind::Conflict,
                format!("Only bond ports can be converted, got {}", name),
            )
        })?;
        if self.ignore_conversions {
            return Ok(());
        }

        self.bonds[idx].layer3 = layer3;
        if layer3 {
            let bond_name = self.bonds[idx].name.clone();
            for eth in self.eths.iter_mut() {
                if eth.bond.as_deref() == Some(bond_name.as_str()) {
                    eth.bonded = true;
                }
            }
        }
        Ok(())
    }

    fn networks_mut(&mut self, name: &str) -> Result<&mut Vec<NetworkAttachment>> {
        if let Some(idx) = self.bond_index(name) {
            Ok(&mut self.bonds[idx].networks)
        } else if let Some(idx) = self.eth_index(name) {
            Ok(&mut self.eths[idx].networks)
        } else {
            Err(Error::new(ErrorKind::ResourceNotFound, name.to_string()))
        }
    }

    fn port(&self, name: &str) -> Port {
        if let Some(bond) = self.bonds.iter().find(|b| b.name == name) {
            let mode = self.bond_mode(bond);
            return bond
                .networks
                .iter()
                .cloned()
                .fold(
                    Port::new(port_id(name), name, PortType::Bond, mode).with_bonded(true),
                    Port::with_virtual_network,
                );
        }

        let eth = self
            .eths
            .iter()
            .find(|e| e.name == name)
            .expect("port exists");
        let mode = match eth.bond {
            Some(ref bond_name) if eth.bonded => {
                let bond = self
                    .bonds
                    .iter()
                    .find(|b| &b.name == bond_name)
                    .expect("bond exists");
                self.bond_mode(bond)
            }
            _ => NetworkType::Layer2Individual,
        };
        let mut port = Port::new(port_id(name), name, PortType::Physical, mode).with_bonded(eth.bonded);
        if let Some(ref bond_name) = eth.bond {
            port = port.with_bond(bond_name.clone());
        }
        eth.networks
            .iter()
            .cloned()
            .fold(port, Port::with_virtual_network)
    }

    fn device(&self) -> Device {
        let names = self
            .bonds
            .iter()
            .map(|b| b.name.as_str())
            .chain(self.eths.iter().map(|e| e.name.as_str()));
        Device::new(self.device_id.clone(), names.map(|n| self.port(n)).collect::<Vec<_>>())
    }
}

impl FakeDirectory {
    /// A device with `bond0` and `eth0`, `eth1`, ... members.
    pub fn new(device_id: &str, layer3: bool, bonded: &[bool]) -> FakeDirectory {
        let eths = bonded
            .iter()
            .enumerate()
            .map(|(idx, bonded)| SimEth {
                name: format!("eth{}", idx),
                bond: Some("bond0".to_string()),
                bonded: *bonded,
                networks: Vec::new(),
            })
            .collect();
        FakeDirectory::from_state(State {
            device_id: device_id.to_string(),
            bonds: vec![SimBond {
                name: "bond0".to_string(),
                layer3,
                networks: Vec::new(),
            }],
            eths,
            calls: Vec::new(),
            fail_at: None,
            hold_at: None,
            ignore_conversions: false,
        })
    }

    pub fn layer3(device_id: &str) -> FakeDirectory {
        FakeDirectory::new(device_id, true, &[true, true])
    }

    pub fn hybrid(device_id: &str) -> FakeDirectory {
        FakeDirectory::new(device_id, true, &[true, false])
    }

    pub fn hybrid_bonded(device_id: &str, network_id: &str) -> FakeDirectory {
        let result = FakeDirectory::layer3(device_id);
        result.lock().bonds[0]
            .networks
            .push(NetworkAttachment::tagged(network_id));
        result
    }

    pub fn layer2_bonded(device_id: &str) -> FakeDirectory {
        FakeDirectory::new(device_id, false, &[true, true])
    }

    pub fn layer2_individual(device_id: &str) -> FakeDirectory {
        FakeDirectory::new(device_id, false, &[false, false])
    }

    /// `bond0` with `eth0`/`eth1` and `bond1` with `eth2`/`eth3`, all layer 3.
    pub fn two_bonds(device_id: &str) -> FakeDirectory {
        let result = FakeDirectory::new(device_id, true, &[true, true, true, true]);
        {
            let mut state = result.lock();
            state.bonds.push(SimBond {
                name: "bond1".to_string(),
                layer3: true,
                networks: Vec::new(),
            });
            for eth in state.eths.iter_mut().skip(2) {
                eth.bond = Some("bond1".to_string());
            }
        }
        result
    }

    /// Add a physical port that does not belong to any bond.
    pub fn with_standalone_port(self, name: &str) -> FakeDirectory {
        self.lock().eths.push(SimEth {
            name: name.to_string(),
            bond: None,
            bonded: false,
            networks: Vec::new(),
        });
        self
    }

    /// Fail the call with the given index (starting with 0) once.
    pub fn fail_at(self, index: usize) -> FakeDirectory {
        self.lock().fail_at = Some(index);
        self
    }

    /// Never complete the call with the given index (starting with 0).
    ///
    /// The call is recorded, but its effect is not applied. Only the first
    /// matching call is held.
    pub fn hold_at(self, index: usize) -> FakeDirectory {
        self.lock().hold_at = Some(index);
        self
    }

    /// Accept conversion calls without changing anything.
    pub fn ignore_conversions(self) -> FakeDirectory {
        self.lock().ignore_conversions = true;
        self
    }

    /// Current state without recording a call.
    pub fn snapshot(&self) -> Device {
        self.lock().device()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Record a call, failing or suspending it if requested.
    async fn enter(&self, call: Call) -> Result<()> {
        let held = {
            let mut state = self.lock();
            state.record(call)?;
            let held = state.hold_at == Some(state.calls.len() - 1);
            if held {
                state.hold_at = None;
            }
            held
        };
        if held {
            future::pending::<()>().await;
        }
        Ok(())
    }

    fn from_state(state: State) -> FakeDirectory {
        FakeDirectory {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("state lock is not poisoned")
    }
}

#[async_trait]
impl DeviceDirectory for FakeDirectory {
    async fn get_device(&self, device_id: &str) -> Result<Device> {
        self.enter(Call::GetDevice(device_id.to_string())).await?;
        let state = self.lock();
        if device_id != state.device_id {
            return Err(Error::new(
                ErrorKind::ResourceNotFound,
                format!("No device {}", device_id),
            ));
        }
        Ok(state.device())
    }

    async fn get_port(&self, device_id: &str, name: &str) -> Result<Port> {
        self.enter(Call::GetPort(device_id.to_string(), name.to_string()))
            .await?;
        self.lock()
            .device()
            .port(name)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::ResourceNotFound, name.to_string()))
    }

    async fn bond(&self, port_id: &str, bulk: bool) -> Result<Port> {
        let name = self.lock().name_of(port_id)?;
        self.enter(Call::Bond(name.clone(), bulk)).await?;
        let mut state = self.lock();
        state.set_bonded(&name, true, bulk)?;
        Ok(state.port(&name))
    }

    async fn disbond(&self, port_id: &str, bulk: bool) -> Result<Port> {
        let name = self.lock().name_of(port_id)?;
        self.enter(Call::Disbond(name.clone(), bulk)).await?;
        let mut state = self.lock();
        state.set_bonded(&name, false, bulk)?;
        Ok(state.port(&name))
    }

    async fn convert_to_layer2(&self, port_id: &str) -> Result<Port> {
        let name = self.lock().name_of(port_id)?;
        self.enter(Call::ConvertToLayer2(name.clone())).await?;
        let mut state = self.lock();
        state.convert(&name, false)?;
        Ok(state.port(&name))
    }

    async fn convert_to_layer3(
        &self,
        port_id: &str,
        addresses: &[AddressRequest],
    ) -> Result<Port> {
        let name = self.lock().name_of(port_id)?;
        self.enter(Call::ConvertToLayer3(name.clone(), addresses.to_vec()))
            .await?;
        let mut state = self.lock();
        state.convert(&name, true)?;
        Ok(state.port(&name))
    }

    async fn assign_network(
        &self,
        port_id: &str,
        network_id: &str,
        native: bool,
    ) -> Result<Port> {
        let name = self.lock().name_of(port_id)?;
        self.enter(Call::AssignNetwork(
            name.clone(),
            network_id.to_string(),
            native,
        ))
        .await?;
        let mut state = self.lock();
        let networks = state.networks_mut(&name)?;
        networks.retain(|n| n.id != network_id);
        networks.push(if native {
            NetworkAttachment::native(network_id)
        } else {
            NetworkAttachment::tagged(network_id)
        });
        Ok(state.port(&name))
    }

    async fn unassign_network(&self, port_id: &str, network_id: &str) -> Result<Port> {
        let name = self.lock().name_of(port_id)?;
        self.enter(Call::UnassignNetwork(name.clone(), network_id.to_string()))
            .await?;
        let mut state = self.lock();
        state.networks_mut(&name)?.retain(|n| n.id != network_id);
        Ok(state.port(&name))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::network::classify::bond_mode;

    #[test]
    fn test_modes() {
        let cases = [
            (FakeDirectory::layer3("d"), NetworkType::Layer3),
            (FakeDirectory::hybrid("d"), NetworkType::Hybrid),
            (
                FakeDirectory::hybrid_bonded("d", "vlan-1"),
                NetworkType::HybridBonded,
            ),
            (FakeDirectory::layer2_bonded("d"), NetworkType::Layer2Bonded),
            (
                FakeDirectory::layer2_individual("d"),
                NetworkType::Layer2Individual,
            ),
        ];
        for (fake, mode) in cases {
            assert_eq!(bond_mode(&fake.snapshot(), "bond0").unwrap(), mode);
        }
    }

    #[tokio::test]
    async fn test_bonding_bonded_port_conflicts() {
        let fake = FakeDirectory::layer3("d");
        let err = fake.bond(&port_id("eth0"), false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_bulk_disbond() {
        let fake = FakeDirectory::layer2_bonded("d");
        let _ = fake.disbond(&port_id("eth0"), true).await.unwrap();
        assert!(fake.snapshot().physical_ports().all(|p| !p.is_bonded()));
    }

    #[tokio::test]
    async fn test_get_port() {
        let fake = FakeDirectory::layer3("d");
        let port = fake.get_port("d", "eth1").await.unwrap();
        assert_eq!(port.id(), "port-eth1");
        let err = fake.get_port("d", "eth9").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    }
}
