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

//! Network mode conversion of devices and bonds.

use super::classify::{bond_mode, eth_ports_in_bond, transition_required};
use super::devices::{Device, Port};
use super::operations::PortOperations;
use super::policy::Policy;
use super::recipes::{recipe, Step};
use super::types::NetworkType;
use crate::{DeviceDirectory, Error, ErrorKind, ModeMismatch, Result};

/// Which ports a conversion is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// All physical ports of the device that belong to a bond.
    Device,
    /// Only the members of the converted bond.
    Bond,
}

/// Converts devices between network modes.
///
/// A conversion runs a fixed recipe of port operations for the requested
/// mode, fetching the device between steps and verifying the resulting mode
/// at the end. Conversions are not transactional: if a step fails, the error
/// is returned immediately and the device is left in whatever state the
/// completed steps produced. Since every step is idempotent, simply retry the
/// conversion.
///
/// Conversions of different devices may run concurrently. Running two
/// conversions of the same device concurrently is not supported.
///
/// There is no built-in timeout. Dropping the returned future (for example,
/// via `tokio::time::timeout`) aborts the conversion at the pending remote
/// call, with the same consequences as a failed step.
#[derive(Debug, Clone)]
pub struct Converter<D> {
    directory: D,
    policy: Policy,
}

impl<D: DeviceDirectory> Converter<D> {
    /// Create a converter with the default policy.
    pub fn new(directory: D) -> Converter<D> {
        Converter {
            directory,
            policy: Policy::default(),
        }
    }

    /// Use a different policy.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Policy in use.
    #[inline]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Underlying device directory.
    #[inline]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Idempotent port operations using the same directory and policy.
    #[inline]
    pub fn operations(&self) -> PortOperations<'_, D> {
        PortOperations::new(&self.directory, &self.policy)
    }

    /// Convert the device to the given network mode.
    ///
    /// The device must be a recent snapshot: it is used to decide on the first
    /// step. Returns the device as fetched after the conversion.
    ///
    /// Fails with `NotNeeded` before doing anything if the device is already in
    /// the requested mode (`hybrid-bonded` counts as `layer3`), with
    /// `InvalidInput` if the mode cannot be requested and with
    /// `VerificationFailed` if all steps succeeded but the mode did not change.
    /// Any other error comes from the device directory.
    pub async fn convert(&self, device: &Device, target: NetworkType) -> Result<Device> {
        self.run(device, self.policy.bond_name(), Scope::Device, target)
            .await
    }

    /// Convert one bond of the device to the given network mode.
    ///
    /// Same as [`convert`](#method.convert), but only the given bond port and
    /// its members are touched, and the mode is read off that bond.
    pub async fn convert_bond(
        &self,
        device: &Device,
        bond_name: &str,
        target: NetworkType,
    ) -> Result<Device> {
        self.run(device, bond_name, Scope::Bond, target).await
    }

    async fn run(
        &self,
        device: &Device,
        bond_name: &str,
        scope: Scope,
        target: NetworkType,
    ) -> Result<Device> {
        let initial = bond_mode(device, bond_name)?;
        if !transition_required(initial, target) {
            debug!(
                "No conversion needed for {} of device {}: {} is already {}",
                bond_name,
                device.id(),
                initial,
                target
            );
            return Err(Error::not_needed(device.id(), initial));
        }

        let steps = recipe(target).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidInput,
                format!("Network mode {} cannot be requested", target),
            )
        })?;

        info!(
            "Converting {} of device {} from {} to {}",
            bond_name,
            device.id(),
            initial,
            target
        );

        let mut current = device.clone();
        for step in steps {
            trace!("Device {}: {}", device.id(), step);
            if let Err(err) = self.run_step(&mut current, bond_name, scope, *step).await {
                warn!(
                    "Conversion of device {} to {} aborted at step '{}': {}",
                    device.id(),
                    target,
                    step,
                    err
                );
                return Err(err);
            }
        }

        let result = self.directory.get_device(device.id()).await?;
        let observed = bond_mode(&result, bond_name)?;
        if transition_required(observed, target) {
            let mismatch = ModeMismatch {
                initial,
                target,
                observed,
            };
            warn!(
                "Device {} ended up in {} instead of {}",
                device.id(),
                observed,
                target
            );
            return Err(Error::verification_failed(device.id(), mismatch));
        }

        info!("Device {} is now in {}", device.id(), observed);
        Ok(result)
    }

    async fn run_step(
        &self,
        current: &mut Device,
        bond_name: &str,
        scope: Scope,
        step: Step,
    ) -> Result<()> {
        let ops = self.operations();
        match step {
            Step::Refresh => {
                let refreshed = self.directory.get_device(current.id()).await?;
                *current = refreshed;
            }
            Step::BondToLayer2 => {
                let _ = ops.to_layer2(current, bond_name).await?;
            }
            Step::BondToLayer3 => {
                let _ = ops.to_layer3(current, bond_name).await?;
            }
            Step::DisbondMembers => {
                for port in eth_ports_in_bond(current, bond_name) {
                    let _ = ops.disbond(port, false).await?;
                }
            }
            Step::BondAll => {
                for port in self.ports_in_scope(current, bond_name, scope) {
                    let _ = ops.bond(port, false).await?;
                }
            }
            Step::DisbondHybridPorts => {
                let ports = self.ports_in_scope(current, bond_name, scope);
                for name in self.policy.hybrid_ports() {
                    if let Some(port) = ports.iter().find(|p| p.name() == name) {
                        let _ = ops.disbond(port, false).await?;
                    } else {
                        trace!("Hybrid port {} is not present on {}", name, current.id());
                    }
                }
            }
        }
        Ok(())
    }

    fn ports_in_scope<'d>(&self, device: &'d Device, bond_name: &str, scope: Scope) -> Vec<&'d Port> {
        match scope {
            // Ports without a bond cannot be bonded.
            Scope::Device => device
                .physical_ports()
                .filter(|p| p.bond_name().is_some())
                .collect(),
            Scope::Bond => eth_ports_in_bond(device, bond_name),
        }
    }
}
