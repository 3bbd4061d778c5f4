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

//! Network topology management for bare metal cloud devices.
//!
//! A bare metal device exposes its physical ports (`eth0`, `eth1`, ...) and a
//! bond aggregation port (`bond0`). This crate drives such a device from one
//! network mode (for example, bonded layer 3) to another (for example,
//! individual layer 2 ports) by issuing an ordered sequence of remote port
//! operations, re-reading the device between steps and verifying the result.
//!
//! The HTTP API itself is not part of this crate: callers plug their API client
//! in by implementing [`DeviceDirectory`].
//!
//! # Example
//!
//! ```rust,no_run
//! use metal_network::network::{Converter, NetworkType};
//! use metal_network::DeviceDirectory;
//!
//! async fn make_layer2<D: DeviceDirectory>(directory: D, device_id: &str)
//!         -> metal_network::Result<()> {
//!     let device = directory.get_device(device_id).await?;
//!     let converter = Converter::new(directory);
//!     match converter.convert(&device, NetworkType::Layer2Individual).await {
//!         Ok(device) => println!("Device {} converted", device.id()),
//!         Err(e) if e.kind() == metal_network::ErrorKind::NotNeeded => (),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```

// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
#![deny(
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    overflowing_literals,
    path_statements,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_extern_crates,
    unused_import_braces,
    unused_parens,
    while_true
)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

#[macro_use]
mod utils;

mod directory;
mod error;
pub mod network;

pub use crate::directory::DeviceDirectory;
pub use crate::error::{Error, ErrorKind, ModeMismatch, Result};
