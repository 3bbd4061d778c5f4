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

//! Conversion recipes.

use std::fmt;

use super::types::NetworkType;

/// A single step of a conversion recipe.
///
/// Port steps act on the latest device snapshot and issue one call per port
/// that needs it, never in bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Disbond every port that is a member of the bond.
    DisbondMembers,
    /// Convert the bond port to layer 3.
    BondToLayer3,
    /// Convert the bond port to layer 2.
    BondToLayer2,
    /// Fetch the device again.
    ///
    /// Every mutating step is followed by a refresh, since the provider also
    /// changes sibling ports. Disbonding the last member drops the layer 3
    /// addressing of the bond: without a refresh the layer 3 conversion would
    /// still see `hybrid` and skip itself.
    Refresh,
    /// Bond every physical port that belongs to a bond.
    BondAll,
    /// Disbond the hybrid ports (`eth1` and `eth3` by default) that exist.
    DisbondHybridPorts,
}

const TO_LAYER3: &[Step] = &[
    Step::DisbondMembers,
    Step::Refresh,
    Step::BondToLayer3,
    Step::Refresh,
    Step::BondAll,
];

const TO_HYBRID: &[Step] = &[
    Step::DisbondMembers,
    Step::Refresh,
    Step::BondToLayer3,
    Step::Refresh,
    Step::DisbondHybridPorts,
];

const TO_LAYER2_INDIVIDUAL: &[Step] = &[Step::BondToLayer2, Step::Refresh, Step::DisbondMembers];

const TO_LAYER2_BONDED: &[Step] = &[Step::BondToLayer2, Step::Refresh, Step::BondAll];

/// Recipe to reach the given network mode from any other mode.
///
/// Returns `None` for modes that cannot be requested (`hybrid-bonded`).
pub fn recipe(target: NetworkType) -> Option<&'static [Step]> {
    match target {
        NetworkType::Layer3 => Some(TO_LAYER3),
        NetworkType::Hybrid => Some(TO_HYBRID),
        NetworkType::Layer2Individual => Some(TO_LAYER2_INDIVIDUAL),
        NetworkType::Layer2Bonded => Some(TO_LAYER2_BONDED),
        NetworkType::HybridBonded => None,
    }
}

impl Step {
    /// Whether the step may change the remote state.
    #[inline]
    pub fn is_mutating(&self) -> bool {
        *self != Step::Refresh
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Step::DisbondMembers => "disbond bond members",
            Step::BondToLayer3 => "convert bond to layer 3",
            Step::BondToLayer2 => "convert bond to layer 2",
            Step::Refresh => "refresh device",
            Step::BondAll => "bond all ports",
            Step::DisbondHybridPorts => "disbond hybrid ports",
        })
    }
}
