// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Various utilities.

use std::str::FromStr;

use macaddr::MacAddr6;
use serde::de::Error as DeserError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Define a string-based enum used in the provider protocol.
///
/// Unknown values are rejected on deserialization.
macro_rules! protocol_enum {
    {$(#[$attr:meta])* enum $name:ident {
        $($(#[$iattr:meta])* $item:ident = $val:literal),+
    }} => (
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$iattr])* $item),+,
        }

        impl $name {
            /// All known values.
            pub const ALL: &'static [$name] = &[$($name::$item),+];

            /// String representation used in the protocol.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$item => $val),+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::Error;

            fn from_str(value: &str) -> $crate::Result<$name> {
                match value {
                    $($val => Ok($name::$item)),+,
                    other => Err($crate::Error::new(
                        $crate::ErrorKind::InvalidInput,
                        format!("Unexpected {}: {}", stringify!($name), other),
                    )),
                }
            }
        }

        impl<'de> ::serde::de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<$name, D::Error>
            where
                D: ::serde::de::Deserializer<'de>,
            {
                let value: String = ::serde::de::Deserialize::deserialize(deserializer)?;
                value.parse().map_err(::serde::de::Error::custom)
            }
        }

        impl ::serde::ser::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::ser::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    );
}

/// Generate an accessor for a field of the inner protocol structure.
macro_rules! transparent_property {
    ($(#[$attr:meta])* $name:ident: ref $type:ty) => (
        $(#[$attr])*
        #[inline]
        pub fn $name(&self) -> &$type {
            &self.inner.$name
        }
    );

    ($(#[$attr:meta])* $name:ident: $type:ty) => (
        $(#[$attr])*
        #[inline]
        pub fn $name(&self) -> $type {
            self.inner.$name
        }
    );
}

/// Deserialize an optional MAC address from its string form.
pub fn deser_opt_mac<'de, D>(des: D) -> ::std::result::Result<Option<MacAddr6>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Deserialize::deserialize(des)?;
    match value {
        Some(s) => MacAddr6::from_str(&s)
            .map_err(DeserError::custom)
            .map(Some),
        None => Ok(None),
    }
}

/// Serialize an optional MAC address in its string form.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn ser_opt_mac<S>(value: &Option<MacAddr6>, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.map(|m| m.to_string()).serialize(serializer)
}

/// Check that a value is equal to its type's default (for serialization).
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
