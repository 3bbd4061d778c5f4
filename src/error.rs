// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Error and Result implementations.

use std::fmt;

use crate::network::NetworkType;

/// Kind of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The device is already in the requested network mode.
    ///
    /// Returned before any remote call is made. Callers should treat it as
    /// a successful no-op.
    NotNeeded,

    /// All conversion steps succeeded, but the device did not end up in the
    /// requested network mode.
    ///
    /// Use [`Error::mismatch`] to get the observed modes.
    VerificationFailed,

    /// Authentication failure.
    ///
    /// Maps to HTTP 401.
    AuthenticationFailed,

    /// Access denied.
    ///
    /// Maps to HTTP 403.
    AccessDenied,

    /// Requested resource was not found.
    ///
    /// Roughly maps to HTTP 404 and 410.
    ResourceNotFound,

    /// Invalid value passed to one of parameters.
    InvalidInput,

    /// Conflict in the request.
    ///
    /// Maps to HTTP 409, e.g. when bonding an already bonded port.
    Conflict,

    /// Operation has reached the specified time out.
    OperationTimedOut,

    /// Protocol-level error reported by the underlying HTTP library.
    ProtocolError,

    /// Response received from the server is malformed.
    InvalidResponse,

    /// Internal server error.
    ///
    /// Maps to HTTP 5xx codes.
    InternalServerError,
}

/// Network modes involved in a conversion that did not take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeMismatch {
    /// Mode observed before the conversion started.
    pub initial: NetworkType,
    /// Requested mode.
    pub target: NetworkType,
    /// Mode observed after the conversion finished.
    pub observed: NetworkType,
}

/// Error from a device directory call or a conversion.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    mismatch: Option<ModeMismatch>,
}

/// Result of a device directory call or a conversion.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Create an error with a message.
    ///
    /// Device directory implementations use it to report failures of their
    /// transport.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            message: Some(message.into()),
            mismatch: None,
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Error message (if any).
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Modes observed by a conversion that did not take effect.
    ///
    /// Only set for errors of kind `VerificationFailed`.
    #[inline]
    pub fn mismatch(&self) -> Option<ModeMismatch> {
        self.mismatch
    }

    /// Whether the error came from a failed remote call.
    #[inline]
    pub fn is_remote_failure(&self) -> bool {
        self.kind.is_remote_failure()
    }

    pub(crate) fn not_needed<D: fmt::Display>(device_id: D, mode: NetworkType) -> Error {
        Error::new(
            ErrorKind::NotNeeded,
            format!("Device {} is already in network mode {}", device_id, mode),
        )
    }

    pub(crate) fn verification_failed<D: fmt::Display>(
        device_id: D,
        mismatch: ModeMismatch,
    ) -> Error {
        Error {
            kind: ErrorKind::VerificationFailed,
            message: Some(format!(
                "Conversion of device {} from {} to {} did not take effect, observed {}",
                device_id, mismatch.initial, mismatch.target, mismatch.observed
            )),
            mismatch: Some(mismatch),
        }
    }
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::NotNeeded => "Device is already in the requested network mode",
            ErrorKind::VerificationFailed => "Network mode conversion did not take effect",
            ErrorKind::AuthenticationFailed => "Failed to authenticate",
            ErrorKind::AccessDenied => "Access to the resource is denied",
            ErrorKind::ResourceNotFound => "Requested resource was not found",
            ErrorKind::InvalidInput => "Input value(s) are invalid or missing",
            ErrorKind::Conflict => "Requested cannot be fulfilled due to a conflict",
            ErrorKind::OperationTimedOut => "Time out reached while waiting for the operation",
            ErrorKind::ProtocolError => "Error when accessing the server",
            ErrorKind::InvalidResponse => "Received invalid response",
            ErrorKind::InternalServerError => "Internal server error or bad gateway",
        }
    }

    /// Whether this kind is reported by the device directory.
    pub fn is_remote_failure(&self) -> bool {
        !matches!(
            self,
            ErrorKind::NotNeeded | ErrorKind::VerificationFailed | ErrorKind::InvalidInput
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(ref msg) = self.message {
            write!(f, ": {}", msg)
        } else {
            Ok(())
        }
    }
}

impl ::std::error::Error for Error {}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Error {
        Error::new(ErrorKind::InvalidInput, value.to_string())
    }
}

impl From<::std::io::Error> for Error {
    fn from(value: ::std::io::Error) -> Error {
        Error::new(ErrorKind::InvalidInput, value.to_string())
    }
}
