//! The contract between the endpoint and the configuration it exposes.

use std::fmt::Display;

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};

/// A configuration value that can be exposed by a [`ConfigEndpoint`].
///
/// The endpoint never writes into the live value directly. Incoming payloads
/// are decoded into a fresh instance, checked with [`validate`], and only then
/// handed to [`update`] on a private copy of the live value.
///
/// [`ConfigEndpoint`]: crate::endpoint::ConfigEndpoint
/// [`validate`]: LiveConfig::validate
/// [`update`]: LiveConfig::update
pub trait LiveConfig:
    Serialize + DeserializeOwned + JsonSchema + Clone + Send + Sync + 'static
{
    /// Error returned by validation and update.
    type Error: Display;

    /// Check the value's semantic constraints.
    fn validate(&self) -> Result<(), Self::Error>;

    /// Apply `candidate` to `self`.
    ///
    /// `candidate` has already passed [`LiveConfig::validate`]. An error here
    /// leaves the published configuration untouched.
    fn update(&mut self, candidate: Self) -> Result<(), Self::Error>;

    /// Template used as the decode target for incoming payloads.
    ///
    /// Fields missing from a payload keep the template's values. Returning
    /// `None` decodes payloads on their own, so every required field must be
    /// present.
    fn create_new(&self) -> Option<Self> {
        None
    }
}
