//! Domain value objects carrying PII in plaintext.
//!
//! These types never reach storage directly; [`crate::mapper`] converts them
//! to and from the encrypted records in [`common::record`].

pub mod demographics;
pub mod device;

pub use demographics::{
    City, DemographicsView, Gender, HouseholdSize, Occupation, UserDemographics, YearOfBirth,
};
pub use device::{Device, Platform};

use thiserror::Error;

/// A string did not name a known value of a domain enumeration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognised {kind}: {value}")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
