//! Registry record type
//!
//! One row of the `CARMDI` registry table. Column names are fixed by the
//! upstream database and listed in [`columns`].

use serde::{Deserialize, Serialize};

/// Column names of the registry table.
pub mod columns {
    pub const TABLE: &str = "CARMDI";
    pub const PLATE_NUMBER: &str = "ActualNB";
    pub const PLATE_SUFFIX: &str = "CodeDesc";
    pub const PRODUCTION_YEAR: &str = "PRODDATE";
    pub const GIVEN_NAME: &str = "Prenom";
    pub const FAMILY_NAME: &str = "Nom";
    pub const PHONE: &str = "TelProp";
    pub const MAKE: &str = "MarqueDesc";
    pub const MODEL: &str = "TypeDesc";
    pub const COLOR: &str = "CouleurDesc";
    pub const ADDRESS: &str = "Addresse";
    pub const DATE_OF_BIRTH: &str = "AgeProp";
    pub const BIRTHPLACE: &str = "BirthPlace";

    /// All columns in the order [`super::Record`] declares them.
    pub const ALL: [&str; 12] = [
        PLATE_NUMBER,
        PLATE_SUFFIX,
        PRODUCTION_YEAR,
        GIVEN_NAME,
        FAMILY_NAME,
        PHONE,
        MAKE,
        MODEL,
        COLOR,
        ADDRESS,
        DATE_OF_BIRTH,
        BIRTHPLACE,
    ];
}

/// A vehicle/person registry entry.
///
/// Only the plate number is mandatory. Every other field is `None` when the
/// registry has no value for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub plate_number: String,
    pub plate_suffix: Option<String>,
    pub production_year: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub phone: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub birthplace: Option<String>,
}

impl Record {
    /// Phone number with the separators the registry uses (`/`, `-`, space) removed.
    pub fn normalized_phone(&self) -> Option<String> {
        self.phone.as_ref().map(|phone| {
            phone
                .chars()
                .filter(|c| !matches!(c, '/' | '-' | ' '))
                .collect()
        })
    }

    /// Both name parts, when present.
    pub fn full_name(&self) -> Option<(&str, &str)> {
        match (&self.given_name, &self.family_name) {
            (Some(given), Some(family)) => Some((given.as_str(), family.as_str())),
            _ => None,
        }
    }

    pub fn has_any_name(&self) -> bool {
        self.given_name.is_some() || self.family_name.is_some()
    }
}

/// Builder for creating records
#[derive(Debug, Default)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn new(plate_number: impl Into<String>) -> Self {
        Self {
            record: Record {
                plate_number: plate_number.into(),
                ..Default::default()
            },
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.record.plate_suffix = Some(suffix.into());
        self
    }

    pub fn production_year(mut self, year: impl Into<String>) -> Self {
        self.record.production_year = Some(year.into());
        self
    }

    pub fn given_name(mut self, name: impl Into<String>) -> Self {
        self.record.given_name = Some(name.into());
        self
    }

    pub fn family_name(mut self, name: impl Into<String>) -> Self {
        self.record.family_name = Some(name.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.record.phone = Some(phone.into());
        self
    }

    pub fn make(mut self, make: impl Into<String>) -> Self {
        self.record.make = Some(make.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.record.model = Some(model.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.record.color = Some(color.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.record.address = Some(address.into());
        self
    }

    pub fn date_of_birth(mut self, dob: impl Into<String>) -> Self {
        self.record.date_of_birth = Some(dob.into());
        self
    }

    pub fn birthplace(mut self, place: impl Into<String>) -> Self {
        self.record.birthplace = Some(place.into());
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}
