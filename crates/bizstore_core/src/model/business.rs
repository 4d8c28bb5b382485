//! Business hierarchy domain model.
//!
//! # Responsibility
//! - Define country/province/locality/address/branch/company records.
//! - Expose each record to entity stores through [`Entity`].
//!
//! # Invariants
//! - Relations are foreign-key ids, never owned or shared references.
//! - `TimeOfDay` is always a valid wall-clock time (`hour < 24`, `minute < 60`).
//! - A branch closes strictly after it opens.

use crate::model::entity::{Entity, EntityId, FieldValue};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for business records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    InvalidTimeOfDay { hour: u8, minute: u8 },
    MalformedTimeOfDay(String),
    InvalidOpeningHours { opens: TimeOfDay, closes: TimeOfDay },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeOfDay { hour, minute } => {
                write!(f, "invalid time of day {hour:02}:{minute:02}")
            }
            Self::MalformedTimeOfDay(raw) => {
                write!(f, "time of day must be formatted as HH:MM, got `{raw}`")
            }
            Self::InvalidOpeningHours { opens, closes } => {
                write!(f, "closing time ({closes}) must be after opening time ({opens})")
            }
        }
    }
}

impl Error for ModelValidationError {}

/// Wall-clock time with minute precision, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ModelValidationError> {
        if hour >= 24 || minute >= 60 {
            return Err(ModelValidationError::InvalidTimeOfDay { hour, minute });
        }
        Ok(Self { hour, minute })
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ModelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let malformed = || ModelValidationError::MalformedTimeOfDay(value.clone());
        let (hour, minute) = value.split_once(':').ok_or_else(malformed)?;
        let is_two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !is_two_digits(hour) || !is_two_digits(minute) {
            return Err(malformed());
        }
        let hour = hour.parse::<u8>().map_err(|_| malformed())?;
        let minute = minute.parse::<u8>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: Option<EntityId>,
    pub name: String,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl Entity for Country {
    const KIND: &'static str = "country";
    const FIELDS: &'static [&'static str] = &["id", "name"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "name" => Some(self.name.clone().into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: Option<EntityId>,
    pub name: String,
    pub country_id: EntityId,
}

impl Province {
    pub fn new(name: impl Into<String>, country_id: EntityId) -> Self {
        Self {
            id: None,
            name: name.into(),
            country_id,
        }
    }
}

impl Entity for Province {
    const KIND: &'static str = "province";
    const FIELDS: &'static [&'static str] = &["id", "name", "country_id"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "name" => Some(self.name.clone().into()),
            "country_id" => Some(FieldValue::Id(self.country_id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub id: Option<EntityId>,
    pub name: String,
    pub province_id: EntityId,
}

impl Locality {
    pub fn new(name: impl Into<String>, province_id: EntityId) -> Self {
        Self {
            id: None,
            name: name.into(),
            province_id,
        }
    }
}

impl Entity for Locality {
    const KIND: &'static str = "locality";
    const FIELDS: &'static [&'static str] = &["id", "name", "province_id"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "name" => Some(self.name.clone().into()),
            "province_id" => Some(FieldValue::Id(self.province_id)),
            _ => None,
        }
    }
}

/// Street address inside one locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: Option<EntityId>,
    pub street: String,
    pub number: u32,
    pub postal_code: u32,
    pub floor: Option<u32>,
    pub apartment: Option<u32>,
    pub locality_id: EntityId,
}

impl Address {
    /// Creates a street-level address with no floor or apartment.
    pub fn new(
        street: impl Into<String>,
        number: u32,
        postal_code: u32,
        locality_id: EntityId,
    ) -> Self {
        Self {
            id: None,
            street: street.into(),
            number,
            postal_code,
            floor: None,
            apartment: None,
            locality_id,
        }
    }

    pub fn with_unit(mut self, floor: u32, apartment: u32) -> Self {
        self.floor = Some(floor);
        self.apartment = Some(apartment);
        self
    }
}

impl Entity for Address {
    const KIND: &'static str = "address";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "street",
        "number",
        "postal_code",
        "floor",
        "apartment",
        "locality_id",
    ];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "street" => Some(self.street.clone().into()),
            "number" => Some(self.number.into()),
            "postal_code" => Some(self.postal_code.into()),
            "floor" => self.floor.map(FieldValue::from),
            "apartment" => self.apartment.map(FieldValue::from),
            "locality_id" => Some(FieldValue::Id(self.locality_id)),
            _ => None,
        }
    }
}

/// Company branch with its opening hours.
///
/// `company_id` stays `None` until the branch is assigned to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: Option<EntityId>,
    pub name: String,
    pub opening_time: TimeOfDay,
    pub closing_time: TimeOfDay,
    pub is_head_office: bool,
    pub address_id: EntityId,
    pub company_id: Option<EntityId>,
}

impl Branch {
    pub fn new(
        name: impl Into<String>,
        opening_time: TimeOfDay,
        closing_time: TimeOfDay,
        address_id: EntityId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            opening_time,
            closing_time,
            is_head_office: false,
            address_id,
            company_id: None,
        }
    }

    pub fn head_office(mut self) -> Self {
        self.is_head_office = true;
        self
    }

    /// Checks the opening-hours window.
    ///
    /// # Errors
    /// - `InvalidOpeningHours` when the branch does not close after it opens.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.closing_time <= self.opening_time {
            return Err(ModelValidationError::InvalidOpeningHours {
                opens: self.opening_time,
                closes: self.closing_time,
            });
        }
        Ok(())
    }
}

impl Entity for Branch {
    const KIND: &'static str = "branch";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "opening_time",
        "closing_time",
        "is_head_office",
        "address_id",
        "company_id",
    ];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "name" => Some(self.name.clone().into()),
            "opening_time" => Some(self.opening_time.into()),
            "closing_time" => Some(self.closing_time.into()),
            "is_head_office" => Some(self.is_head_office.into()),
            "address_id" => Some(FieldValue::Id(self.address_id)),
            "company_id" => self.company_id.map(FieldValue::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: Option<EntityId>,
    pub name: String,
    /// Registered legal name ("razón social").
    pub legal_name: String,
    /// Argentine tax id, eleven digits.
    pub cuil: i64,
}

impl Company {
    pub fn new(name: impl Into<String>, legal_name: impl Into<String>, cuil: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            legal_name: legal_name.into(),
            cuil,
        }
    }
}

impl Entity for Company {
    const KIND: &'static str = "company";
    const FIELDS: &'static [&'static str] = &["id", "name", "legal_name", "cuil"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(FieldValue::Id),
            "name" => Some(self.name.clone().into()),
            "legal_name" => Some(self.legal_name.clone().into()),
            "cuil" => Some(self.cuil.into()),
            _ => None,
        }
    }
}

struct IdLabel(Option<EntityId>);

impl Display for IdLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(id) => write!(f, "#{id}"),
            None => write!(f, "#-"),
        }
    }
}

impl Display for Country {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Country {} {}", IdLabel(self.id), self.name)
    }
}

impl Display for Province {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Province {} {} (country #{})",
            IdLabel(self.id),
            self.name,
            self.country_id
        )
    }
}

impl Display for Locality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Locality {} {} (province #{})",
            IdLabel(self.id),
            self.name,
            self.province_id
        )
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address {} {} {}", IdLabel(self.id), self.street, self.number)?;
        if let Some(floor) = self.floor {
            write!(f, ", floor {floor}")?;
        }
        if let Some(apartment) = self.apartment {
            write!(f, ", apt {apartment}")?;
        }
        write!(f, " (CP {}, locality #{})", self.postal_code, self.locality_id)
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Branch {} {} [{}-{}]",
            IdLabel(self.id),
            self.name,
            self.opening_time,
            self.closing_time
        )?;
        if self.is_head_office {
            write!(f, " head office")?;
        }
        match self.company_id {
            Some(company_id) => write!(f, " (company #{company_id})"),
            None => write!(f, " (unassigned)"),
        }
    }
}

impl Display for Company {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Company {} {} ({}, CUIL {})",
            IdLabel(self.id),
            self.name,
            self.legal_name,
            self.cuil
        )
    }
}
