//! The observational window a search is run against.
//!
//! A `RangeQuery` is what the query file (or a library caller) supplies. It only
//! becomes usable for scanning after `validate`, which returns a
//! `ValidatedQuery`; the scan stages accept nothing else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest accepted lower bound for the log10 mass-transfer rate.
pub const MIN_LOG_MASS_TRANSFER_RATE: f64 = -100.0;

/// Physical properties a query can constrain, in query-file row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Donor mass (Msol).
    DonorMass,
    /// Accretor mass (Msol).
    AccretorMass,
    /// log10 of the mass-transfer rate (Msol/yr).
    LogMassTransferRate,
    /// Orbital period (days).
    OrbitalPeriod,
    /// log10 of the donor effective temperature (K).
    LogEffectiveTemperature,
}

impl Property {
    pub const ALL: [Property; 5] = [
        Property::DonorMass,
        Property::AccretorMass,
        Property::LogMassTransferRate,
        Property::OrbitalPeriod,
        Property::LogEffectiveTemperature,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Property::DonorMass => "m1",
            Property::AccretorMass => "m2",
            Property::LogMassTransferRate => "mt",
            Property::OrbitalPeriod => "p",
            Property::LogEffectiveTemperature => "teff",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Property::DonorMass => "Donor Mass",
            Property::AccretorMass => "Accretor Mass",
            Property::LogMassTransferRate => "MT Rate",
            Property::OrbitalPeriod => "Orbital Period",
            Property::LogEffectiveTemperature => "Donor Teff",
        }
    }

    /// Smallest accepted lower bound, if the property has one.
    ///
    /// The effective temperature deliberately has none: only its ordering is
    /// checked.
    pub fn lower_floor(self) -> Option<f64> {
        match self {
            Property::DonorMass | Property::AccretorMass | Property::OrbitalPeriod => Some(0.0),
            Property::LogMassTransferRate => Some(MIN_LOG_MASS_TRANSFER_RATE),
            Property::LogEffectiveTemperature => None,
        }
    }
}

/// Compact object class of the accretor, selected by the query flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccretorClass {
    NeutronStar,
    BlackHole,
}

impl AccretorClass {
    /// `0` selects neutron stars, anything else black holes.
    pub fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            AccretorClass::NeutronStar
        } else {
            AccretorClass::BlackHole
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AccretorClass::NeutronStar => "neutron star",
            AccretorClass::BlackHole => "black hole",
        }
    }
}

/// Closed interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Search window as supplied by the caller. Absent properties are unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    pub accretor_class: AccretorClass,
    pub donor_mass: Option<Interval>,
    pub accretor_mass: Option<Interval>,
    pub log_mass_transfer_rate: Option<Interval>,
    pub orbital_period: Option<Interval>,
    pub log_effective_temperature: Option<Interval>,
}

impl RangeQuery {
    /// A query that admits every step of every record for the given class.
    pub fn unconstrained(accretor_class: AccretorClass) -> Self {
        Self {
            accretor_class,
            donor_mass: None,
            accretor_mass: None,
            log_mass_transfer_rate: None,
            orbital_period: None,
            log_effective_temperature: None,
        }
    }

    /// Builder-style setter for one property.
    pub fn with(mut self, property: Property, interval: Interval) -> Self {
        *self.slot_mut(property) = Some(interval);
        self
    }

    pub fn interval(&self, property: Property) -> Option<Interval> {
        match property {
            Property::DonorMass => self.donor_mass,
            Property::AccretorMass => self.accretor_mass,
            Property::LogMassTransferRate => self.log_mass_transfer_rate,
            Property::OrbitalPeriod => self.orbital_period,
            Property::LogEffectiveTemperature => self.log_effective_temperature,
        }
    }

    fn slot_mut(&mut self, property: Property) -> &mut Option<Interval> {
        match property {
            Property::DonorMass => &mut self.donor_mass,
            Property::AccretorMass => &mut self.accretor_mass,
            Property::LogMassTransferRate => &mut self.log_mass_transfer_rate,
            Property::OrbitalPeriod => &mut self.orbital_period,
            Property::LogEffectiveTemperature => &mut self.log_effective_temperature,
        }
    }

    /// Check every supplied interval and freeze the query.
    ///
    /// Properties are checked in `Property::ALL` order and the first violation
    /// is returned.
    pub fn validate(self) -> Result<ValidatedQuery, QueryError> {
        for property in Property::ALL {
            let Some(iv) = self.interval(property) else {
                continue;
            };
            let below_floor = property.lower_floor().is_some_and(|floor| iv.low < floor);
            if below_floor || iv.low > iv.high || iv.low.is_nan() || iv.high.is_nan() {
                return Err(QueryError::InvalidRange(property));
            }
        }
        Ok(ValidatedQuery(self))
    }
}

/// A query that passed `RangeQuery::validate`. Immutable from here on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedQuery(RangeQuery);

impl ValidatedQuery {
    pub fn accretor_class(&self) -> AccretorClass {
        self.0.accretor_class
    }

    pub fn interval(&self, property: Property) -> Option<Interval> {
        self.0.interval(property)
    }

    /// Whether `value` satisfies the constraint on `property` (absent => always).
    pub fn admits(&self, property: Property, value: f64) -> bool {
        self.0.interval(property).is_none_or(|iv| iv.contains(value))
    }

    pub fn as_range_query(&self) -> &RangeQuery {
        &self.0
    }
}

/// Reasons a query is rejected before scanning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Wrong {} range", .0.display_name())]
    InvalidRange(Property),
    #[error("Error in query input, please recheck format\n{0}")]
    Malformed(String),
}
