//! Auction records, the rows of the input dataset.
use crate::energy_type::EnergyType;
use crate::region::RegionID;
use crate::units::Money;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month (e.g. 2021-03)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Create a new [`Month`], failing if `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("Invalid month: {year}-{month:02}"))?;
        Ok(Self(date))
    }

    /// The year
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// The month of the year, from 1 (January) to 12 (December)
    pub fn month(self) -> u32 {
        self.0.month()
    }
}

impl FromStr for Month {
    type Err = anyhow::Error;

    /// Parse a month in `YYYY-MM` form
    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{s}': should be in form YYYY-MM"))?;
        Ok(Self(date))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserialiser: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserialiser)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serialiser: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialiser.collect_str(self)
    }
}

/// One row of the auction dataset: the volume of one energy type sold in one region in one month.
///
/// Records are loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuctionRecord {
    /// The month in which the auction took place
    pub date: Month,
    /// The region, spelled exactly as in the map boundary data
    pub region: RegionID,
    /// The renewable source (e.g. "Solar")
    pub energy_type: EnergyType,
    /// Monetary value of the electricity sold
    pub total_volume_sold: Money,
}

impl AuctionRecord {
    /// Create a new [`AuctionRecord`]
    pub fn new(date: Month, region: &str, energy_type: &str, total_volume_sold: f64) -> Self {
        Self {
            date,
            region: region.into(),
            energy_type: energy_type.into(),
            total_volume_sold: Money(total_volume_sold),
        }
    }
}
