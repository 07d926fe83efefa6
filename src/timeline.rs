//! Chart data derived from auction records: volumes over time, the energy mix and seasonal shares.
use crate::energy_type::EnergyType;
use crate::record::{AuctionRecord, Month};
use crate::statistics::percentage;
use crate::units::Money;
use anyhow::{Result, ensure};
use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::collections::BTreeMap;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// The time step used when plotting volumes over time
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum Granularity {
    /// One point per month
    #[string = "monthly"]
    Monthly,
    /// One point per year
    #[default]
    #[string = "yearly"]
    Yearly,
}

/// A point on the time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    /// A single month
    Month(Month),
    /// A whole year
    Year(i32),
}

impl Period {
    /// The period containing `date` at the given granularity
    pub fn of(date: Month, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Monthly => Self::Month(date),
            Granularity::Yearly => Self::Year(date.year()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(month) => write!(f, "{month}"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serialiser: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialiser.collect_str(self)
    }
}

/// Meteorological seasons, in the order they are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display, Serialize)]
pub enum Season {
    /// December to February
    Winter,
    /// March to May
    Spring,
    /// June to August
    Summer,
    /// September to November
    Autumn,
}

impl Season {
    /// The season in which `date` falls
    pub fn of(date: Month) -> Self {
        match date.month() {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }
}

/// Volume sold for one energy type in one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodVolume {
    /// The period
    pub period: Period,
    /// The energy type
    pub energy_type: EnergyType,
    /// Volume sold
    pub volume: Money,
}

/// Total volume sold for one energy type and its share of the overall total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyMixEntry {
    /// The energy type
    pub energy_type: EnergyType,
    /// Volume sold
    pub volume: Money,
    /// Percentage of the overall volume, if the overall volume is non-zero
    pub percentage: Option<f64>,
}

/// Volume sold in one season and its share of the overall total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonShare {
    /// The season
    pub season: Season,
    /// Volume sold
    pub volume: Money,
    /// Percentage of the overall volume, if the overall volume is non-zero
    pub percentage: Option<f64>,
}

/// Total volume per period and energy type.
///
/// Periods are in chronological order. Within a period, energy types are in the order they were
/// first seen. Combinations with no records are omitted.
pub fn volume_over_time<'a, I>(records: I, granularity: Granularity) -> Vec<PeriodVolume>
where
    I: IntoIterator<Item = &'a AuctionRecord>,
{
    let mut energy_types = IndexSet::new();
    let mut volumes: BTreeMap<(Period, usize), Money> = BTreeMap::new();
    for record in records {
        let (idx, _) = energy_types.insert_full(record.energy_type.clone());
        let period = Period::of(record.date, granularity);
        *volumes.entry((period, idx)).or_default() += record.total_volume_sold;
    }

    volumes
        .into_iter()
        .map(|((period, idx), volume)| PeriodVolume {
            period,
            energy_type: energy_types[idx].clone(),
            volume,
        })
        .collect()
}

/// Total volume per energy type, with each energy type's share of the overall volume
pub fn energy_mix<'a, I>(records: I) -> Vec<EnergyMixEntry>
where
    I: IntoIterator<Item = &'a AuctionRecord>,
{
    let mut volumes: IndexMap<EnergyType, Money> = IndexMap::new();
    for record in records {
        *volumes.entry(record.energy_type.clone()).or_default() += record.total_volume_sold;
    }

    let total: Money = volumes.values().sum();
    volumes
        .into_iter()
        .map(|(energy_type, volume)| EnergyMixEntry {
            energy_type,
            volume,
            percentage: percentage(volume, total),
        })
        .collect()
}

/// The share of the volume sold in each season, for records of a single energy type.
///
/// Seasons with no records are omitted. Fails unless the records contain exactly one energy type.
pub fn seasonal_share<'a, I>(records: I) -> Result<Vec<SeasonShare>>
where
    I: IntoIterator<Item = &'a AuctionRecord>,
{
    let mut energy_types = IndexSet::new();
    let mut volumes: IndexMap<Season, Money> = IndexMap::new();
    for record in records {
        energy_types.insert(&record.energy_type);
        *volumes.entry(Season::of(record.date)).or_default() += record.total_volume_sold;
    }

    ensure!(
        energy_types.len() == 1,
        "Seasonal shares need records of exactly one energy type, found {}",
        energy_types.len()
    );

    let total: Money = volumes.values().sum();
    Ok(Season::iter()
        .filter_map(|season| {
            let volume = *volumes.get(&season)?;
            Some(SeasonShare {
                season,
                volume,
                percentage: percentage(volume, total),
            })
        })
        .collect())
}
