//! Regional statistics: total volume per region, broken down by energy type.
//!
//! Energy types are discovered from the records passed to [`aggregate`], so the shape of a
//! [`StatisticsTable`] depends entirely on its input. Filtering the records down to a single energy
//! type gives a table with a single energy type.
use crate::energy_type::EnergyType;
use crate::record::AuctionRecord;
use crate::region::RegionID;
use crate::units::Money;
use float_cmp::approx_eq;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt;

/// Relative tolerance used when checking that shares add up to the region total
pub const DECOMPOSITION_TOLERANCE: f64 = 1e-6;

/// Errors raised when the statistics table is asked about something it doesn't contain
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The energy type was not present in the records the table was built from
    MissingColumn(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingColumn(energy_type) => write!(
                f,
                "Energy type '{energy_type}' is not present in the regional statistics"
            ),
        }
    }
}

impl Error for StatsError {}

/// Calculate `part` as a percentage of `total`.
///
/// Returns `None` if `total` is zero, as no percentage can be computed.
pub fn percentage(part: Money, total: Money) -> Option<f64> {
    (!total.is_zero()).then(|| (part / total).as_percentage())
}

/// The contribution of one energy type to a region's total volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyShare {
    /// Volume sold for this energy type, or `None` if the region had no records of this type
    pub total_volume: Option<Money>,
    /// Share of the region's total volume, or `None` if it can't be computed
    pub percentage: Option<f64>,
}

impl EnergyShare {
    /// Create a new [`EnergyShare`] given the region's total volume
    pub fn new(total_volume: Option<Money>, region_total: Money) -> Self {
        Self {
            total_volume,
            percentage: total_volume.and_then(|volume| percentage(volume, region_total)),
        }
    }

    /// The volume, treating a missing volume as zero
    pub fn volume_or_zero(&self) -> Money {
        self.total_volume.unwrap_or(Money::ZERO)
    }
}

/// Aggregated auction statistics for one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalStatistics {
    /// The region
    pub region: RegionID,
    /// Total volume sold across all energy types
    pub total_volume: Money,
    /// One entry per energy type in the table, in the table's order
    shares: IndexMap<EnergyType, EnergyShare>,
}

impl RegionalStatistics {
    /// The share for the given energy type, if the table contains that energy type
    pub fn share(&self, energy_type: &EnergyType) -> Option<&EnergyShare> {
        self.shares.get(energy_type)
    }

    /// The volume sold for the given energy type, if any was sold
    pub fn volume(&self, energy_type: &EnergyType) -> Option<Money> {
        self.share(energy_type).and_then(|share| share.total_volume)
    }

    /// The percentage of the total for the given energy type, if it can be computed
    pub fn percentage(&self, energy_type: &EnergyType) -> Option<f64> {
        self.share(energy_type).and_then(|share| share.percentage)
    }

    /// Iterate over energy types and their shares, in table order
    pub fn iter_shares(&self) -> impl Iterator<Item = (&EnergyType, &EnergyShare)> {
        self.shares.iter()
    }

    /// Total volume in millions of euros, as used for map colouring
    pub fn total_volume_millions(&self) -> f64 {
        self.total_volume.millions()
    }

    /// Check that the energy type volumes add up to the total and the percentages to 100.
    ///
    /// Regions with a zero total trivially pass.
    pub fn is_consistent(&self) -> bool {
        if self.total_volume.is_zero() {
            return true;
        }

        let total = self.total_volume.value();
        let volume_sum: Money = self.shares.values().map(EnergyShare::volume_or_zero).sum();
        let percentage_sum: f64 = self.shares.values().filter_map(|s| s.percentage).sum();

        approx_eq!(
            f64,
            volume_sum.value(),
            total,
            epsilon = total.abs() * DECOMPOSITION_TOLERANCE
        ) && approx_eq!(
            f64,
            percentage_sum,
            100.0,
            epsilon = 100.0 * DECOMPOSITION_TOLERANCE
        )
    }
}

/// Regional statistics for every region present in a set of records
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatisticsTable {
    /// Energy types in the order they were first seen
    energy_types: IndexSet<EnergyType>,
    /// One row per region, sorted by region name
    rows: Vec<RegionalStatistics>,
}

impl StatisticsTable {
    /// The energy types present in the input, in first-seen order
    pub fn energy_types(&self) -> &IndexSet<EnergyType> {
        &self.energy_types
    }

    /// Whether the table has data for the given energy type
    pub fn has_energy_type(&self, energy_type: &EnergyType) -> bool {
        self.energy_types.contains(energy_type)
    }

    /// Fail with [`StatsError::MissingColumn`] unless the table contains `energy_type`
    pub fn require_energy_type(&self, energy_type: &EnergyType) -> Result<(), StatsError> {
        if self.has_energy_type(energy_type) {
            Ok(())
        } else {
            Err(StatsError::MissingColumn(energy_type.to_string()))
        }
    }

    /// The rows of the table, sorted by region name
    pub fn rows(&self) -> &[RegionalStatistics] {
        &self.rows
    }

    /// Iterate over the rows of the table
    pub fn iter(&self) -> impl Iterator<Item = &RegionalStatistics> {
        self.rows.iter()
    }

    /// Look up the row for a region
    pub fn get(&self, region: &RegionID) -> Option<&RegionalStatistics> {
        self.rows.iter().find(|row| &row.region == region)
    }

    /// The number of regions
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no regions
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The regions whose shares don't add up to their total
    pub fn inconsistent_regions(&self) -> impl Iterator<Item = &RegionID> {
        self.rows
            .iter()
            .filter(|row| !row.is_consistent())
            .map(|row| &row.region)
    }
}

/// Aggregate auction records into per-region statistics.
///
/// Every region in the input gets one row. Each row has an entry for every energy type in the
/// input; where a region has no records of an energy type, the volume and percentage are `None`.
/// Percentages are also `None` for regions whose total volume is zero.
pub fn aggregate<'a, I>(records: I) -> StatisticsTable
where
    I: IntoIterator<Item = &'a AuctionRecord>,
{
    let mut energy_types = IndexSet::new();
    let mut totals: BTreeMap<RegionID, Money> = BTreeMap::new();
    let mut volumes: HashMap<(RegionID, EnergyType), Money> = HashMap::new();
    let mut num_records = 0usize;

    for record in records {
        num_records += 1;
        energy_types.insert(record.energy_type.clone());
        *totals.entry(record.region.clone()).or_default() += record.total_volume_sold;
        *volumes
            .entry((record.region.clone(), record.energy_type.clone()))
            .or_default() += record.total_volume_sold;
    }

    let rows = totals
        .into_iter()
        .map(|(region, total_volume)| {
            let shares = energy_types
                .iter()
                .map(|energy_type| {
                    let volume = volumes
                        .get(&(region.clone(), energy_type.clone()))
                        .copied();
                    (energy_type.clone(), EnergyShare::new(volume, total_volume))
                })
                .collect();

            RegionalStatistics {
                region,
                total_volume,
                shares,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "Aggregated {num_records} records into {} regions and {} energy types",
        rows.len(),
        energy_types.len()
    );

    StatisticsTable { energy_types, rows }
}
