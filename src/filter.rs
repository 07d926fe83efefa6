//! Functions for narrowing the auction dataset by date, region and energy type.
//!
//! The filters are independent iterator adaptors over borrowed records, so they can be chained in
//! any order without copying the dataset.
use crate::energy_type::EnergyTypeSelection;
use crate::record::{AuctionRecord, Month};
use crate::region::RegionSelection;
use anyhow::{Context, Result};
use itertools::{Itertools, MinMaxResult};

/// An inclusive range of months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// The first month included
    pub start: Month,
    /// The last month included
    pub end: Month,
}

impl DateRange {
    /// A range from `start` to `end`, both included
    pub fn months(start: Month, end: Month) -> Self {
        Self { start, end }
    }

    /// A range covering whole years, from January of `start_year` to December of `end_year`
    pub fn years(start_year: i32, end_year: i32) -> Result<Self> {
        Ok(Self {
            start: Month::new(start_year, 1)?,
            end: Month::new(end_year, 12)?,
        })
    }

    /// The smallest range containing every record, or `None` if there are no records
    pub fn spanning<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a AuctionRecord>,
    {
        match records.into_iter().map(|record| record.date).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(date) => Some(Self::months(date, date)),
            MinMaxResult::MinMax(start, end) => Some(Self::months(start, end)),
        }
    }

    /// Whether `date` lies within the range
    pub fn contains(&self, date: Month) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The filters chosen by the user for one interaction.
///
/// This is owned by the calling layer and passed into the pipeline on every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    /// Months to include
    pub date_range: DateRange,
    /// The region selected on the map
    pub region: RegionSelection,
    /// The selected energy type
    pub energy_type: EnergyTypeSelection,
}

impl FilterCriteria {
    /// Criteria selecting every region and energy type within `date_range`
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            region: RegionSelection::All,
            energy_type: EnergyTypeSelection::All,
        }
    }

    /// Apply all three filters
    pub fn apply<'a, I>(&self, records: I) -> impl Iterator<Item = &'a AuctionRecord>
    where
        I: IntoIterator<Item = &'a AuctionRecord>,
    {
        let dated = by_date_range(records, self.date_range);
        let regional = by_region(dated, &self.region);
        by_energy_type(regional, &self.energy_type)
    }
}

/// Keep records whose date lies within `date_range` (inclusive at both ends).
///
/// An inverted range yields no records.
pub fn by_date_range<'a, I>(
    records: I,
    date_range: DateRange,
) -> impl Iterator<Item = &'a AuctionRecord>
where
    I: IntoIterator<Item = &'a AuctionRecord>,
{
    records
        .into_iter()
        .filter(move |record| date_range.contains(record.date))
}

/// Keep records from the selected region.
///
/// [`RegionSelection::All`] keeps every record. An unknown region yields no records.
pub fn by_region<'a, 'b, I>(
    records: I,
    region: &'b RegionSelection,
) -> impl Iterator<Item = &'a AuctionRecord>
where
    I: IntoIterator<Item = &'a AuctionRecord>,
{
    records
        .into_iter()
        .filter(move |record| region.contains(&record.region))
}

/// Keep records of the selected energy type.
///
/// [`EnergyTypeSelection::All`] keeps every record. An unknown energy type yields no records.
pub fn by_energy_type<'a, 'b, I>(
    records: I,
    energy_type: &'b EnergyTypeSelection,
) -> impl Iterator<Item = &'a AuctionRecord>
where
    I: IntoIterator<Item = &'a AuctionRecord>,
{
    records
        .into_iter()
        .filter(move |record| energy_type.contains(&record.energy_type))
}

/// Parse an optional `YYYY-MM` bound, falling back to `default`
pub fn parse_month_or(s: Option<&str>, default: Month) -> Result<Month> {
    s.map_or(Ok(default), |s| {
        s.parse().with_context(|| format!("Invalid date bound: {s}"))
    })
}
