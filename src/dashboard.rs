//! The dashboard pipeline: everything needed to render one view of the auction data.
//!
//! The map, the table and the regional pie chart always show every region for the selected dates,
//! while the time series and season charts follow the full selection (region and energy type too).
use crate::display::{DisplayTable, SortColumn, format_table};
use crate::filter::{DateRange, FilterCriteria, by_date_range};
use crate::record::AuctionRecord;
use crate::statistics::{StatisticsTable, aggregate};
use crate::timeline::{
    EnergyMixEntry, Granularity, PeriodVolume, SeasonShare, energy_mix, seasonal_share,
    volume_over_time,
};
use crate::top_n::{RegionSlice, top_n_with_other};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Chart data which depends on whether an energy type is selected
#[derive(Debug, Clone, PartialEq)]
pub enum Charts {
    /// No energy type selected
    Overview {
        /// Share of each energy type in the selected region
        energy_mix: Vec<EnergyMixEntry>,
    },
    /// A single energy type selected
    EnergyType {
        /// The top regions for the energy type, plus the rest grouped together
        top_regions: Vec<RegionSlice>,
        /// Share of the energy type's volume sold in each season, for the selected region
        seasonal_share: Vec<SeasonShare>,
    },
}

/// One rendered view of the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// The selection this view was built for
    pub criteria: FilterCriteria,
    /// Statistics for every region over the selected dates
    pub statistics: Rc<StatisticsTable>,
    /// The statistics formatted for display
    pub table: DisplayTable,
    /// Volume sold per period and energy type for the selection
    pub volume_over_time: Vec<PeriodVolume>,
    /// Data for the remaining charts
    pub charts: Charts,
}

/// The loaded dataset, along with cached regional statistics
pub struct Dashboard {
    records: Vec<AuctionRecord>,
    cache: RefCell<HashMap<DateRange, Rc<StatisticsTable>>>,
}

impl Dashboard {
    /// Create a new [`Dashboard`] for the given dataset
    pub fn new(records: Vec<AuctionRecord>) -> Self {
        Self {
            records,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The full dataset
    pub fn records(&self) -> &[AuctionRecord] {
        &self.records
    }

    /// Regional statistics over all regions and energy types for the given dates.
    ///
    /// Results are cached, so repeated calls with the same date range share one table.
    pub fn regional_statistics(&self, date_range: &DateRange) -> Rc<StatisticsTable> {
        if let Some(stats) = self.cache.borrow().get(date_range) {
            return Rc::clone(stats);
        }

        debug!(
            "Computing regional statistics for {} to {}",
            date_range.start, date_range.end
        );
        let stats = Rc::new(aggregate(by_date_range(&self.records, *date_range)));
        self.cache
            .borrow_mut()
            .insert(*date_range, Rc::clone(&stats));

        stats
    }

    /// Build the dashboard view for the given selection.
    ///
    /// # Arguments
    ///
    /// * `criteria` - The dates, region and energy type selected
    /// * `granularity` - Time step for the volume over time chart
    /// * `top_n` - Number of regions shown individually in the regional pie chart
    ///
    /// # Returns
    ///
    /// The view, or an error if the selected energy type has no data for the selected dates.
    pub fn view(
        &self,
        criteria: &FilterCriteria,
        granularity: Granularity,
        top_n: usize,
    ) -> Result<DashboardView> {
        let statistics = self.regional_statistics(&criteria.date_range);
        if statistics.is_empty() {
            warn!(
                "No auction records between {} and {}",
                criteria.date_range.start, criteria.date_range.end
            );
        }

        let table = format_table(&statistics, &SortColumn::from(&criteria.energy_type))
            .context("Failed to format regional statistics")?;

        let selected: Vec<&AuctionRecord> = criteria.apply(&self.records).collect();
        let volume_over_time = volume_over_time(selected.iter().copied(), granularity);

        let charts = match criteria.energy_type.energy_type() {
            None => Charts::Overview {
                energy_mix: energy_mix(selected.iter().copied()),
            },
            Some(energy_type) => {
                let top_regions = top_n_with_other(&statistics, energy_type, top_n)
                    .context("Failed to build regional pie chart")?;
                let seasonal_share = if selected.is_empty() {
                    Vec::new()
                } else {
                    seasonal_share(selected.iter().copied())?
                };

                Charts::EnergyType {
                    top_regions,
                    seasonal_share,
                }
            }
        };

        Ok(DashboardView {
            criteria: criteria.clone(),
            statistics,
            table,
            volume_over_time,
            charts,
        })
    }
}
