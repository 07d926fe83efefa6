//! Reducing a ranked list of regions to the top N plus one "other" entry, for pie charts.
use crate::display::descending_missing_last;
use crate::energy_type::EnergyType;
use crate::region::RegionID;
use crate::statistics::{RegionalStatistics, StatisticsTable};
use crate::units::Money;
use anyhow::Result;
use serde::Serialize;

/// The label of the entry which groups together all regions outside the top N
pub const OTHER_REGIONS: &str = "Other regions";

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSlice {
    /// The region, or [`OTHER_REGIONS`]
    pub region: RegionID,
    /// Volume sold for the energy type
    pub value: Money,
}

impl RegionSlice {
    /// Whether this is the synthetic entry for regions outside the top N
    pub fn is_other(&self) -> bool {
        self.region.as_str() == OTHER_REGIONS
    }
}

/// Collapse regional statistics into the top `n` regions for `energy_type` plus one entry for the
/// rest.
///
/// Regions are ranked by their volume for `energy_type`, largest first; ties keep the order of
/// `stats` and regions with no volume for it rank last (counting as zero). If there are more than
/// `n` regions, an [`OTHER_REGIONS`] entry holds the sum of all the regions ranked below `n`.
///
/// The result is in display order: the [`OTHER_REGIONS`] entry first (if present), then the top
/// `n` regions from lowest ranked to highest ranked.
///
/// An empty `stats` gives an empty result. Otherwise, fails if `energy_type` isn't in `stats`.
pub fn top_n_with_other(
    stats: &StatisticsTable,
    energy_type: &EnergyType,
    n: usize,
) -> Result<Vec<RegionSlice>> {
    if stats.is_empty() {
        return Ok(Vec::new());
    }
    stats.require_energy_type(energy_type)?;

    let mut ranked: Vec<&RegionalStatistics> = stats.iter().collect();
    ranked.sort_by(|a, b| descending_missing_last(a.volume(energy_type), b.volume(energy_type)));

    let value_of = |row: &RegionalStatistics| row.volume(energy_type).unwrap_or(Money::ZERO);
    let split = n.min(ranked.len());
    let (top, rest) = ranked.split_at(split);

    let mut slices = Vec::with_capacity(split + 1);
    if !rest.is_empty() {
        slices.push(RegionSlice {
            region: OTHER_REGIONS.into(),
            value: rest.iter().map(|row| value_of(row)).sum(),
        });
    }
    slices.extend(top.iter().rev().map(|row| RegionSlice {
        region: row.region.clone(),
        value: value_of(row),
    }));

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{eight_solar_regions, paris_lyon_records, record};
    use crate::record::AuctionRecord;
    use crate::statistics::{StatsError, aggregate};
    use itertools::Itertools;
    use rstest::rstest;

    fn names(slices: &[RegionSlice]) -> Vec<&str> {
        slices.iter().map(|slice| slice.region.as_str()).collect_vec()
    }

    #[rstest]
    fn test_top_n_with_other(eight_solar_regions: Vec<AuctionRecord>) {
        let stats = aggregate(&eight_solar_regions);
        let slices = top_n_with_other(&stats, &"Solar".into(), 5).unwrap();
        assert_eq!(slices.len(), 6);
        assert_eq!(
            names(&slices),
            [
                "Other regions",
                "Normandie",
                "Occitanie",
                "Nouvelle-Aquitaine",
                "Grand Est",
                "Auvergne-Rhône-Alpes",
            ]
        );

        // The three lowest: 30 + 20 + 10
        assert!(slices[0].is_other());
        assert_eq!(slices[0].value, Money(60.0));
        assert_eq!(slices[5].value, Money(80.0));
    }

    #[rstest]
    #[case(8)]
    #[case(10)]
    fn test_top_n_no_other(eight_solar_regions: Vec<AuctionRecord>, #[case] n: usize) {
        let stats = aggregate(&eight_solar_regions);
        let slices = top_n_with_other(&stats, &"Solar".into(), n).unwrap();
        assert_eq!(slices.len(), 8);
        assert!(!slices.iter().any(RegionSlice::is_other));
        assert_eq!(slices.last().unwrap().region.as_str(), "Auvergne-Rhône-Alpes");
        assert_eq!(slices.first().unwrap().region.as_str(), "Bretagne");
    }

    #[rstest]
    fn test_top_n_zero(eight_solar_regions: Vec<AuctionRecord>) {
        let stats = aggregate(&eight_solar_regions);
        let slices = top_n_with_other(&stats, &"Solar".into(), 0).unwrap();
        assert_eq!(
            slices,
            [RegionSlice {
                region: OTHER_REGIONS.into(),
                value: Money(360.0),
            }]
        );
    }

    #[rstest]
    fn test_top_n_missing_volume_ranks_last(paris_lyon_records: Vec<AuctionRecord>) {
        let stats = aggregate(&paris_lyon_records);
        let slices = top_n_with_other(&stats, &"Wind".into(), 1).unwrap();
        assert_eq!(
            slices,
            [
                RegionSlice {
                    region: OTHER_REGIONS.into(),
                    value: Money::ZERO,
                },
                RegionSlice {
                    region: "Paris".into(),
                    value: Money(300.0),
                },
            ]
        );
    }

    #[test]
    fn test_top_n_stable_ties() {
        let records = [
            record("2021-01", "Corse", "Solar", 10.0),
            record("2021-01", "Alsace", "Solar", 10.0),
            record("2021-01", "Bretagne", "Solar", 10.0),
        ];
        let stats = aggregate(&records);
        let slices = top_n_with_other(&stats, &"Solar".into(), 2).unwrap();
        assert_eq!(names(&slices), ["Other regions", "Bretagne", "Alsace"]);
        assert_eq!(slices[0].value, Money(10.0));
    }

    #[test]
    fn test_top_n_empty() {
        let records = [record("2021-01", "Corse", "Solar", 10.0)];
        let stats = aggregate(records.iter().filter(|r| r.region.as_str() == "Paris"));
        assert!(top_n_with_other(&stats, &"Solar".into(), 5).unwrap().is_empty());

        let stats = aggregate(&records);
        let slices = top_n_with_other(&stats, &"Solar".into(), 5).unwrap();
        assert_eq!(names(&slices), ["Corse"]);
    }

    #[rstest]
    fn test_top_n_missing_column(paris_lyon_records: Vec<AuctionRecord>) {
        let stats = aggregate(&paris_lyon_records);
        let err = top_n_with_other(&stats, &"Geothermal".into(), 5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StatsError>(),
            Some(&StatsError::MissingColumn("Geothermal".into()))
        );
    }
}
