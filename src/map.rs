//! Data for colouring a choropleth map of the regions and labelling its tooltips.
//!
//! Regions are joined to the map's boundary features by exact name.
use crate::energy_type::EnergyTypeSelection;
use crate::region::RegionID;
use crate::statistics::{RegionalStatistics, StatisticsTable};
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// Tooltip text for regions with no data
pub const NO_DATA_TOOLTIP: &str = "Total: No data";

/// Which value colours the map when an energy type is selected
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
pub enum MapMetric {
    /// The energy type's share of the region's total
    #[default]
    #[string = "percentage"]
    PercentageInRenewables,
    /// The volume sold for the energy type
    #[string = "volume"]
    VolumeSold,
}

/// The colour value and tooltip for one map region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapRegion {
    /// The region name, as in the boundary data
    pub region: RegionID,
    /// The value used to colour the region, or `None` to show it as having no data
    pub value: Option<f64>,
    /// The tooltip lines
    pub tooltip: Vec<String>,
}

/// The colour value for a region.
///
/// With no energy type selected, this is the total volume in millions of euros. Otherwise, it is
/// the energy type's volume or percentage, depending on `metric`.
fn colour_value(
    row: &RegionalStatistics,
    energy_type: &EnergyTypeSelection,
    metric: MapMetric,
) -> Option<f64> {
    match (energy_type.energy_type(), metric) {
        (None, _) => Some(row.total_volume_millions()),
        (Some(energy_type), MapMetric::VolumeSold) => {
            row.volume(energy_type).map(|volume| volume.value())
        }
        (Some(energy_type), MapMetric::PercentageInRenewables) => row.percentage(energy_type),
    }
}

/// The tooltip lines for a region with data
fn tooltip(row: &RegionalStatistics, energy_type: &EnergyTypeSelection) -> Vec<String> {
    let Some(energy_type) = energy_type.energy_type() else {
        return vec![format!(
            "Total Sold: {:.1} Millions €",
            row.total_volume_millions()
        )];
    };

    let volume = row.volume(energy_type).map_or(0.0, |volume| volume.value());
    let percentage = row
        .percentage(energy_type)
        .map_or_else(|| "No data".to_string(), |p| format!("{p:.0}%"));
    vec![
        format!("Total Sold: {} €", format_thousands(volume)),
        format!("{energy_type}: {percentage}"),
    ]
}

/// Format the whole part of a number with commas between groups of thousands
#[allow(clippy::cast_possible_truncation)]
fn format_thousands(value: f64) -> String {
    (value.trunc() as i64).to_formatted_string(&Locale::en)
}

/// Build the map data for the given boundary region names.
///
/// There is one entry per name, in the order given. Names with no row in `stats` get no colour
/// value and a "no data" tooltip.
pub fn choropleth<'a, I>(
    stats: &StatisticsTable,
    energy_type: &EnergyTypeSelection,
    metric: MapMetric,
    region_names: I,
) -> Vec<MapRegion>
where
    I: IntoIterator<Item = &'a RegionID>,
{
    region_names
        .into_iter()
        .map(|region| match stats.get(region) {
            Some(row) => MapRegion {
                region: region.clone(),
                value: colour_value(row, energy_type, metric),
                tooltip: tooltip(row, energy_type),
            },
            None => MapRegion {
                region: region.clone(),
                value: None,
                tooltip: vec![NO_DATA_TOOLTIP.to_string()],
            },
        })
        .collect()
}
