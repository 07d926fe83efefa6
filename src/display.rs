//! Turning regional statistics into a table of display strings.
use crate::energy_type::{EnergyType, EnergyTypeSelection};
use crate::statistics::{RegionalStatistics, StatisticsTable};
use crate::units::Money;
use anyhow::Result;
use std::cmp::Ordering;

/// Text shown in place of a missing volume or percentage
pub const NO_DATA: &str = "No data";

/// Column label for region names
pub const REGION_COLUMN: &str = "region";

/// Column label for the overall total volume
pub const TOTAL_VOLUME_COLUMN: &str = "total_volume";

/// Format a volume using `k€` for thousands and `M€` for millions
pub fn format_volume(volume: Money) -> String {
    let value = volume.value();
    if value.abs() >= 1_000_000.0 {
        format!("{:.2} M€", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.2} k€", value / 1_000.0)
    } else {
        format!("{value:.2}€")
    }
}

/// Format a percentage with two decimal places
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.2}%")
}

/// The column label for an energy type's volume
pub fn volume_label(energy_type: &EnergyType) -> String {
    energy_type.to_string()
}

/// The column label for an energy type's percentage
pub fn percentage_label(energy_type: &EnergyType) -> String {
    format!("{energy_type} %")
}

/// The volume by which the rows of a [`DisplayTable`] are ranked
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortColumn {
    /// The overall total volume
    #[default]
    TotalVolume,
    /// The volume of one energy type
    EnergyType(EnergyType),
}

impl SortColumn {
    /// The value to sort a row by, or `None` if the row has no data for it
    fn key(&self, row: &RegionalStatistics) -> Option<Money> {
        match self {
            Self::TotalVolume => Some(row.total_volume),
            Self::EnergyType(energy_type) => row.volume(energy_type),
        }
    }
}

impl From<&EnergyTypeSelection> for SortColumn {
    fn from(selection: &EnergyTypeSelection) -> Self {
        selection
            .energy_type()
            .map_or(Self::TotalVolume, |energy_type| {
                Self::EnergyType(energy_type.clone())
            })
    }
}

/// Order values from largest to smallest, with missing values last
pub fn descending_missing_last(a: Option<Money>, b: Option<Money>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A table of display strings, ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DisplayTable {
    /// The column labels
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows, each with one cell per column
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cells of the column with the given label, if there is one
    pub fn column(&self, label: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|col| col == label)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }
}

/// Format regional statistics for display.
///
/// Rows are ranked by `sort_column` from largest to smallest; ties keep the order of `stats` and
/// rows without data for the sort column go last. Columns are the region, the total volume, then
/// a volume and a percentage column per energy type. Missing values are shown as [`NO_DATA`].
///
/// Fails if `stats` has rows and `sort_column` refers to an energy type which isn't in `stats`.
pub fn format_table(stats: &StatisticsTable, sort_column: &SortColumn) -> Result<DisplayTable> {
    if let SortColumn::EnergyType(energy_type) = sort_column
        && !stats.is_empty()
    {
        stats.require_energy_type(energy_type)?;
    }

    let mut columns = vec![REGION_COLUMN.to_string(), TOTAL_VOLUME_COLUMN.to_string()];
    for energy_type in stats.energy_types() {
        columns.push(volume_label(energy_type));
        columns.push(percentage_label(energy_type));
    }

    let mut ranked: Vec<&RegionalStatistics> = stats.iter().collect();
    ranked.sort_by(|a, b| descending_missing_last(sort_column.key(a), sort_column.key(b)));

    let rows = ranked.into_iter().map(|row| format_row(stats, row)).collect();

    Ok(DisplayTable { columns, rows })
}

/// Format a single row of the statistics table
fn format_row(stats: &StatisticsTable, row: &RegionalStatistics) -> Vec<String> {
    let mut cells = vec![row.region.to_string(), format_volume(row.total_volume)];
    for energy_type in stats.energy_types() {
        cells.push(row.volume(energy_type).map_or_else(|| NO_DATA.to_string(), format_volume));
        cells.push(
            row.percentage(energy_type)
                .map_or_else(|| NO_DATA.to_string(), format_percentage),
        );
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{paris_lyon_records, record, records};
    use crate::record::AuctionRecord;
    use crate::statistics::{StatsError, aggregate};
    use rstest::rstest;

    #[rstest]
    #[case(1_500_000.0, "1.50 M€")]
    #[case(2_500.0, "2.50 k€")]
    #[case(42.0, "42.00€")]
    #[case(1_000.0, "1.00 k€")]
    #[case(999.999, "1000.00€")]
    #[case(0.0, "0.00€")]
    fn test_format_volume(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_volume(Money(value)), expected);
    }

    #[rstest]
    #[case(25.0, "25.00%")]
    #[case(100.0 / 3.0, "33.33%")]
    fn test_format_percentage(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_percentage(value), expected);
    }

    #[rstest]
    fn test_format_table_paris_lyon(paris_lyon_records: Vec<AuctionRecord>) {
        let stats = aggregate(&paris_lyon_records);
        let table = format_table(&stats, &SortColumn::TotalVolume).unwrap();
        assert_eq!(
            table.columns(),
            ["region", "total_volume", "Solar", "Solar %", "Wind", "Wind %"]
        );
        assert_eq!(
            table.rows(),
            [
                ["Paris", "400.00€", "100.00€", "25.00%", "300.00€", "75.00%"],
                ["Lyon", "50.00€", "50.00€", "100.00%", "No data", "No data"],
            ]
        );
    }

    #[rstest]
    fn test_format_table_sort_by_energy_type(records: Vec<AuctionRecord>) {
        let stats = aggregate(&records);
        let table =
            format_table(&stats, &SortColumn::EnergyType("Hydropower".into())).unwrap();

        // Normandie sold no hydropower so comes last
        assert_eq!(
            table.column("region").unwrap(),
            ["Occitanie", "Grand Est", "Bretagne", "Normandie"]
        );
        assert_eq!(
            table.column("Hydropower").unwrap(),
            ["750.00 k€", "400.00 k€", "50.00 k€", "No data"]
        );
    }

    #[test]
    fn test_format_table_stable_ties() {
        let records = [
            record("2021-01", "Corse", "Solar", 10.0),
            record("2021-01", "Bretagne", "Solar", 10.0),
            record("2021-01", "Alsace", "Solar", 20.0),
        ];
        let stats = aggregate(&records);
        let table = format_table(&stats, &SortColumn::TotalVolume).unwrap();
        assert_eq!(table.column("region").unwrap(), ["Alsace", "Bretagne", "Corse"]);
    }

    #[test]
    fn test_format_table_zero_total() {
        let records = [record("2021-01", "Corse", "Solar", 0.0)];
        let table = format_table(&aggregate(&records), &SortColumn::TotalVolume).unwrap();
        assert_eq!(table.rows(), [["Corse", "0.00€", "0.00€", "No data"]]);
    }

    #[test]
    fn test_format_table_empty() {
        let stats = aggregate(&Vec::<AuctionRecord>::new());
        let table = format_table(&stats, &SortColumn::TotalVolume).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["region", "total_volume"]);

        let table = format_table(&stats, &SortColumn::EnergyType("Solar".into())).unwrap();
        assert!(table.is_empty());
    }

    #[rstest]
    fn test_format_table_missing_column(paris_lyon_records: Vec<AuctionRecord>) {
        let stats = aggregate(&paris_lyon_records);
        let err = format_table(&stats, &SortColumn::EnergyType("Geothermal".into())).unwrap_err();
        assert_eq!(
            err.downcast_ref::<StatsError>(),
            Some(&StatsError::MissingColumn("Geothermal".into()))
        );
    }

    #[rstest]
    fn test_format_table_leaves_stats_untouched(paris_lyon_records: Vec<AuctionRecord>) {
        let stats = aggregate(&paris_lyon_records);
        let before = stats.clone();
        format_table(&stats, &SortColumn::EnergyType("Wind".into())).unwrap();
        assert_eq!(stats, before);
    }

    #[test]
    fn test_sort_column_from_selection() {
        assert_eq!(
            SortColumn::from(&EnergyTypeSelection::All),
            SortColumn::TotalVolume
        );
        assert_eq!(
            SortColumn::from(&EnergyTypeSelection::from("Solar")),
            SortColumn::EnergyType("Solar".into())
        );
    }
}
