//! The module responsible for writing output data to disk.
use crate::dashboard::{Charts, DashboardView};
use crate::display::DisplayTable;
use crate::energy_type::EnergyType;
use crate::map::MapRegion;
use crate::region::RegionID;
use crate::statistics::StatisticsTable;
use crate::timeline::{EnergyMixEntry, PeriodVolume, SeasonShare};
use crate::top_n::RegionSlice;
use crate::units::Money;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which dataset-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "enr_auctions_results";

/// The output file name for regional statistics, one row per region and energy type
const REGIONAL_STATISTICS_FILE_NAME: &str = "regional_statistics.csv";

/// The output file name for the formatted regional summary table
const REGIONAL_SUMMARY_FILE_NAME: &str = "regional_summary.csv";

/// The output file name for the regional pie chart
const TOP_REGIONS_FILE_NAME: &str = "top_regions.csv";

/// The output file name for volumes over time
const VOLUME_OVER_TIME_FILE_NAME: &str = "volume_over_time.csv";

/// The output file name for the energy mix
const ENERGY_MIX_FILE_NAME: &str = "energy_mix.csv";

/// The output file name for seasonal shares
const SEASONAL_SHARE_FILE_NAME: &str = "seasonal_share.csv";

/// The output file name for map data
const MAP_FILE_NAME: &str = "map.csv";

/// Separator between tooltip lines in the map output
const TOOLTIP_SEPARATOR: &str = " | ";

/// Get the output directory for the dataset at the specified path
pub fn get_output_dir(data_file: &Path) -> Result<PathBuf> {
    let dataset_name = data_file
        .file_stem()
        .context("Data file path has no file name")?
        .to_str()
        .context("Invalid chars in data file name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, dataset_name].iter().collect())
}

/// Create a new output directory, deleting the old one if `allow_overwrite` is set.
///
/// An existing but empty directory is used as is.
///
/// # Returns
///
/// Whether an existing directory was overwritten
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    let mut overwrite = false;
    if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to replace it."
        );
        fs::remove_dir_all(output_dir)?;
        overwrite = true;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the regional statistics CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct RegionalStatisticsRow {
    region: RegionID,
    energy_type: EnergyType,
    volume: Option<Money>,
    percentage: Option<f64>,
}

/// Represents a row in the map CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct MapRow {
    region: RegionID,
    value: Option<f64>,
    tooltip: String,
}

impl From<&MapRegion> for MapRow {
    fn from(region: &MapRegion) -> Self {
        Self {
            region: region.region.clone(),
            value: region.value,
            tooltip: region.tooltip.join(TOOLTIP_SEPARATOR),
        }
    }
}

/// An object for writing dashboard data to file
pub struct DataWriter {
    output_path: PathBuf,
}

impl DataWriter {
    /// Create a new [`DataWriter`]
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        ensure!(
            output_path.is_dir(),
            "Output folder does not exist: {}",
            output_path.display()
        );

        Ok(Self {
            output_path: output_path.to_path_buf(),
        })
    }

    /// Open a CSV writer for a file in the output folder
    fn new_writer(&self, file_name: &str) -> Result<csv::Writer<File>> {
        let file_path = self.output_path.join(file_name);
        csv::Writer::from_path(&file_path)
            .with_context(|| format!("Could not create {}", file_path.display()))
    }

    /// Serialise `rows` to a CSV file in the output folder
    fn write_rows<'a, T, I>(&self, file_name: &str, rows: I) -> Result<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut writer = self.new_writer(file_name)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write everything in a dashboard view to file.
    ///
    /// Chart files which don't apply to the view (e.g. seasonal shares for the overview) aren't
    /// written.
    pub fn write_view(&self, view: &DashboardView) -> Result<()> {
        self.write_statistics(&view.statistics)?;
        self.write_summary(&view.table)?;
        self.write_volume_over_time(&view.volume_over_time)?;
        match &view.charts {
            Charts::Overview { energy_mix } => self.write_energy_mix(energy_mix)?,
            Charts::EnergyType {
                top_regions,
                seasonal_share,
            } => {
                self.write_top_regions(top_regions)?;
                self.write_seasonal_share(seasonal_share)?;
            }
        }

        Ok(())
    }

    /// Write regional statistics in long format, with one row per region and energy type
    pub fn write_statistics(&self, stats: &StatisticsTable) -> Result<()> {
        let rows = stats
            .iter()
            .flat_map(|row| {
                row.iter_shares()
                    .map(|(energy_type, share)| RegionalStatisticsRow {
                        region: row.region.clone(),
                        energy_type: energy_type.clone(),
                        volume: share.total_volume,
                        percentage: share.percentage,
                    })
            })
            .collect::<Vec<_>>();

        self.write_rows(REGIONAL_STATISTICS_FILE_NAME, &rows)
    }

    /// Write the formatted summary table
    pub fn write_summary(&self, table: &DisplayTable) -> Result<()> {
        let mut writer = self.new_writer(REGIONAL_SUMMARY_FILE_NAME)?;
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write the regional pie chart slices
    pub fn write_top_regions(&self, slices: &[RegionSlice]) -> Result<()> {
        self.write_rows(TOP_REGIONS_FILE_NAME, slices)
    }

    /// Write volumes over time
    pub fn write_volume_over_time(&self, points: &[PeriodVolume]) -> Result<()> {
        self.write_rows(VOLUME_OVER_TIME_FILE_NAME, points)
    }

    /// Write the energy mix
    pub fn write_energy_mix(&self, mix: &[EnergyMixEntry]) -> Result<()> {
        self.write_rows(ENERGY_MIX_FILE_NAME, mix)
    }

    /// Write seasonal shares
    pub fn write_seasonal_share(&self, shares: &[SeasonShare]) -> Result<()> {
        self.write_rows(SEASONAL_SHARE_FILE_NAME, shares)
    }

    /// Write map colour values and tooltips
    pub fn write_map(&self, regions: &[MapRegion]) -> Result<()> {
        let rows: Vec<MapRow> = regions.iter().map(MapRow::from).collect();
        self.write_rows(MAP_FILE_NAME, &rows)
    }
}
