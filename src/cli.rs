//! The command line interface for exploring auction data.
use crate::dashboard::Dashboard;
use crate::energy_type::{EnergyType, EnergyTypeSelection};
use crate::filter::{DateRange, FilterCriteria, parse_month_or};
use crate::id::IDCollection;
use crate::input::read_records;
use crate::log;
use crate::map::{MapMetric, choropleth};
use crate::output::{DataWriter, create_output_directory, get_output_dir};
use crate::record::AuctionRecord;
use crate::region::{RegionID, RegionSelection};
use crate::settings::Settings;
use crate::statistics::aggregate;
use crate::timeline::Granularity;
use ::log::{info, warn};
use anyhow::{Context, Result, bail};
use clap::{Args, CommandFactory, Parser, Subcommand};
use indexmap::IndexSet;
use itertools::Itertools;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for exploring auction data.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the summary command
#[derive(Args, Default)]
pub struct SummaryOpts {
    /// First month to include (YYYY-MM). Defaults to the earliest month in the data.
    #[arg(long)]
    pub from: Option<String>,
    /// Last month to include (YYYY-MM). Defaults to the latest month in the data.
    #[arg(long)]
    pub to: Option<String>,
    /// Region to show in the charts ("All Regions" for every region)
    #[arg(long)]
    pub region: Option<String>,
    /// Energy type to focus on. All renewables are shown if omitted.
    #[arg(long)]
    pub energy_type: Option<String>,
    /// Time step for volumes over time ("monthly" or "yearly")
    #[arg(long, value_parser = parse_label::<Granularity>)]
    pub granularity: Option<Granularity>,
    /// Number of regions shown individually in the regional pie chart
    #[arg(long)]
    pub top_n: Option<usize>,
    /// Value used to colour the map when an energy type is selected ("percentage" or "volume")
    #[arg(long, value_parser = parse_label::<MapMetric>)]
    pub map_metric: Option<MapMetric>,
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Parse an option using the same labels as the settings file
fn parse_label<T>(s: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    s.parse().map_err(|err: T::Err| err.to_string())
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Summarise auction data by region and write the results to CSV files.
    Summary {
        /// Path to the auction data CSV file.
        data_file: PathBuf,
        /// Other summary options
        #[command(flatten)]
        opts: SummaryOpts,
    },
    /// Validate an auction data file.
    Validate {
        /// Path to the auction data CSV file.
        data_file: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Summary { data_file, opts } => handle_summary_command(&data_file, &opts, None),
            Self::Validate { data_file } => handle_validate_command(&data_file, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ enr_auctions --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Warn if the selected region or energy type never appears in the data
fn warn_unknown_selection(records: &[AuctionRecord], criteria: &FilterCriteria) {
    if let RegionSelection::Only(region) = &criteria.region {
        let regions: IndexSet<RegionID> = records.iter().map(|r| r.region.clone()).collect();
        if let Err(err) = regions.get_id_by_str(region.as_str()) {
            warn!("Region not in data: {err}");
        }
    }

    if let Some(energy_type) = criteria.energy_type.energy_type() {
        let energy_types: IndexSet<EnergyType> =
            records.iter().map(|r| r.energy_type.clone()).collect();
        if let Err(err) = energy_types.get_id_by_str(energy_type.as_str()) {
            warn!("Energy type not in data: {err}");
        }
    }
}

/// Build the filter criteria from the command-line options
fn build_criteria(records: &[AuctionRecord], opts: &SummaryOpts) -> Result<FilterCriteria> {
    let Some(span) = DateRange::spanning(records) else {
        bail!("No auction records found");
    };

    let start = parse_month_or(opts.from.as_deref(), span.start)?;
    let end = parse_month_or(opts.to.as_deref(), span.end)?;
    if start > end {
        warn!("Start month {start} is after end month {end}: no records will be selected");
    }

    Ok(FilterCriteria {
        date_range: DateRange::months(start, end),
        region: opts
            .region
            .as_deref()
            .map_or(RegionSelection::All, RegionSelection::from),
        energy_type: opts
            .energy_type
            .as_deref()
            .map_or(EnergyTypeSelection::All, EnergyTypeSelection::from),
    })
}

/// Handle the `summary` command.
pub fn handle_summary_command(
    data_file: &Path,
    opts: &SummaryOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(data_file)?;
        &pathbuf
    };

    let allow_overwrite = opts.overwrite || settings.overwrite;
    let overwrite = create_output_directory(output_path, allow_overwrite).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_path.display()
        )
    })?;

    // Initialise program logger
    log::init(Some(settings.log_level.as_str()), Some(output_path))
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let records = read_records(data_file).context("Failed to load auction data.")?;
    info!("Output folder: {}", output_path.display());

    let criteria = build_criteria(&records, opts)?;
    warn_unknown_selection(&records, &criteria);
    info!(
        "Summarising {} to {} for {} and {}",
        criteria.date_range.start,
        criteria.date_range.end,
        criteria.region,
        criteria.energy_type
    );

    let dashboard = Dashboard::new(records);
    let granularity = opts.granularity.unwrap_or(settings.granularity);
    let top_n = opts.top_n.unwrap_or(settings.top_n);
    let view = dashboard.view(&criteria, granularity, top_n)?;

    let map_metric = opts.map_metric.unwrap_or(settings.map_metric);
    let region_names: Vec<RegionID> = view.statistics.iter().map(|r| r.region.clone()).collect();
    let map = choropleth(
        &view.statistics,
        &criteria.energy_type,
        map_metric,
        &region_names,
    );

    let writer = DataWriter::create(output_path)?;
    writer.write_view(&view)?;
    writer.write_map(&map)?;
    info!(
        "Summary of {} regions written to {}",
        view.statistics.len(),
        output_path.display()
    );

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(data_file: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    // Load the data and check that the statistics are consistent
    let records = read_records(data_file).context("Failed to validate auction data.")?;
    let stats = aggregate(&records);
    let inconsistent: Vec<&RegionID> = stats.inconsistent_regions().collect();
    if !inconsistent.is_empty() {
        bail!(
            "Regional statistics don't add up for: {}",
            inconsistent.iter().join(", ")
        );
    }

    info!(
        "Validation successful! {} records across {} regions and {} energy types",
        records.len(),
        stats.len(),
        stats.energy_types().len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::records;
    use rstest::rstest;

    #[rstest]
    fn test_build_criteria_defaults(records: Vec<AuctionRecord>) {
        let criteria = build_criteria(&records, &SummaryOpts::default()).unwrap();
        assert_eq!(criteria, FilterCriteria::new(DateRange::years(2020, 2021).unwrap()));
    }

    #[rstest]
    fn test_build_criteria_options(records: Vec<AuctionRecord>) {
        let opts = SummaryOpts {
            from: Some("2021-01".into()),
            region: Some("Bretagne".into()),
            energy_type: Some("Solar".into()),
            ..SummaryOpts::default()
        };
        let criteria = build_criteria(&records, &opts).unwrap();
        assert_eq!(criteria.date_range.start.to_string(), "2021-01");
        assert_eq!(criteria.date_range.end.to_string(), "2021-12");
        assert_eq!(criteria.region, RegionSelection::Only("Bretagne".into()));
        assert_eq!(criteria.energy_type, EnergyTypeSelection::Only("Solar".into()));
    }

    #[rstest]
    fn test_build_criteria_all_regions(records: Vec<AuctionRecord>) {
        let opts = SummaryOpts {
            region: Some("All Regions".into()),
            ..SummaryOpts::default()
        };
        let criteria = build_criteria(&records, &opts).unwrap();
        assert_eq!(criteria.region, RegionSelection::All);
    }

    #[rstest]
    fn test_build_criteria_bad_month(records: Vec<AuctionRecord>) {
        let opts = SummaryOpts {
            to: Some("December".into()),
            ..SummaryOpts::default()
        };
        assert!(build_criteria(&records, &opts).is_err());
    }

    #[test]
    fn test_build_criteria_no_records() {
        assert!(build_criteria(&[], &SummaryOpts::default()).is_err());
    }

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from([
            "enr_auctions",
            "summary",
            "auctions.csv",
            "--energy-type",
            "Solar",
            "--granularity",
            "monthly",
            "--top-n",
            "3",
        ])
        .unwrap();
        let Some(Commands::Summary { data_file, opts }) = cli.command else {
            panic!("Expected summary command");
        };
        assert_eq!(data_file, PathBuf::from("auctions.csv"));
        assert_eq!(opts.energy_type.as_deref(), Some("Solar"));
        assert_eq!(opts.granularity, Some(Granularity::Monthly));
        assert_eq!(opts.top_n, Some(3));
        assert!(!opts.overwrite);
    }

    #[test]
    fn test_cli_parse_map_metric_uses_settings_labels() {
        let cli = Cli::try_parse_from([
            "enr_auctions",
            "summary",
            "auctions.csv",
            "--map-metric",
            "volume",
        ])
        .unwrap();
        let Some(Commands::Summary { opts, .. }) = cli.command else {
            panic!("Expected summary command");
        };
        assert_eq!(opts.map_metric, Some(MapMetric::VolumeSold));

        assert!(
            Cli::try_parse_from([
                "enr_auctions",
                "summary",
                "auctions.csv",
                "--map-metric",
                "volume-sold",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "enr_auctions",
                "summary",
                "auctions.csv",
                "--granularity",
                "weekly",
            ])
            .is_err()
        );
    }
}
