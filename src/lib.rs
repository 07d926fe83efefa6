//! Regional statistics for French renewable-electricity auction data.
//!
//! Auction records are filtered by date, region and energy type, aggregated per region and turned
//! into the tables and chart data shown by the dashboard.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod dashboard;
pub mod display;
pub mod energy_type;
pub mod filter;
pub mod id;
pub mod input;
pub mod log;
pub mod map;
pub mod output;
pub mod record;
pub mod region;
pub mod settings;
pub mod statistics;
pub mod timeline;
pub mod top_n;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory in which the program's config files are stored
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("enr_auctions");
    path
}
