//! Fixtures for tests
use crate::record::{AuctionRecord, Month};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Shorthand for a month in tests
pub fn month(s: &str) -> Month {
    s.parse().unwrap()
}

/// Shorthand for an [`AuctionRecord`] in tests
pub fn record(date: &str, region: &str, energy_type: &str, volume: f64) -> AuctionRecord {
    AuctionRecord::new(month(date), region, energy_type, volume)
}

/// The worked example: Paris sells solar and wind, Lyon only solar
#[fixture]
pub fn paris_lyon_records() -> Vec<AuctionRecord> {
    vec![
        record("2021-01", "Paris", "Solar", 100.0),
        record("2021-01", "Paris", "Wind", 300.0),
        record("2021-02", "Lyon", "Solar", 50.0),
    ]
}

/// A small dataset spanning two years, four regions and four energy types
#[fixture]
pub fn records() -> Vec<AuctionRecord> {
    vec![
        record("2020-01", "Bretagne", "Onshore Wind", 1_200_000.0),
        record("2020-01", "Bretagne", "Solar", 300_000.0),
        record("2020-04", "Occitanie", "Solar", 2_500_000.0),
        record("2020-07", "Occitanie", "Hydropower", 750_000.0),
        record("2020-07", "Grand Est", "Hydropower", 400_000.0),
        record("2020-10", "Grand Est", "Onshore Wind", 900_000.0),
        record("2021-01", "Bretagne", "Onshore Wind", 800_000.0),
        record("2021-02", "Occitanie", "Geothermal", 150_000.0),
        record("2021-06", "Normandie", "Solar", 0.0),
        record("2021-08", "Occitanie", "Solar", 1_100_000.0),
        record("2021-11", "Grand Est", "Solar", 200_000.0),
        record("2021-12", "Bretagne", "Hydropower", 50_000.0),
    ]
}

/// One solar record for each of eight regions, with distinct volumes
#[fixture]
pub fn eight_solar_regions() -> Vec<AuctionRecord> {
    [
        ("Auvergne-Rhône-Alpes", 80.0),
        ("Bretagne", 10.0),
        ("Centre-Val de Loire", 30.0),
        ("Grand Est", 70.0),
        ("Hauts-de-France", 20.0),
        ("Normandie", 40.0),
        ("Nouvelle-Aquitaine", 60.0),
        ("Occitanie", 50.0),
    ]
    .into_iter()
    .map(|(region, volume)| record("2022-03", region, "Solar", volume))
    .collect()
}
