//! Regions are the administrative areas of France by which auction data is aggregated.
use crate::id::define_id_type;
use std::fmt;

define_id_type! {RegionID}

/// The label used by the dashboard to mean "no region filter"
pub const ALL_REGIONS: &str = "All Regions";

/// The region currently selected on the map.
///
/// The selection is owned by the calling layer and passed into each pipeline call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum RegionSelection {
    /// No region filter
    #[default]
    All,
    /// A single region, matched by exact name
    Only(RegionID),
}

impl RegionSelection {
    /// Whether the given region is included in the selection
    pub fn contains(&self, region: &RegionID) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == region,
        }
    }
}

impl From<&str> for RegionSelection {
    /// Parse a selection, treating [`ALL_REGIONS`] as no filter
    fn from(s: &str) -> Self {
        if s == ALL_REGIONS {
            Self::All
        } else {
            Self::Only(s.into())
        }
    }
}

impl fmt::Display for RegionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_REGIONS}"),
            Self::Only(region) => write!(f, "{region}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("All Regions", RegionSelection::All)]
    #[case("Bretagne", RegionSelection::Only("Bretagne".into()))]
    #[case("all regions", RegionSelection::Only("all regions".into()))] // exact match only
    fn test_region_selection_from_str(#[case] input: &str, #[case] expected: RegionSelection) {
        assert_eq!(RegionSelection::from(input), expected);
    }

    #[test]
    fn test_region_selection_contains() {
        let region: RegionID = "Occitanie".into();
        assert!(RegionSelection::All.contains(&region));
        assert!(RegionSelection::from("Occitanie").contains(&region));
        assert!(!RegionSelection::from("Grand Est").contains(&region));
    }

    #[test]
    fn test_region_selection_display() {
        assert_eq!(RegionSelection::All.to_string(), "All Regions");
        assert_eq!(RegionSelection::from("Corse").to_string(), "Corse");
    }
}
