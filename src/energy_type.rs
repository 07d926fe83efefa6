//! Energy types are the categories of renewable source found in the auction data.
//!
//! The set of energy types is not fixed: it is discovered from whatever records are being
//! aggregated.
use crate::id::define_id_type;
use std::fmt;

define_id_type! {EnergyType}

/// The energy type selected by the user, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EnergyTypeSelection {
    /// No energy type filter
    #[default]
    All,
    /// A single energy type, matched by exact name
    Only(EnergyType),
}

impl EnergyTypeSelection {
    /// Whether the given energy type is included in the selection
    pub fn contains(&self, energy_type: &EnergyType) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == energy_type,
        }
    }

    /// The selected energy type, if there is one
    pub fn energy_type(&self) -> Option<&EnergyType> {
        match self {
            Self::All => None,
            Self::Only(energy_type) => Some(energy_type),
        }
    }
}

impl From<&str> for EnergyTypeSelection {
    /// Parse a selection, treating the empty string as no filter
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::All
        } else {
            Self::Only(s.into())
        }
    }
}

impl From<Option<EnergyType>> for EnergyTypeSelection {
    fn from(energy_type: Option<EnergyType>) -> Self {
        energy_type.map_or(Self::All, Self::Only)
    }
}

impl fmt::Display for EnergyTypeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All Renewables"),
            Self::Only(energy_type) => write!(f, "{energy_type}"),
        }
    }
}
