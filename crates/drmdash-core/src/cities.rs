//! # City Size Classes
//!
//! Population bands used to color cities in the urban-system charts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// City size band, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitySize {
    TenMillionPlus,
    FiveToTenMillion,
    OneToFiveMillion,
    HalfToOneMillion,
    ThreeHundredThousandToHalfMillion,
    UnderThreeHundredThousand,
}

impl CitySize {
    /// Every band, largest first.
    pub const ALL: [CitySize; 6] = [
        Self::TenMillionPlus,
        Self::FiveToTenMillion,
        Self::OneToFiveMillion,
        Self::HalfToOneMillion,
        Self::ThreeHundredThousandToHalfMillion,
        Self::UnderThreeHundredThousand,
    ];

    /// Lower bound of the band, in thousands of inhabitants.
    #[must_use]
    pub const fn lower_bound_thousands(self) -> u32 {
        match self {
            Self::TenMillionPlus => 10_000,
            Self::FiveToTenMillion => 5_000,
            Self::OneToFiveMillion => 1_000,
            Self::HalfToOneMillion => 500,
            Self::ThreeHundredThousandToHalfMillion => 300,
            Self::UnderThreeHundredThousand => 0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TenMillionPlus => "10 million or more",
            Self::FiveToTenMillion => "5 to 10 million",
            Self::OneToFiveMillion => "1 to 5 million",
            Self::HalfToOneMillion => "500 000 to 1 million",
            Self::ThreeHundredThousandToHalfMillion => "300 000 to 500 000",
            Self::UnderThreeHundredThousand => "Fewer than 300 000",
        }
    }

    /// Band for a population given in thousands.
    #[must_use]
    pub fn from_thousands(population_thousands: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| population_thousands >= f64::from(band.lower_bound_thousands()))
            .unwrap_or(Self::UnderThreeHundredThousand)
    }

    /// Band for an absolute head count. Missing, zero or non-finite
    /// populations fall into the smallest band.
    #[must_use]
    pub fn from_population(population: Option<f64>) -> Self {
        match population {
            Some(p) if p.is_finite() && p > 0.0 => Self::from_thousands(p / 1000.0),
            _ => Self::UnderThreeHundredThousand,
        }
    }
}

impl fmt::Display for CitySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
