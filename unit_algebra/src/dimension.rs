/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::UnitError;

/// Physical dimensions. These can be considered a unit's "type".
/// Every registered unit symbol belongs to exactly one dimension,
/// and each dimension has one standard unit used as the pivot for
/// conversions.
#[derive(
    Serialize,
    Deserialize,
    PartialEq,
    PartialOrd,
    Eq,
    Ord,
    Hash,
    Clone,
    Copy,
    Debug,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum Dimension {
    /* SI base dimensions. */
    Length,
    Mass,
    Time,
    Temperature,
    Current,
    Amount,

    /* Derived dimensions with their own symbols. */
    Energy,
    Pressure,
    Force,

    /* Powers of length. */
    Volume,
    Area,
}

pub(crate) static DIMENSIONS: [Dimension; 11] = [
    Dimension::Length,
    Dimension::Mass,
    Dimension::Time,
    Dimension::Temperature,
    Dimension::Current,
    Dimension::Amount,
    Dimension::Energy,
    Dimension::Pressure,
    Dimension::Force,
    Dimension::Volume,
    Dimension::Area,
];

impl Dimension {
    pub const LIST: &[Self] = &DIMENSIONS;

    pub const fn symbol(&self) -> &'static str {
        match self {
            Dimension::Length => "L",
            Dimension::Mass => "M",
            Dimension::Time => "T",
            Dimension::Temperature => "Θ",
            Dimension::Current => "I",
            Dimension::Amount => "N",
            Dimension::Energy => "E",
            Dimension::Pressure => "P",
            Dimension::Force => "F",
            Dimension::Volume => "L^3",
            Dimension::Area => "L^2",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Mass => "mass",
            Dimension::Time => "time",
            Dimension::Temperature => "temperature",
            Dimension::Current => "current",
            Dimension::Amount => "amount",
            Dimension::Energy => "energy",
            Dimension::Pressure => "pressure",
            Dimension::Force => "force",
            Dimension::Volume => "volume",
            Dimension::Area => "area",
        }
    }

    /// Conversions in this dimension are not purely multiplicative.
    pub const fn is_affine(&self) -> bool {
        matches!(self, Dimension::Temperature)
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dimension {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LIST
            .iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| {
                UnitError::Definitions(format!("unknown dimension: {}", s))
            })
    }
}
