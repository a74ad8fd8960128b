/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::conversion::Conversion;
use super::dimension::Dimension;
use super::error::UnitError;
use super::system::UnitSystem;

/// Extra units to add to a system, usually read from a JSON file:
///
/// ```json
/// {
///   "units": [
///     { "symbol": "ksi", "from": "psi", "scale": 1000.0 },
///     { "symbol": "furlong", "dimension": "Length", "scale": 201.168 }
///   ],
///   "derived": [{ "symbol": "kWh", "expansion": "kW*hr" }]
/// }
/// ```
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct Definitions {
    #[serde(default)]
    pub units: Vec<UnitDefinition>,
    #[serde(default)]
    pub derived: Vec<DerivedDefinition>,
}

/// A unit defined as `value * scale + offset` in either an existing
/// unit (`from`) or a dimension's standard unit (`dimension`).
#[derive(Serialize, Deserialize, Clone, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct UnitDefinition {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Dimension>,
    pub scale: f64,
    #[serde(default)]
    pub offset: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct DerivedDefinition {
    pub symbol: String,
    pub expansion: String,
}

impl Definitions {
    pub fn from_json(input: &str) -> Result<Self, UnitError> {
        serde_json::from_str(input)
            .map_err(|e| UnitError::Definitions(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, UnitError> {
        let data = fs::read_to_string(path).map_err(|e| {
            UnitError::Definitions(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&data)
    }

    /// Add the definitions to `system`. Units are registered in order,
    /// so later units may refer to earlier ones; derived units come
    /// last.
    pub fn apply(&self, system: &mut UnitSystem) -> Result<(), UnitError> {
        for unit in &self.units {
            unit.apply(system)?;
        }
        for derived in &self.derived {
            system.define_derived(&derived.symbol, &derived.expansion)?;
        }
        info!(
            "loaded {} unit(s) and {} derived unit(s)",
            self.units.len(),
            self.derived.len()
        );
        Ok(())
    }
}

impl UnitDefinition {
    fn conversion(&self) -> Result<Conversion, UnitError> {
        if !self.scale.is_finite() || self.scale == 0.0 || !self.offset.is_finite()
        {
            return Err(UnitError::Definitions(format!(
                "{}: invalid scale or offset",
                self.symbol
            )));
        }
        Ok(match self.offset == 0.0 {
            true => Conversion::Scale(self.scale),
            false => Conversion::Affine {
                scale: self.scale,
                offset: self.offset,
            },
        })
    }

    fn apply(&self, system: &mut UnitSystem) -> Result<(), UnitError> {
        let conversion = self.conversion()?;
        match (&self.from, self.dimension) {
            (Some(existing), None) => {
                system.register_relative(&self.symbol, existing, conversion)
            }
            (None, Some(dimension)) => {
                system.register(&self.symbol, dimension, conversion)
            }
            _ => Err(UnitError::Definitions(format!(
                "{}: exactly one of 'from' and 'dimension' is required",
                self.symbol
            ))),
        }
    }
}

impl UnitSystem {
    /// The standard system extended with a definitions file.
    pub fn with_definitions(path: &Path) -> Result<Self, UnitError> {
        let mut system = Self::standard();
        Definitions::load(path)?.apply(&mut system)?;
        Ok(system)
    }
}
