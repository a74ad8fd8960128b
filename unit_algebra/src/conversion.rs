/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::atom::Atom;
use super::dimension::Dimension;

pub type ConversionFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Conversion of a unit to and from its dimension's standard unit.
#[derive(Clone)]
pub enum Conversion {
    /// `standard = value * factor`
    Scale(f64),
    /// `standard = value * scale + offset`
    Affine { scale: f64, offset: f64 },
    Custom {
        to_standard: ConversionFn,
        from_standard: ConversionFn,
    },
}

impl Conversion {
    pub fn to_standard(&self, value: f64) -> f64 {
        match self {
            Conversion::Scale(f) => value * f,
            Conversion::Affine { scale, offset } => value * scale + offset,
            Conversion::Custom { to_standard, .. } => to_standard(value),
        }
    }

    pub fn from_standard(&self, value: f64) -> f64 {
        match self {
            Conversion::Scale(f) => value / f,
            Conversion::Affine { scale, offset } => (value - offset) / scale,
            Conversion::Custom { from_standard, .. } => from_standard(value),
        }
    }

    /// The size of one unit expressed in the standard unit, ignoring
    /// any offset. This is what a unit contributes inside a composite
    /// unit, where only differences are meaningful (eg. W/m^2*F).
    pub fn scale(&self) -> f64 {
        match self {
            Conversion::Scale(f) => *f,
            Conversion::Affine { scale, .. } => *scale,
            Conversion::Custom { to_standard, .. } => {
                to_standard(1.0) - to_standard(0.0)
            }
        }
    }

    /// Chain this conversion (unit -> existing) with the existing
    /// unit's conversion (existing -> standard).
    pub fn then(self, existing: &Conversion) -> Conversion {
        match (self, existing) {
            (Conversion::Scale(a), Conversion::Scale(b)) => {
                Conversion::Scale(a * b)
            }
            (Conversion::Scale(a), Conversion::Affine { scale, offset }) => {
                Conversion::Affine {
                    scale: a * scale,
                    offset: *offset,
                }
            }
            (this, existing) => {
                let (to_a, from_a) = (this.clone(), this);
                let (to_b, from_b) = (existing.clone(), existing.clone());
                Conversion::Custom {
                    to_standard: Arc::new(move |x| {
                        to_b.to_standard(to_a.to_standard(x))
                    }),
                    from_standard: Arc::new(move |x| {
                        from_a.from_standard(from_b.from_standard(x))
                    }),
                }
            }
        }
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Scale(s) => write!(f, "Scale({})", s),
            Conversion::Affine { scale, offset } => {
                write!(f, "Affine({} * x + {})", scale, offset)
            }
            Conversion::Custom { .. } => write!(f, "Custom"),
        }
    }
}

/// The units of one dimension and how they convert to its standard.
#[derive(Clone, Debug)]
pub struct DimensionTable {
    pub dimension: Dimension,
    /// The standard unit. Volume and area use powers of metres.
    pub standard: Atom,
    pub conversions: BTreeMap<String, Conversion>,
}

impl DimensionTable {
    pub fn new(dimension: Dimension, standard: Atom) -> Self {
        DimensionTable {
            dimension,
            standard,
            conversions: BTreeMap::new(),
        }
    }

    pub fn with(mut self, symbol: &str, conversion: Conversion) -> Self {
        self.conversions.insert(symbol.to_string(), conversion);
        self
    }

    pub fn is_standard(&self, symbol: &str) -> bool {
        self.standard.exponent == 1.0 && self.standard.symbol == symbol
    }

    /// Conversion for `symbol`, identity for the standard unit.
    pub fn conversion(&self, symbol: &str) -> Option<Conversion> {
        match self.is_standard(symbol) {
            true => Some(Conversion::Scale(1.0)),
            false => self.conversions.get(symbol).cloned(),
        }
    }
}
