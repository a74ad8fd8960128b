/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::atom::Atom;
use super::dimension::Dimension;
use super::error::UnitError;
use super::parser::parse_units;
use super::quantity::Quantity;
use super::system::UnitSystem;

/// A quantity in a single unit, eg. `5 m^2`.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Scalar {
    pub value: f64,
    pub symbol: String,
    pub exponent: f64,
}

impl Scalar {
    pub fn new<S: Into<String>>(value: f64, symbol: S) -> Self {
        Self::with_exponent(value, symbol, 1.0)
    }

    pub fn with_exponent<S: Into<String>>(
        value: f64,
        symbol: S,
        exponent: f64,
    ) -> Self {
        Scalar {
            value,
            symbol: symbol.into(),
            exponent,
        }
    }

    /// Construct a scalar of the given dimension, eg.
    /// `Scalar::of(Dimension::Pressure, 5.0, "kPa")`. Volumes and areas
    /// may also be given as powers of a length (`ft^3`).
    pub fn of(
        dimension: Dimension,
        value: f64,
        unit: &str,
    ) -> Result<Self, UnitError> {
        Self::of_in(UnitSystem::shared(), dimension, value, unit)
    }

    pub fn of_in(
        system: &UnitSystem,
        dimension: Dimension,
        value: f64,
        unit: &str,
    ) -> Result<Self, UnitError> {
        let wrong = || UnitError::WrongDimension {
            symbol: unit.to_string(),
            dimension,
        };
        let (num, den) = parse_units(unit)?;
        let atom = match (num.as_slice(), den.is_empty()) {
            ([atom], true) => atom,
            _ => return Err(wrong()),
        };
        let found = system.dimension_of(&atom.symbol)?;
        let matches = match (dimension, found) {
            (d, f) if d == f => true,
            (Dimension::Volume, Dimension::Length) => atom.exponent == 3.0,
            (Dimension::Area, Dimension::Length) => atom.exponent == 2.0,
            _ => false,
        };
        match matches {
            true => Ok(Self::with_exponent(
                value,
                atom.symbol.as_str(),
                atom.exponent,
            )),
            false => Err(wrong()),
        }
    }

    pub fn atom(&self) -> Atom {
        Atom::new(self.symbol.as_str(), self.exponent)
    }

    /// Numerator and denominator atoms. A negative exponent puts the
    /// atom in the denominator.
    pub fn as_atoms(&self) -> (Vec<Atom>, Vec<Atom>) {
        match self.exponent < 0.0 {
            true => (Vec::new(), vec![self.atom().powf(-1.0)]),
            false => (vec![self.atom()], Vec::new()),
        }
    }

    pub fn dimension(&self) -> Result<Dimension, UnitError> {
        UnitSystem::shared().dimension_of(&self.symbol)
    }

    pub fn unit(&self) -> String {
        self.atom().to_string()
    }

    /// Convert to another unit using the shared system.
    pub fn convert_to(&self, target: &str) -> Result<Quantity, UnitError> {
        self.convert_in(UnitSystem::shared(), target)
    }

    /// Convert to another unit. A single unit of the same dimension
    /// converts directly, with offsets (`300 C -> 573.15 K`). Powers
    /// of units convert by their scale only. Anything else goes
    /// through the base dimensions.
    pub fn convert_in(
        &self,
        system: &UnitSystem,
        target: &str,
    ) -> Result<Quantity, UnitError> {
        let (num, den) = parse_units(target)?;

        if let ([atom], true) = (num.as_slice(), den.is_empty()) {
            if atom.symbol == self.symbol && atom.exponent == self.exponent {
                return Ok(Quantity::Scalar(self.clone()));
            }
            if atom.exponent == self.exponent {
                if let (Ok((from_dim, from)), Ok((to_dim, to))) =
                    (system.resolve(&self.symbol), system.resolve(&atom.symbol))
                {
                    if from_dim == to_dim {
                        let value = match self.exponent == 1.0 {
                            true => to.from_standard(from.to_standard(self.value)),
                            false => {
                                self.value
                                    * (from.scale() / to.scale())
                                        .powf(self.exponent)
                            }
                        };
                        return Ok(Quantity::Scalar(Scalar::with_exponent(
                            value,
                            atom.symbol.as_str(),
                            atom.exponent,
                        )));
                    }
                }
            }
        }

        let (self_num, self_den) = self.as_atoms();
        let factor = system.conversion_factor(
            (self_num.as_slice(), self_den.as_slice()),
            (num.as_slice(), den.as_slice()),
        )?;
        Ok(Quantity::collapse(self.value * factor, num, den))
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.value, self.atom())
    }
}

#[cfg(test)]
mod tests {
    use super::Scalar;
    use crate::{Dimension, Quantity, UnitError};

    #[test]
    fn checked_construction() {
        assert!(Scalar::of(Dimension::Pressure, 5.0, "kPa").is_ok());
        assert!(Scalar::of(Dimension::Volume, 5.0, "ft^3").is_ok());
        assert!(Scalar::of(Dimension::Volume, 5.0, "L").is_ok());
        assert_eq!(
            Scalar::of(Dimension::Mass, 5.0, "m"),
            Err(UnitError::WrongDimension {
                symbol: "m".to_string(),
                dimension: Dimension::Mass
            })
        );
        assert_eq!(
            Scalar::of(Dimension::Mass, 5.0, "foo"),
            Err(UnitError::Unregistered("foo".to_string()))
        );
    }

    #[test]
    fn temperature_offsets() {
        let q = Scalar::new(300.0, "C").convert_to("K").unwrap();
        assert!(q.approx_eq(&Quantity::scalar(573.15, "K"), 1e-12));
        let q = Scalar::new(32.0, "F").convert_to("C").unwrap();
        assert!(q.approx_eq(&Quantity::scalar(0.0, "C"), 1e-9));
        let q = Scalar::new(491.67, "R").convert_to("K").unwrap();
        assert!(q.approx_eq(&Quantity::scalar(273.15, "K"), 1e-9));
    }

    #[test]
    fn negative_exponent_atoms() {
        let s = Scalar::with_exponent(2.0, "s", -2.0);
        let (num, den) = s.as_atoms();
        assert!(num.is_empty());
        assert_eq!(den[0].exponent, 2.0);
        assert_eq!(s.to_string(), "2 s^-2");
    }
}
