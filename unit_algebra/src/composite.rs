/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::atom::{self, Atom};
use super::error::UnitError;
use super::parser::{parse_quantity, parse_units};
use super::system::UnitSystem;

/// A quantity in a unit made of several atoms, eg. `5 kg*m/s^2`.
/// Atoms are kept as given; arithmetic results are combined,
/// cancelled and simplified.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Composite {
    pub value: f64,
    pub numerator: Vec<Atom>,
    pub denominator: Vec<Atom>,
}

impl Composite {
    pub fn new(value: f64, unit: &str) -> Result<Self, UnitError> {
        let (numerator, denominator) = parse_units(unit)?;
        Ok(Self::from_atoms(value, numerator, denominator))
    }

    pub fn from_atoms(
        value: f64,
        numerator: Vec<Atom>,
        denominator: Vec<Atom>,
    ) -> Self {
        Composite {
            value,
            numerator,
            denominator,
        }
    }

    /// Parse a quantity string such as `5 kg/m*s^2`.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        let (value, (numerator, denominator)) = parse_quantity(input)?;
        Ok(Self::from_atoms(value, numerator, denominator))
    }

    pub fn unit(&self) -> String {
        atom::render(&self.numerator, &self.denominator)
    }

    /// Sum of all exponents, eg. 4 for `m^2/s^2`.
    pub fn exponent_total(&self) -> f64 {
        self.numerator
            .iter()
            .chain(self.denominator.iter())
            .map(|a| a.exponent)
            .sum()
    }

    /// Same atoms on both sides, ignoring order.
    pub fn same_unit(&self, other: &Composite) -> bool {
        atom::same_set(&self.numerator, &other.numerator)
            && atom::same_set(&self.denominator, &other.denominator)
    }

    pub fn convert_to(&self, target: &str) -> Result<Self, UnitError> {
        self.convert_in(UnitSystem::shared(), target)
    }

    /// Express the quantity in `target`, which must reduce to the same
    /// base dimensions.
    pub fn convert_in(
        &self,
        system: &UnitSystem,
        target: &str,
    ) -> Result<Self, UnitError> {
        let (numerator, denominator) = parse_units(target)?;
        let target = Self::from_atoms(self.value, numerator, denominator);
        if self.same_unit(&target) {
            return Ok(self.clone());
        }
        let factor = system.conversion_factor(
            (self.numerator.as_slice(), self.denominator.as_slice()),
            (target.numerator.as_slice(), target.denominator.as_slice()),
        )?;
        Ok(Self::from_atoms(
            self.value * factor,
            target.numerator,
            target.denominator,
        ))
    }

    pub fn convert_in_place(&mut self, target: &str) -> Result<(), UnitError> {
        *self = self.convert_to(target)?;
        Ok(())
    }
}

impl Display for Composite {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.value, self.unit())
    }
}

#[cfg(test)]
mod tests {
    use super::Composite;

    #[test]
    fn exponent_total() {
        let c = Composite::new(5.0, "m^2/s^2").unwrap();
        assert_eq!(c.exponent_total(), 4.0);
    }

    #[test]
    fn in_place() {
        let mut c = Composite::new(3.0, "m/s").unwrap();
        c.convert_in_place("cm/s").unwrap();
        assert!((c.value - 300.0).abs() < 1e-9);
        assert_eq!(c.unit(), "cm/s");
        assert!(c.convert_in_place("kg").is_err());
        assert_eq!(c.unit(), "cm/s");
    }

    #[test]
    fn display() {
        let c = Composite::parse("2.5 kg/m*s^2").unwrap();
        assert_eq!(c.to_string(), "2.5 kg/m*s^2");
        let c = Composite::new(1.0, "1/s").unwrap();
        assert_eq!(c.to_string(), "1 1/s");
    }
}
