/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use super::atom::{self, Atom};
use super::composite::Composite;
use super::error::UnitError;
use super::parser::{parse_quantity, parse_units};
use super::scalar::Scalar;
use super::system::UnitSystem;

/// A value with a unit: a bare number, a single unit or a composite
/// unit. Results of arithmetic collapse to the simplest variant.
#[derive(Clone, Debug)]
#[cfg_attr(
    not(feature = "serialize_as_string"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(
    feature = "serialize_as_string",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
#[cfg_attr(
    all(feature = "schemars", not(feature = "serialize_as_string")),
    derive(schemars::JsonSchema)
)]
pub enum Quantity {
    Number(f64),
    Scalar(Scalar),
    Composite(Composite),
}

impl Quantity {
    /// A quantity in `unit`. An empty unit gives a bare number.
    pub fn new(value: f64, unit: &str) -> Result<Self, UnitError> {
        match unit.trim().is_empty() {
            true => Ok(Quantity::Number(value)),
            false => {
                let (numerator, denominator) = parse_units(unit)?;
                Ok(Self::collapse(value, numerator, denominator))
            }
        }
    }

    pub fn scalar<S: Into<String>>(value: f64, symbol: S) -> Self {
        Quantity::Scalar(Scalar::new(value, symbol))
    }

    /// A composite quantity with the atoms as given.
    pub fn from_atoms(
        value: f64,
        numerator: Vec<Atom>,
        denominator: Vec<Atom>,
    ) -> Self {
        Quantity::Composite(Composite::from_atoms(value, numerator, denominator))
    }

    /// Parse a quantity string such as `5 kg/m*s^2` or `2.5`.
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        let (value, (numerator, denominator)) = parse_quantity(input)?;
        Ok(Self::collapse(value, numerator, denominator))
    }

    /// The simplest variant for the given atoms: a bare number without
    /// atoms, a scalar for a single atom (negated exponent when it is
    /// in the denominator) and a composite otherwise.
    pub fn collapse(
        value: f64,
        numerator: Vec<Atom>,
        denominator: Vec<Atom>,
    ) -> Self {
        match (numerator.len(), denominator.len()) {
            (0, 0) => Quantity::Number(value),
            (1, 0) => {
                let a = &numerator[0];
                Self::power(value, &a.symbol, a.exponent)
            }
            (0, 1) => {
                let a = &denominator[0];
                Self::power(value, &a.symbol, -a.exponent)
            }
            _ => Self::from_atoms(value, numerator, denominator),
        }
    }

    fn power(value: f64, symbol: &str, exponent: f64) -> Self {
        match atom::is_zero(exponent) {
            true => Quantity::Number(value),
            false => {
                Quantity::Scalar(Scalar::with_exponent(value, symbol, exponent))
            }
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Quantity::Number(v) => *v,
            Quantity::Scalar(s) => s.value,
            Quantity::Composite(c) => c.value,
        }
    }

    pub fn with_value(&self, value: f64) -> Self {
        match self {
            Quantity::Number(_) => Quantity::Number(value),
            Quantity::Scalar(s) => Quantity::Scalar(Scalar { value, ..s.clone() }),
            Quantity::Composite(c) => {
                Quantity::Composite(Composite { value, ..c.clone() })
            }
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        self.with_value(self.value() * factor)
    }

    /// Numerator and denominator atoms.
    pub fn as_atoms(&self) -> (Vec<Atom>, Vec<Atom>) {
        match self {
            Quantity::Number(_) => (Vec::new(), Vec::new()),
            Quantity::Scalar(s) => s.as_atoms(),
            Quantity::Composite(c) => {
                (c.numerator.clone(), c.denominator.clone())
            }
        }
    }

    pub fn unit(&self) -> String {
        match self {
            Quantity::Number(_) => String::new(),
            Quantity::Scalar(s) => s.unit(),
            Quantity::Composite(c) => c.unit(),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Quantity::Number(_))
    }

    /// Same unit atoms, ignoring order.
    pub fn same_unit(&self, other: &Quantity) -> bool {
        let (a_num, a_den) = self.as_atoms();
        let (b_num, b_den) = other.as_atoms();
        atom::same_set(&a_num, &b_num) && atom::same_set(&a_den, &b_den)
    }

    /// Equal units and values within a relative tolerance (absolute
    /// for values below one).
    pub fn approx_eq(&self, other: &Quantity, tolerance: f64) -> bool {
        let (a, b) = (self.value(), other.value());
        self.same_unit(other)
            && (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
    }

    /// Fails with [`UnitError::IncorrectUnits`] unless the quantity is
    /// given in `expected`. Bare numbers are accepted as is.
    pub fn check_unit(&self, expected: &str, name: &str) -> Result<(), UnitError> {
        if self.is_number() {
            return Ok(());
        }
        let (numerator, denominator) = parse_units(expected)?;
        match self.same_unit(&Self::collapse(1.0, numerator, denominator)) {
            true => Ok(()),
            false => Err(UnitError::IncorrectUnits {
                name: name.to_string(),
                expected: expected.to_string(),
                found: self.unit(),
            }),
        }
    }

    pub fn pow(&self, n: i32) -> Result<Self, UnitError> {
        self.powf(n as f64)
    }

    pub fn powf(&self, n: f64) -> Result<Self, UnitError> {
        UnitSystem::shared().powf(self, n)
    }

    /// Convert using the shared system.
    pub fn convert_to(&self, target: &str) -> Result<Self, UnitError> {
        UnitSystem::shared().convert(self, target)
    }

    pub fn convert_in_place(&mut self, target: &str) -> Result<(), UnitError> {
        *self = self.convert_to(target)?;
        Ok(())
    }

    fn additive(
        &self,
        rhs: &Quantity,
        op: char,
        f: fn(f64, f64) -> f64,
    ) -> Result<Quantity, UnitError> {
        match (self, rhs) {
            (Quantity::Number(a), Quantity::Number(b)) => {
                Ok(Quantity::Number(f(*a, *b)))
            }
            (Quantity::Scalar(_), Quantity::Number(b)) => {
                Ok(self.with_value(f(self.value(), *b)))
            }
            (Quantity::Number(a), Quantity::Scalar(_)) => {
                Ok(rhs.with_value(f(*a, rhs.value())))
            }
            (Quantity::Composite(_), Quantity::Number(_))
            | (Quantity::Number(_), Quantity::Composite(_)) => {
                Err(UnitError::TypeMismatch {
                    lhs: self.to_string(),
                    rhs: rhs.to_string(),
                    op,
                })
            }
            _ if self.same_unit(rhs) => {
                Ok(self.with_value(f(self.value(), rhs.value())))
            }
            _ => Err(UnitError::Mismatch {
                lhs: self.unit(),
                rhs: rhs.unit(),
                op,
            }),
        }
    }
}

/* Arithmetic that rewrites units needs the system's tables. */

impl UnitSystem {
    pub fn add(&self, lhs: &Quantity, rhs: &Quantity) -> Result<Quantity, UnitError> {
        lhs.additive(rhs, '+', |a, b| a + b)
    }

    pub fn sub(&self, lhs: &Quantity, rhs: &Quantity) -> Result<Quantity, UnitError> {
        lhs.additive(rhs, '-', |a, b| a - b)
    }

    pub fn mul(&self, lhs: &Quantity, rhs: &Quantity) -> Result<Quantity, UnitError> {
        match (lhs, rhs) {
            (Quantity::Number(n), q) | (q, Quantity::Number(n)) => {
                Ok(q.scaled(*n))
            }
            (Quantity::Scalar(a), Quantity::Scalar(b)) if a.symbol == b.symbol => {
                Ok(Quantity::power(
                    a.value * b.value,
                    &a.symbol,
                    a.exponent + b.exponent,
                ))
            }
            _ => {
                let (mut numerator, mut denominator) = lhs.as_atoms();
                let (rhs_num, rhs_den) = rhs.as_atoms();
                numerator.extend(rhs_num);
                denominator.extend(rhs_den);
                self.collapsed(lhs.value() * rhs.value(), &numerator, &denominator)
            }
        }
    }

    pub fn div(&self, lhs: &Quantity, rhs: &Quantity) -> Result<Quantity, UnitError> {
        match (lhs, rhs) {
            (q, Quantity::Number(n)) => Ok(q.scaled(1.0 / n)),
            (Quantity::Number(n), q) => {
                let (numerator, denominator) = q.as_atoms();
                Ok(Quantity::collapse(n / q.value(), denominator, numerator))
            }
            (Quantity::Scalar(a), Quantity::Scalar(b)) if a.symbol == b.symbol => {
                Ok(Quantity::power(
                    a.value / b.value,
                    &a.symbol,
                    a.exponent - b.exponent,
                ))
            }
            (Quantity::Scalar(a), Quantity::Scalar(b)) => {
                let (numerator, denominator) = atom::reduce(&[a.atom()], &[b.atom()]);
                Ok(Quantity::from_atoms(a.value / b.value, numerator, denominator))
            }
            (Quantity::Composite(a), Quantity::Composite(b)) if a.same_unit(b) => {
                Ok(Quantity::Number(a.value / b.value))
            }
            _ => {
                let (mut numerator, mut denominator) = lhs.as_atoms();
                let (rhs_num, rhs_den) = rhs.as_atoms();
                numerator.extend(rhs_den);
                denominator.extend(rhs_num);
                self.collapsed(lhs.value() / rhs.value(), &numerator, &denominator)
            }
        }
    }

    /// Raise to a (possibly negative or fractional) power.
    pub fn powf(&self, q: &Quantity, n: f64) -> Result<Quantity, UnitError> {
        match q {
            Quantity::Number(v) => Ok(Quantity::Number(v.powf(n))),
            Quantity::Scalar(s) => {
                Ok(Quantity::power(s.value.powf(n), &s.symbol, s.exponent * n))
            }
            Quantity::Composite(c) => self.collapsed(
                c.value.powf(n),
                &atom::scale(&c.numerator, n),
                &atom::scale(&c.denominator, n),
            ),
        }
    }

    /// Express a quantity in `target`. Composites stay composite.
    pub fn convert(&self, q: &Quantity, target: &str) -> Result<Quantity, UnitError> {
        match q {
            Quantity::Number(_) => Err(UnitError::NotAllowed {
                from: String::from("1"),
                to: target.to_string(),
            }),
            Quantity::Scalar(s) => s.convert_in(self, target),
            Quantity::Composite(c) => {
                c.convert_in(self, target).map(Quantity::Composite)
            }
        }
    }

    fn collapsed(
        &self,
        value: f64,
        numerator: &[Atom],
        denominator: &[Atom],
    ) -> Result<Quantity, UnitError> {
        let (numerator, denominator, factor) =
            self.normalize(numerator, denominator)?;
        Ok(Quantity::collapse(value * factor, numerator, denominator))
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value() && self.same_unit(other)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            Quantity::Number(v) => write!(f, "{}", v),
            Quantity::Scalar(s) => s.fmt(f),
            Quantity::Composite(c) => c.fmt(f),
        }
    }
}

impl FromStr for Quantity {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::parse(s)
    }
}

#[cfg(all(feature = "schemars", feature = "serialize_as_string"))]
impl schemars::JsonSchema for Quantity {
    fn schema_name() -> String {
        String::from("Quantity")
    }

    fn json_schema(
        gen: &mut schemars::gen::SchemaGenerator,
    ) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Number(value)
    }
}

impl From<Scalar> for Quantity {
    fn from(scalar: Scalar) -> Self {
        Quantity::Scalar(scalar)
    }
}

impl From<Composite> for Quantity {
    fn from(composite: Composite) -> Self {
        Quantity::Composite(composite)
    }
}

/* Operators use the shared system. */

impl Add<&Quantity> for &Quantity {
    type Output = Result<Quantity, UnitError>;
    fn add(self, rhs: &Quantity) -> Result<Quantity, UnitError> {
        UnitSystem::shared().add(self, rhs)
    }
}

impl Sub<&Quantity> for &Quantity {
    type Output = Result<Quantity, UnitError>;
    fn sub(self, rhs: &Quantity) -> Result<Quantity, UnitError> {
        UnitSystem::shared().sub(self, rhs)
    }
}

impl Mul<&Quantity> for &Quantity {
    type Output = Result<Quantity, UnitError>;
    fn mul(self, rhs: &Quantity) -> Result<Quantity, UnitError> {
        UnitSystem::shared().mul(self, rhs)
    }
}

impl Div<&Quantity> for &Quantity {
    type Output = Result<Quantity, UnitError>;
    fn div(self, rhs: &Quantity) -> Result<Quantity, UnitError> {
        UnitSystem::shared().div(self, rhs)
    }
}

impl Add<Quantity> for Quantity {
    type Output = Result<Quantity, UnitError>;
    fn add(self, rhs: Quantity) -> Result<Quantity, UnitError> {
        &self + &rhs
    }
}

impl Sub<Quantity> for Quantity {
    type Output = Result<Quantity, UnitError>;
    fn sub(self, rhs: Quantity) -> Result<Quantity, UnitError> {
        &self - &rhs
    }
}

impl Mul<Quantity> for Quantity {
    type Output = Result<Quantity, UnitError>;
    fn mul(self, rhs: Quantity) -> Result<Quantity, UnitError> {
        &self * &rhs
    }
}

impl Div<Quantity> for Quantity {
    type Output = Result<Quantity, UnitError>;
    fn div(self, rhs: Quantity) -> Result<Quantity, UnitError> {
        &self / &rhs
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;
    fn mul(self, rhs: f64) -> Quantity {
        self.scaled(rhs)
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;
    fn div(self, rhs: f64) -> Quantity {
        self.scaled(1.0 / rhs)
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;
    fn mul(self, rhs: Quantity) -> Quantity {
        rhs.scaled(self)
    }
}

impl Div<Quantity> for f64 {
    type Output = Quantity;
    fn div(self, rhs: Quantity) -> Quantity {
        let (numerator, denominator) = rhs.as_atoms();
        Quantity::collapse(self / rhs.value(), denominator, numerator)
    }
}

impl Neg for Quantity {
    type Output = Quantity;
    fn neg(self) -> Quantity {
        self.scaled(-1.0)
    }
}
