/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Exponents closer to zero than this are treated as zero. Greedy
/// simplification with fractional multiples leaves rounding residue.
pub const EXPONENT_EPSILON: f64 = 1e-9;

pub(crate) fn is_zero(exponent: f64) -> bool {
    exponent.abs() < EXPONENT_EPSILON
}

/// A unit symbol raised to an exponent, eg. `s^2`. This is the
/// smallest element of the unit algebra.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Atom {
    pub symbol: String,
    pub exponent: f64,
}

impl Atom {
    pub fn new<S: Into<String>>(symbol: S, exponent: f64) -> Self {
        Atom {
            symbol: symbol.into(),
            exponent,
        }
    }

    pub fn simple<S: Into<String>>(symbol: S) -> Self {
        Self::new(symbol, 1.0)
    }

    pub fn powf(&self, n: f64) -> Self {
        Atom::new(self.symbol.clone(), self.exponent * n)
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.exponent == other.exponent
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        /* 0.0 and -0.0 compare equal. */
        match self.exponent == 0.0 {
            true => 0u64.hash(state),
            false => self.exponent.to_bits().hash(state),
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self.exponent == 1.0 {
            true => write!(f, "{}", self.symbol),
            false => write!(f, "{}^{}", self.symbol, self.exponent),
        }
    }
}

/// Merge atoms sharing a symbol by summing their exponents, then drop
/// atoms whose exponent became zero. The first occurrence keeps its
/// position. Exponents within rounding distance of an integer snap to it.
pub fn combine(atoms: &[Atom]) -> Vec<Atom> {
    let mut combined: Vec<Atom> = Vec::with_capacity(atoms.len());
    for atom in atoms {
        match combined.iter_mut().find(|a| a.symbol == atom.symbol) {
            Some(a) => a.exponent += atom.exponent,
            None => combined.push(atom.clone()),
        }
    }
    combined.retain(|a| !is_zero(a.exponent));
    for atom in combined.iter_mut() {
        if is_zero(atom.exponent - atom.exponent.round()) {
            atom.exponent = atom.exponent.round();
        }
    }
    combined
}

/// Cancel atoms appearing in both halves. Expects each half to be
/// combined already. Negative exponents end up on the other side with
/// their sign flipped.
pub fn cancel(numerator: &[Atom], denominator: &[Atom]) -> (Vec<Atom>, Vec<Atom>) {
    let mut top = numerator.to_vec();
    let mut bottom = denominator.to_vec();

    for u1 in top.iter_mut() {
        for u2 in bottom.iter_mut() {
            if u1.symbol == u2.symbol && !is_zero(u2.exponent) {
                u1.exponent -= u2.exponent;
                u2.exponent = 0.0;
            }
        }
    }

    let mut final_top = Vec::new();
    let mut final_bottom = Vec::new();
    for atom in top {
        if atom.exponent >= EXPONENT_EPSILON {
            final_top.push(atom);
        } else if atom.exponent <= -EXPONENT_EPSILON {
            final_bottom.push(atom.powf(-1.0));
        }
    }
    for atom in bottom {
        if atom.exponent >= EXPONENT_EPSILON {
            final_bottom.push(atom);
        } else if atom.exponent <= -EXPONENT_EPSILON {
            final_top.push(atom.powf(-1.0));
        }
    }

    (combine(&final_top), combine(&final_bottom))
}

/// Combine each half, then cancel across halves.
pub fn reduce(numerator: &[Atom], denominator: &[Atom]) -> (Vec<Atom>, Vec<Atom>) {
    cancel(&combine(numerator), &combine(denominator))
}

pub fn scale(atoms: &[Atom], n: f64) -> Vec<Atom> {
    atoms.iter().map(|a| a.powf(n)).collect()
}

/// Order-insensitive comparison of two atom lists. Repeated symbols
/// are combined first, so `m*m` equals `m^2` but not `m`.
pub fn same_set(a: &[Atom], b: &[Atom]) -> bool {
    let (a, b) = (combine(a), combine(b));
    a.len() == b.len()
        && a.iter().all(|x| {
            b.iter()
                .any(|y| y.symbol == x.symbol && is_zero(y.exponent - x.exponent))
        })
}

/// Render a unit expression, eg. `kg*m/s^2`.
pub fn render(numerator: &[Atom], denominator: &[Atom]) -> String {
    let join = |atoms: &[Atom]| {
        atoms
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join("*")
    };
    match (numerator.is_empty(), denominator.is_empty()) {
        (_, true) => join(numerator),
        (true, false) => format!("1/{}", join(denominator)),
        (false, false) => format!("{}/{}", join(numerator), join(denominator)),
    }
}

#[cfg(test)]
mod tests {
    use super::{cancel, combine, reduce, render, same_set, Atom};

    fn atoms(list: &[(&str, f64)]) -> Vec<Atom> {
        list.iter().map(|(s, e)| Atom::new(*s, *e)).collect()
    }

    #[test]
    fn combine_same_symbol() {
        assert_eq!(
            combine(&atoms(&[("m", 1.0), ("s", 1.0), ("m", 1.0)])),
            atoms(&[("m", 2.0), ("s", 1.0)])
        );
        assert_eq!(combine(&atoms(&[("m", 1.0), ("m", -1.0)])), vec![]);
    }

    #[test]
    fn cancel_moves_negative_exponents() {
        let (top, bottom) =
            cancel(&atoms(&[("kg", 1.0), ("m", 1.0)]), &atoms(&[("m", 2.0)]));
        assert_eq!(top, atoms(&[("kg", 1.0)]));
        assert_eq!(bottom, atoms(&[("m", 1.0)]));

        let (top, bottom) = cancel(&atoms(&[("s", 1.0)]), &atoms(&[("s", 1.0)]));
        assert!(top.is_empty() && bottom.is_empty());

        let (top, bottom) = cancel(&[], &atoms(&[("s", -2.0)]));
        assert_eq!(top, atoms(&[("s", 2.0)]));
        assert!(bottom.is_empty());
    }

    #[test]
    fn reduce_is_idempotent() {
        let top = atoms(&[("kg", 1.0), ("m", 2.0), ("kg", 1.0), ("s", 1.0)]);
        let bottom = atoms(&[("s", 3.0), ("m", 1.0)]);
        let once = reduce(&top, &bottom);
        let twice = reduce(&once.0, &once.1);
        assert_eq!(once, twice);
        assert_eq!(render(&once.0, &once.1), "kg^2*m/s^2");
    }

    #[test]
    fn same_set_counts_repeats() {
        let mm = atoms(&[("m", 1.0), ("m", 1.0)]);
        assert!(!same_set(&mm, &atoms(&[("m", 1.0)])));
        assert!(same_set(&mm, &atoms(&[("m", 2.0)])));
        assert!(same_set(
            &atoms(&[("s", 1.0), ("kg", 1.0)]),
            &atoms(&[("kg", 1.0), ("s", 1.0)])
        ));
        assert!(!same_set(&atoms(&[("kg", 1.0)]), &atoms(&[("kg", 1.0), ("s", 1.0)])));
    }

    #[test]
    fn render_exponents() {
        assert_eq!(render(&atoms(&[("m", 0.5)]), &[]), "m^0.5");
        assert_eq!(render(&[], &atoms(&[("s", 1.0)])), "1/s");
    }
}
