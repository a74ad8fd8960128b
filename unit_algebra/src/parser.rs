/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use nom::{
    self,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::{opt, value},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use super::atom::Atom;
use super::error::UnitError;

/// A unit expression split into its numerator and denominator atoms.
pub type AtomLists = (Vec<Atom>, Vec<Atom>);

/// Parse a unit string such as `kg*m^2/s^3*K` or `kg/(m*s^2)`.
/// Everything after the first `/` belongs to the denominator.
pub fn parse_units(input: &str) -> Result<AtomLists, UnitError> {
    match unit_expr(input.trim()) {
        Ok(("", lists)) => Ok(lists),
        Ok((r, _)) => Err(UnitError::Parse(format!(
            "Leftover input in '{}': {}",
            input, r
        ))),
        Err(err) => {
            Err(UnitError::Parse(format!("invalid unit '{}': {}", input, err)))
        }
    }
}

/// Parse a quantity string such as `5 kg/m*s^2` into its value and
/// unit atoms. A bare number has no atoms.
pub fn parse_quantity(input: &str) -> Result<(f64, AtomLists), UnitError> {
    match quantity(input.trim()) {
        Ok(("", q)) => Ok(q),
        Ok((r, _)) => Err(UnitError::Parse(format!(
            "Leftover input in '{}': {}",
            input, r
        ))),
        Err(err) => Err(UnitError::Parse(format!(
            "invalid quantity '{}': {}",
            input, err
        ))),
    }
}

/// Parser for unit expressions.
pub fn unit_expr(input: &str) -> IResult<&str, AtomLists> {
    let (input, (num, denom)) = pair(
        numerator,
        opt(preceded(delimited(space0, char('/'), space0), half)),
    )(input)?;
    Ok((input, (num, denom.unwrap_or_default())))
}

/// Parser for quantities (number, optional unit).
pub fn quantity(input: &str) -> IResult<&str, (f64, AtomLists)> {
    let (input, (num, units)) =
        pair(double, opt(preceded(space0, unit_expr)))(input)?;
    Ok((input, (num, units.unwrap_or_default())))
}

/* A literal `1` numerator stands for an empty numerator (`1/s`). */
fn numerator(input: &str) -> IResult<&str, Vec<Atom>> {
    alt((value(Vec::new(), terminated(char('1'), unit_one_end)), half))(
        input,
    )
}

fn half(input: &str) -> IResult<&str, Vec<Atom>> {
    alt((
        delimited(
            terminated(char('('), space0),
            atom_list,
            preceded(space0, char(')')),
        ),
        atom_list,
    ))(input)
}

fn atom_list(input: &str) -> IResult<&str, Vec<Atom>> {
    separated_list1(delimited(space0, char('*'), space0), atom)(input)
}

fn atom(input: &str) -> IResult<&str, Atom> {
    let (input, (sym, exp)) = tuple((
        symbol,
        opt(preceded(delimited(space0, char('^'), space0), exponent)),
    ))(input)?;
    Ok((input, Atom::new(sym, exp.unwrap_or(1.0))))
}

fn exponent(input: &str) -> IResult<&str, f64> {
    alt((delimited(char('('), double, char(')')), double))(input)
}

fn symbol(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphabetic() || c == '%' || c == '°' || c == '_')(
        input,
    )
}

/* The `1` numerator must be followed by the division sign. */
fn unit_one_end(input: &str) -> IResult<&str, ()> {
    match input.trim_start().starts_with('/') {
        true => Ok((input, ())),
        false => Err(nom::Err::Error(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Char,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_quantity, parse_units};
    use crate::{Atom, UnitError};

    fn atoms(list: &[(&str, f64)]) -> Vec<Atom> {
        list.iter().map(|(s, e)| Atom::new(*s, *e)).collect()
    }

    #[test]
    fn fraction() {
        assert_eq!(
            parse_units("kg*m^2/s^3*K").unwrap(),
            (
                atoms(&[("kg", 1.0), ("m", 2.0)]),
                atoms(&[("s", 3.0), ("K", 1.0)])
            )
        );
    }

    #[test]
    fn numerator_only() {
        assert_eq!(parse_units("W").unwrap(), (atoms(&[("W", 1.0)]), vec![]));
        assert_eq!(
            parse_units("m^-2").unwrap(),
            (atoms(&[("m", -2.0)]), vec![])
        );
        assert_eq!(
            parse_units("m^0.5").unwrap(),
            (atoms(&[("m", 0.5)]), vec![])
        );
    }

    #[test]
    fn parenthesized_and_spaced() {
        assert_eq!(
            parse_units("kg^2/(m*s^3)").unwrap(),
            parse_units("kg^2/m*s^3").unwrap()
        );
        assert_eq!(
            parse_units(" kg * m / s ^ 2 ").unwrap(),
            parse_units("kg*m/s^2").unwrap()
        );
        assert_eq!(parse_units("1/s").unwrap(), (vec![], atoms(&[("s", 1.0)])));
    }

    #[test]
    fn malformed() {
        assert!(matches!(parse_units("^2"), Err(UnitError::Parse(_))));
        assert!(matches!(parse_units("m*"), Err(UnitError::Parse(_))));
        assert!(matches!(parse_units("m/"), Err(UnitError::Parse(_))));
        assert!(matches!(parse_units(""), Err(UnitError::Parse(_))));
        assert!(matches!(parse_units("m^x"), Err(UnitError::Parse(_))));
    }

    #[test]
    fn quantities() {
        assert_eq!(
            parse_quantity("5 kW").unwrap(),
            (5.0, (atoms(&[("kW", 1.0)]), vec![]))
        );
        assert_eq!(parse_quantity("2.5").unwrap(), (2.5, (vec![], vec![])));
        assert_eq!(
            parse_quantity("1e3 m/s").unwrap(),
            (1000.0, (atoms(&[("m", 1.0)]), atoms(&[("s", 1.0)])))
        );
    }
}
