/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::dimension::Dimension;

#[derive(Serialize, Deserialize, Error, PartialEq, Eq, Clone, Debug)]
pub enum UnitError {
    #[error("Unit parse error: {0}")]
    Parse(String),
    #[error("Unknown prefix {prefix} in {symbol}")]
    UnknownPrefix { prefix: char, symbol: String },
    #[error("{0} is not a registered unit")]
    Unregistered(String),
    #[error("Unsupported unit operation: {lhs} {op} {rhs}")]
    Mismatch {
        lhs: String,
        rhs: String,
        op: char,
    },
    #[error("Unsupported operand types: {lhs} {op} {rhs}")]
    TypeMismatch {
        lhs: String,
        rhs: String,
        op: char,
    },
    #[error("{symbol} can not be converted")]
    Unconvertible { symbol: String },
    #[error("The conversion from {from} to {to} is not allowed")]
    NotAllowed { from: String, to: String },
    #[error("invalid unit {symbol} for dimension {dimension}")]
    WrongDimension { symbol: String, dimension: Dimension },
    #[error("Please supply the correct units of {expected} instead of {found} for {name}")]
    IncorrectUnits {
        name: String,
        expected: String,
        found: String,
    },
    #[error("Unit definitions: {0}")]
    Definitions(String),
}
