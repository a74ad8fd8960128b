/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use super::error::UnitError;

/// Metric prefixes that may be attached to a unit symbol.
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
pub enum MetricPrefix {
    Micro,
    Milli,
    Centi,
    Deci,
    Kilo,
    Mega,
}

/// Letters that mark a symbol as prefixed. Some of these (nano, giga)
/// look like prefixes but have no scale factor.
pub(crate) static PREFIX_LETTERS: [char; 10] =
    ['u', 'µ', 'μ', 'm', 'c', 'd', 'k', 'M', 'n', 'G'];

impl MetricPrefix {
    pub const LIST: &[Self] = &[
        Self::Micro,
        Self::Milli,
        Self::Centi,
        Self::Deci,
        Self::Kilo,
        Self::Mega,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'u' | 'µ' | 'μ' => Some(Self::Micro),
            'm' => Some(Self::Milli),
            'c' => Some(Self::Centi),
            'd' => Some(Self::Deci),
            'k' => Some(Self::Kilo),
            'M' => Some(Self::Mega),
            _ => None,
        }
    }

    /// Look up the prefix for a letter found at the start of `symbol`.
    pub fn lookup(c: char, symbol: &str) -> Result<Self, UnitError> {
        Self::from_char(c).ok_or_else(|| UnitError::UnknownPrefix {
            prefix: c,
            symbol: symbol.to_string(),
        })
    }

    pub fn power(&self) -> i32 {
        match self {
            MetricPrefix::Micro => -6,
            MetricPrefix::Milli => -3,
            MetricPrefix::Centi => -2,
            MetricPrefix::Deci => -1,
            MetricPrefix::Kilo => 3,
            MetricPrefix::Mega => 6,
        }
    }

    pub fn multiplier(&self) -> f64 {
        10f64.powi(self.power())
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            MetricPrefix::Micro => "u",
            MetricPrefix::Milli => "m",
            MetricPrefix::Centi => "c",
            MetricPrefix::Deci => "d",
            MetricPrefix::Kilo => "k",
            MetricPrefix::Mega => "M",
        }
    }
}

/// Returns the prefix letter and the remaining symbol if `symbol`
/// looks prefixed. Single-letter symbols never carry a prefix.
pub(crate) fn split_prefix(symbol: &str) -> Option<(char, &str)> {
    let mut chars = symbol.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    match !rest.is_empty() && PREFIX_LETTERS.contains(&first) {
        true => Some((first, rest)),
        false => None,
    }
}

impl Display for MetricPrefix {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::{split_prefix, MetricPrefix};
    use crate::UnitError;

    #[test]
    fn prefix_letters() {
        assert_eq!(split_prefix("km"), Some(('k', "m")));
        assert_eq!(split_prefix("µm"), Some(('µ', "m")));
        assert_eq!(split_prefix("m"), None);
        assert_eq!(split_prefix("ft"), None);
        assert_eq!(split_prefix(""), None);
    }

    #[test]
    fn unknown_prefix() {
        assert_eq!(
            MetricPrefix::lookup('G', "GW"),
            Err(UnitError::UnknownPrefix {
                prefix: 'G',
                symbol: "GW".to_string()
            })
        );
        assert_eq!(MetricPrefix::lookup('k', "kW"), Ok(MetricPrefix::Kilo));
        assert_eq!(MetricPrefix::Kilo.multiplier(), 1000.0);
    }
}
