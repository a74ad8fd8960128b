/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace, warn};

use super::atom::{self, is_zero, Atom};
use super::conversion::{Conversion, DimensionTable};
use super::dimension::Dimension;
use super::error::UnitError;
use super::parser::{parse_units, AtomLists};
use super::prefix::{split_prefix, MetricPrefix};

/// Upper bound on simplification and standardization rounds.
const MAX_ROUNDS: usize = 32;

/// Symbols that look prefixed but are units of their own. Registered
/// and derived symbols are added automatically.
const PREFIX_EXEMPT: &[&str] = &["kg", "min", "cP"];

lazy_static::lazy_static! {
    static ref SHARED: UnitSystem = UnitSystem::standard();
}

/// A derived unit and its expansion in simpler units.
#[derive(Clone, PartialEq, Debug)]
pub struct DerivedUnit {
    pub symbol: String,
    pub numerator: Vec<Atom>,
    pub denominator: Vec<Atom>,
    /// Whether simplification may introduce this unit. Units without
    /// it are only expanded.
    pub simplifies: bool,
}

impl DerivedUnit {
    fn new(symbol: &str, num: &[(&str, f64)], den: &[(&str, f64)]) -> Self {
        let atoms = |list: &[(&str, f64)]| {
            list.iter().map(|(s, e)| Atom::new(*s, *e)).collect()
        };
        DerivedUnit {
            symbol: symbol.to_string(),
            numerator: atoms(num),
            denominator: atoms(den),
            simplifies: true,
        }
    }

    fn expand_only(mut self) -> Self {
        self.simplifies = false;
        self
    }

    /// Parse an expansion such as `kg*m^2/s^2`.
    pub fn parse(symbol: &str, expansion: &str) -> Result<Self, UnitError> {
        let (num, den) = parse_units(expansion)?;
        let (numerator, denominator) = atom::reduce(&num, &den);
        if numerator.is_empty() && denominator.is_empty() {
            return Err(UnitError::Definitions(format!(
                "{} expands to a dimensionless unit",
                symbol
            )));
        }
        Ok(DerivedUnit {
            symbol: symbol.to_string(),
            numerator,
            denominator,
            simplifies: true,
        })
    }

    /// The largest multiple of this unit contained in the given atoms,
    /// if every atom of the expansion is present with a sufficient
    /// exponent on the right side.
    fn multiple_in(&self, top: &[Atom], bottom: &[Atom]) -> Option<f64> {
        let mut k: Option<f64> = None;
        for (wanted, have) in [
            (self.numerator.as_slice(), top),
            (self.denominator.as_slice(), bottom),
        ] {
            for w in wanted {
                let h = have.iter().find(|a| a.symbol == w.symbol)?;
                if h.exponent < w.exponent {
                    return None;
                }
                let r = h.exponent / w.exponent;
                k = Some(k.map_or(r, |k| k.min(r)));
            }
        }
        k
    }

    pub fn expansion(&self) -> String {
        atom::render(&self.numerator, &self.denominator)
    }
}

/* Fixed rewrites the greedy search can not find by itself. */
#[derive(Clone, Debug)]
struct Rewrite {
    from: AtomLists,
    to: AtomLists,
}

/// The unit configuration: dimension registry, conversion tables,
/// derived units and simplification rules. Build one with
/// [`UnitSystem::standard`] and extend it, or use the shared standard
/// system through [`UnitSystem::shared`].
#[derive(Clone, Debug)]
pub struct UnitSystem {
    tables: BTreeMap<Dimension, DimensionTable>,
    registry: BTreeMap<String, Dimension>,
    derived: Vec<DerivedUnit>,
    rewrites: Vec<Rewrite>,
    prefix_exempt: BTreeSet<String>,
}

impl UnitSystem {
    /// A system without any units.
    pub fn empty() -> Self {
        UnitSystem {
            tables: BTreeMap::new(),
            registry: BTreeMap::new(),
            derived: Vec::new(),
            rewrites: Vec::new(),
            prefix_exempt: PREFIX_EXEMPT
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// The built-in tables.
    pub fn standard() -> Self {
        use Conversion::{Affine, Scale};
        use Dimension::*;

        let mut system = Self::empty();

        [
            DimensionTable::new(Length, Atom::simple("m"))
                .with("ft", Scale(0.3048))
                .with("in", Scale(0.0254))
                .with("yd", Scale(0.9144))
                .with("mile", Scale(1609.344)),
            DimensionTable::new(Mass, Atom::simple("kg"))
                .with("g", Scale(1e-3))
                .with("lb", Scale(0.45359237)),
            DimensionTable::new(Time, Atom::simple("s"))
                .with("min", Scale(60.0))
                .with("hr", Scale(3600.0))
                .with("day", Scale(86400.0)),
            DimensionTable::new(Temperature, Atom::simple("K"))
                .with(
                    "C",
                    Affine {
                        scale: 1.0,
                        offset: 273.15,
                    },
                )
                .with(
                    "F",
                    Affine {
                        scale: 5.0 / 9.0,
                        offset: 459.67 * 5.0 / 9.0,
                    },
                )
                .with("R", Scale(5.0 / 9.0)),
            DimensionTable::new(Current, Atom::simple("A")),
            DimensionTable::new(Amount, Atom::simple("mol")),
            DimensionTable::new(Energy, Atom::simple("J"))
                .with("BTU", Scale(1055.056)),
            DimensionTable::new(Pressure, Atom::simple("Pa"))
                .with("bar", Scale(1e5))
                .with("atm", Scale(101325.0))
                .with("mmHg", Scale(133.322))
                .with("torr", Scale(133.322))
                .with("psi", Scale(6894.76)),
            DimensionTable::new(Force, Atom::simple("N"))
                .with("lbf", Scale(4.44822)),
            DimensionTable::new(Volume, Atom::new("m", 3.0))
                .with("L", Scale(1e-3))
                .with("gal", Scale(0.00454609)),
            DimensionTable::new(Area, Atom::new("m", 2.0))
                .with("acre", Scale(4046.873)),
        ]
        .into_iter()
        .for_each(|table| system.add_table(table));

        /* Order matters: ties in simplification go to the first entry. */
        [
            DerivedUnit::new("Pa", &[("kg", 1.0)], &[("m", 1.0), ("s", 2.0)]),
            DerivedUnit::new("J", &[("kg", 1.0), ("m", 2.0)], &[("s", 2.0)]),
            DerivedUnit::new("W", &[("J", 1.0)], &[("s", 1.0)]),
            DerivedUnit::new("psi", &[("lbf", 1.0)], &[("in", 2.0)]),
            DerivedUnit::new("cP", &[("g", 1.0)], &[("m", 1.0), ("s", 1.0)]),
            DerivedUnit::new("C", &[("A", 1.0), ("s", 1.0)], &[]),
            DerivedUnit::new(
                "V",
                &[("kg", 1.0), ("m", 2.0)],
                &[("s", 3.0), ("A", 1.0)],
            ),
            /* Lets English force units reach base dimensions. */
            DerivedUnit::new("N", &[("kg", 1.0), ("m", 1.0)], &[("s", 2.0)])
                .expand_only(),
        ]
        .into_iter()
        .for_each(|unit| system.add_derived(unit));

        let lists = |num: &[(&str, f64)], den: &[(&str, f64)]| -> AtomLists {
            let atoms = |list: &[(&str, f64)]| {
                list.iter().map(|(s, e)| Atom::new(*s, *e)).collect()
            };
            (atoms(num), atoms(den))
        };
        system.rewrites = vec![
            Rewrite {
                from: lists(&[("kg", 1.0)], &[("s", 3.0), ("K", 1.0)]),
                to: lists(&[("W", 1.0)], &[("m", 2.0), ("K", 1.0)]),
            },
            Rewrite {
                from: lists(&[("kg", 1.0)], &[("s", 3.0)]),
                to: lists(&[("W", 1.0)], &[("m", 2.0)]),
            },
        ];

        system
    }

    /// The standard system shared by the operator overloads.
    pub fn shared() -> &'static UnitSystem {
        &SHARED
    }

    fn add_table(&mut self, table: DimensionTable) {
        if table.standard.exponent == 1.0 {
            self.register_symbol(&table.standard.symbol, table.dimension);
        }
        for symbol in table.conversions.keys() {
            self.register_symbol(symbol, table.dimension);
        }
        self.tables.insert(table.dimension, table);
    }

    fn register_symbol(&mut self, symbol: &str, dimension: Dimension) {
        if split_prefix(symbol).is_some() {
            self.prefix_exempt.insert(symbol.to_string());
        }
        self.registry.insert(symbol.to_string(), dimension);
    }

    fn add_derived(&mut self, unit: DerivedUnit) {
        if split_prefix(&unit.symbol).is_some() {
            self.prefix_exempt.insert(unit.symbol.clone());
        }
        self.derived.push(unit);
    }

    /* Registry lookup. */

    pub fn table(&self, dimension: Dimension) -> Option<&DimensionTable> {
        self.tables.get(&dimension)
    }

    pub fn derived_units(&self) -> &[DerivedUnit] {
        &self.derived
    }

    /// Registered symbols of a dimension, standard first.
    pub fn symbols(&self, dimension: Dimension) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .registry
            .iter()
            .filter(|(_, d)| **d == dimension)
            .map(|(s, _)| s.as_str())
            .collect();
        if let Some(table) = self.tables.get(&dimension) {
            symbols.sort_by_key(|s| !table.is_standard(s));
        }
        symbols
    }

    /// The registered dimension of a symbol, ignoring prefixes.
    pub fn registered(&self, symbol: &str) -> Option<Dimension> {
        self.registry.get(symbol).copied()
    }

    /// A derived unit, unless its symbol is taken by a temperature
    /// unit (`C` is Celsius, not coulomb).
    pub fn derived(&self, symbol: &str) -> Option<&DerivedUnit> {
        match self.registry.get(symbol) {
            Some(dimension) if dimension.is_affine() => None,
            _ => self.derived.iter().find(|d| d.symbol == symbol),
        }
    }

    /// Returns the prefix letter and base symbol of a prefixed symbol.
    pub fn prefixed<'a>(&self, symbol: &'a str) -> Option<(char, &'a str)> {
        match self.prefix_exempt.contains(symbol) {
            true => None,
            false => split_prefix(symbol),
        }
    }

    /* Registered or derived, without looking through prefixes. */
    fn known(&self, symbol: &str) -> bool {
        self.registry.contains_key(symbol) || self.derived(symbol).is_some()
    }

    /// Dimension of a symbol, looking through a metric prefix.
    pub fn dimension_of(&self, symbol: &str) -> Result<Dimension, UnitError> {
        if let Some(dimension) = self.registry.get(symbol) {
            return Ok(*dimension);
        }
        match self.prefixed(symbol) {
            Some((_, base)) if self.registry.contains_key(base) => {
                self.dimension_of(base)
            }
            _ => Err(UnitError::Unregistered(symbol.to_string())),
        }
    }

    /// The dimension of a (possibly prefixed) symbol and its conversion
    /// to the dimension's standard unit.
    pub fn resolve(
        &self,
        symbol: &str,
    ) -> Result<(Dimension, Conversion), UnitError> {
        if let Some(dimension) = self.registry.get(symbol) {
            let conversion = self
                .tables
                .get(dimension)
                .and_then(|t| t.conversion(symbol))
                .ok_or_else(|| UnitError::Unconvertible {
                    symbol: symbol.to_string(),
                })?;
            return Ok((*dimension, conversion));
        }
        match self.prefixed(symbol) {
            Some((c, base)) if self.registry.contains_key(base) => {
                let prefix = MetricPrefix::lookup(c, symbol)?;
                let (dimension, conversion) = self.resolve(base)?;
                Ok((
                    dimension,
                    Conversion::Scale(prefix.multiplier()).then(&conversion),
                ))
            }
            _ => Err(UnitError::Unregistered(symbol.to_string())),
        }
    }

    /* Registration. */

    /// Register `symbol` in `dimension` with a conversion to the
    /// dimension's standard unit.
    pub fn register(
        &mut self,
        symbol: &str,
        dimension: Dimension,
        conversion: Conversion,
    ) -> Result<(), UnitError> {
        if self.registry.contains_key(symbol) {
            return Err(UnitError::Definitions(format!(
                "{} is already registered",
                symbol
            )));
        }
        let table = self.tables.get_mut(&dimension).ok_or_else(|| {
            UnitError::Definitions(format!("no unit table for {}", dimension))
        })?;
        table.conversions.insert(symbol.to_string(), conversion);
        self.register_symbol(symbol, dimension);
        debug!("registered {} in dimension {}", symbol, dimension);
        Ok(())
    }

    /// Register `symbol` relative to an existing unit, with functions
    /// converting a value to and from the existing unit.
    pub fn register_unit<F, G>(
        &mut self,
        symbol: &str,
        existing: &str,
        to_existing: F,
        from_existing: G,
    ) -> Result<(), UnitError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        G: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let conversion = Conversion::Custom {
            to_standard: std::sync::Arc::new(to_existing),
            from_standard: std::sync::Arc::new(from_existing),
        };
        self.register_relative(symbol, existing, conversion)
    }

    /// Register `symbol` relative to an existing unit. The conversion
    /// maps values of the new unit to values of `existing`.
    pub fn register_relative(
        &mut self,
        symbol: &str,
        existing: &str,
        conversion: Conversion,
    ) -> Result<(), UnitError> {
        let (dimension, base) = self.resolve(existing)?;
        self.register(symbol, dimension, conversion.then(&base))
    }

    /// Add a derived unit, eg. `("kWh", "kW*hr")`. Expansions that
    /// refer back to the new symbol are rejected.
    pub fn define_derived(
        &mut self,
        symbol: &str,
        expansion: &str,
    ) -> Result<(), UnitError> {
        if self.derived.iter().any(|d| d.symbol == symbol) {
            return Err(UnitError::Definitions(format!(
                "{} is already a derived unit",
                symbol
            )));
        }
        let unit = DerivedUnit::parse(symbol, expansion)?;
        let (num, den) =
            self.deconstruct(&unit.numerator, &unit.denominator, false);
        if num.iter().chain(den.iter()).any(|a| a.symbol == symbol) {
            return Err(UnitError::Definitions(format!(
                "{} is defined in terms of itself",
                symbol
            )));
        }
        debug!("defined {} as {}", symbol, unit.expansion());
        self.add_derived(unit);
        Ok(())
    }

    /* Rewriting passes. */

    /// Strip metric prefixes from symbols whose remainder is a known
    /// unit. Returns the prefix-free atoms and the factor to multiply a
    /// value with to express it in them. Other symbols are kept as
    /// written (`mph` stays `mph`).
    pub fn strip_prefixes(
        &self,
        numerator: &[Atom],
        denominator: &[Atom],
    ) -> Result<(Vec<Atom>, Vec<Atom>, f64), UnitError> {
        let mut factor = 1.0;
        let mut strip = |atoms: &[Atom], sign: f64| {
            atoms
                .iter()
                .map(|a| -> Result<Atom, UnitError> {
                    match self
                        .prefixed(&a.symbol)
                        .filter(|(_, base)| self.known(base))
                    {
                    Some((c, base)) => {
                        let prefix = MetricPrefix::lookup(c, &a.symbol)?;
                        factor *= prefix.multiplier().powf(sign * a.exponent);
                        Ok(Atom::new(base, a.exponent))
                    }
                    None => Ok(a.clone()),
                    }
                })
                .collect::<Result<Vec<_>, UnitError>>()
        };
        let top = strip(numerator, 1.0)?;
        let bottom = strip(denominator, -1.0)?;
        Ok((top, bottom, factor))
    }

    /// Replace derived units by their expansions, until none are left
    /// or, with `one_pass`, once for every atom present at the start.
    pub fn deconstruct(
        &self,
        numerator: &[Atom],
        denominator: &[Atom],
        one_pass: bool,
    ) -> (Vec<Atom>, Vec<Atom>) {
        let (top, bottom, _) = self.expand(numerator, denominator, one_pass);
        (top, bottom)
    }

    /* Derived units are acyclic, so the full expansion terminates. */
    fn expand(
        &self,
        numerator: &[Atom],
        denominator: &[Atom],
        one_pass: bool,
    ) -> (Vec<Atom>, Vec<Atom>, bool) {
        let mut top = numerator.to_vec();
        let mut bottom = denominator.to_vec();
        let mut expanded = false;

        loop {
            let mut matched = false;
            let mut new_top = Vec::new();
            let mut new_bottom = Vec::new();

            for a in top {
                match self.derived(&a.symbol) {
                    Some(d) => {
                        trace!("expanding {} to {}", a, d.expansion());
                        new_top.extend(atom::scale(&d.numerator, a.exponent));
                        new_bottom.extend(atom::scale(&d.denominator, a.exponent));
                        matched = true;
                    }
                    None => new_top.push(a),
                }
            }
            for a in bottom {
                match self.derived(&a.symbol) {
                    Some(d) => {
                        trace!("expanding {} to {}", a, d.expansion());
                        new_bottom.extend(atom::scale(&d.numerator, a.exponent));
                        new_top.extend(atom::scale(&d.denominator, a.exponent));
                        matched = true;
                    }
                    None => new_bottom.push(a),
                }
            }

            top = new_top;
            bottom = new_bottom;
            expanded |= matched;
            if !matched || one_pass {
                return (top, bottom, expanded);
            }
        }
    }

    /// Re-compose derived units from combined and cancelled atoms. The
    /// search is greedy: each round takes the derived unit with the
    /// largest multiple (the first one in table order on ties), which
    /// is not guaranteed to give the shortest result.
    pub fn simplify(
        &self,
        numerator: &[Atom],
        denominator: &[Atom],
    ) -> (Vec<Atom>, Vec<Atom>) {
        let mut top = numerator.to_vec();
        let mut bottom = denominator.to_vec();

        for round in 0.. {
            let best = self
                .derived
                .iter()
                .filter(|d| d.simplifies && self.derived(&d.symbol).is_some())
                .filter_map(|d| Some((d, d.multiple_in(&top, &bottom)?)))
                .filter(|(_, k)| *k > 0.0 && !is_zero(*k))
                .fold(None, |best: Option<(&DerivedUnit, f64)>, (d, k)| {
                    match best {
                        Some((_, b)) if b >= k => best,
                        _ => Some((d, k)),
                    }
                });

            let (unit, k) = match best {
                Some(best) => best,
                None => break,
            };

            if round >= MAX_ROUNDS {
                warn!(
                    "simplification of {} did not settle after {} rounds",
                    atom::render(&top, &bottom),
                    MAX_ROUNDS
                );
                break;
            }

            trace!(
                "simplify round {}: {}^{} in {}",
                round,
                unit.symbol,
                k,
                atom::render(&top, &bottom)
            );

            top.extend(atom::scale(&unit.denominator, k));
            bottom.extend(atom::scale(&unit.numerator, k));
            top.push(Atom::new(unit.symbol.as_str(), k));
            (top, bottom) = atom::reduce(&top, &bottom);
        }

        match self.rewrites.iter().find(|r| {
            atom::same_set(&r.from.0, &top) && atom::same_set(&r.from.1, &bottom)
        }) {
            Some(rewrite) => rewrite.to.clone(),
            None => (top, bottom),
        }
    }

    /// Prefix stripping, full expansion, combination, cancellation and
    /// simplification. Returns the resulting atoms and the factor to
    /// multiply the value with.
    pub fn normalize(
        &self,
        numerator: &[Atom],
        denominator: &[Atom],
    ) -> Result<(Vec<Atom>, Vec<Atom>, f64), UnitError> {
        let (top, bottom, factor) = self.strip_prefixes(numerator, denominator)?;
        let (top, bottom) = self.deconstruct(&top, &bottom, false);
        let (top, bottom) = atom::reduce(&top, &bottom);
        let (top, bottom) = self.simplify(&top, &bottom);
        Ok((top, bottom, factor))
    }

    /* Conversion. */

    /* Replace every registered non-standard atom by a power of its
     * dimension's standard. Unregistered derived units are kept for
     * the next expansion. */
    fn standardize_atoms(
        &self,
        numerator: &[Atom],
        denominator: &[Atom],
    ) -> Result<(Vec<Atom>, Vec<Atom>, f64, bool), UnitError> {
        let mut factor = 1.0;
        let mut changed = false;
        let mut convert = |atoms: &[Atom], sign: f64| {
            atoms
                .iter()
                .map(|a| -> Result<Atom, UnitError> {
                    let table = match self.registry.get(&a.symbol) {
                        Some(dimension) => self.tables.get(dimension),
                        None if self.derived(&a.symbol).is_some() => {
                            return Ok(a.clone())
                        }
                        None => None,
                    }
                    .ok_or_else(|| UnitError::Unconvertible {
                        symbol: a.symbol.clone(),
                    })?;
                    if table.is_standard(&a.symbol) {
                        return Ok(a.clone());
                    }
                    let conversion = table.conversion(&a.symbol).ok_or_else(
                        || UnitError::Unconvertible {
                            symbol: a.symbol.clone(),
                        },
                    )?;
                    factor *= conversion.scale().powf(sign * a.exponent);
                    changed = true;
                    Ok(table.standard.powf(a.exponent))
                })
                .collect::<Result<Vec<_>, UnitError>>()
        };
        let top = convert(numerator, 1.0)?;
        let bottom = convert(denominator, -1.0)?;
        Ok((top, bottom, factor, changed))
    }

    /// Reduce a unit to base dimensions. Returns the factor from the
    /// unit to the standard units and the net exponent per dimension.
    /// Temperatures contribute their scale only.
    pub fn base_dimensions(
        &self,
        numerator: &[Atom],
        denominator: &[Atom],
    ) -> Result<(f64, BTreeMap<Dimension, f64>), UnitError> {
        let (top, bottom, mut factor) =
            self.strip_prefixes(numerator, denominator)?;
        let (mut top, mut bottom) = self.deconstruct(&top, &bottom, true);

        let mut settled = false;
        for _ in 0..MAX_ROUNDS {
            let (t, b, f) = self.strip_prefixes(&top, &bottom)?;
            let (t, b, g, converted) = self.standardize_atoms(&t, &b)?;
            let (t, b, expanded) = self.expand(&t, &b, false);
            factor *= f * g;
            top = t;
            bottom = b;
            if !converted && !expanded {
                settled = true;
                break;
            }
        }
        if !settled {
            warn!(
                "reduction of {} did not settle after {} rounds",
                atom::render(numerator, denominator),
                MAX_ROUNDS
            );
        }

        let mut tally = BTreeMap::new();
        for (atoms, sign) in [(&top, 1.0), (&bottom, -1.0)] {
            for a in atoms.iter() {
                let dimension = self.registry.get(&a.symbol).ok_or_else(|| {
                    UnitError::Unconvertible {
                        symbol: a.symbol.clone(),
                    }
                })?;
                *tally.entry(*dimension).or_insert(0.0) += sign * a.exponent;
            }
        }
        tally.retain(|_, e: &mut f64| !is_zero(*e));

        debug!(
            "{} = {} x base {:?}",
            atom::render(numerator, denominator),
            factor,
            tally
        );
        Ok((factor, tally))
    }

    /// Factor converting a value in the first unit to the second.
    pub fn conversion_factor(
        &self,
        from: (&[Atom], &[Atom]),
        to: (&[Atom], &[Atom]),
    ) -> Result<f64, UnitError> {
        let (left, left_dims) = self.base_dimensions(from.0, from.1)?;
        let (right, right_dims) = self.base_dimensions(to.0, to.1)?;
        let compatible = left_dims.len() == right_dims.len()
            && left_dims.iter().all(|(d, e)| {
                right_dims.get(d).map_or(false, |r| is_zero(e - r))
            });
        match compatible {
            true => Ok(left / right),
            false => Err(UnitError::NotAllowed {
                from: atom::render(from.0, from.1),
                to: atom::render(to.0, to.1),
            }),
        }
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::UnitSystem;
    use crate::parser::parse_units;
    use crate::{atom, Dimension, UnitError};

    fn normalized(unit: &str) -> (String, f64) {
        let (num, den) = parse_units(unit).unwrap();
        let (num, den, factor) =
            UnitSystem::shared().normalize(&num, &den).unwrap();
        (atom::render(&num, &den), factor)
    }

    #[test]
    fn deconstruct_chained() {
        let system = UnitSystem::shared();
        let (num, den) = parse_units("W").unwrap();
        let (top, bottom) = system.deconstruct(&num, &den, true);
        assert_eq!(atom::render(&top, &bottom), "J/s");
        let (top, bottom) = system.deconstruct(&num, &den, false);
        let (top, bottom) = atom::reduce(&top, &bottom);
        assert_eq!(atom::render(&top, &bottom), "kg*m^2/s^3");
    }

    #[test]
    fn celsius_is_not_expanded() {
        let system = UnitSystem::shared();
        assert!(system.derived("C").is_none());
        assert!(system.derived("Pa").is_some());
        assert_eq!(system.registered("C"), Some(Dimension::Temperature));
    }

    #[test]
    fn prefixes() {
        let system = UnitSystem::shared();
        let (num, den) = parse_units("km/ms").unwrap();
        let (top, bottom, factor) = system.strip_prefixes(&num, &den).unwrap();
        assert_eq!(atom::render(&top, &bottom), "m/s");
        assert!((factor - 1e6).abs() < 1e-6);

        let (num, den) = parse_units("kg*mol/min*day*mmHg").unwrap();
        let (_, _, factor) = system.strip_prefixes(&num, &den).unwrap();
        assert_eq!(factor, 1.0);

        let (num, den) = parse_units("GW").unwrap();
        assert!(matches!(
            system.strip_prefixes(&num, &den),
            Err(UnitError::UnknownPrefix { prefix: 'G', .. })
        ));
    }

    #[test]
    fn simplification() {
        assert_eq!(normalized("kg*m^2/s^3"), ("W".to_string(), 1.0));
        assert_eq!(normalized("kJ*J/s^2"), ("W^2".to_string(), 1000.0));
        assert_eq!(normalized("kg/s^3*K"), ("W/m^2*K".to_string(), 1.0));
        assert_eq!(normalized("kg/m*s^2"), ("Pa".to_string(), 1.0));
        assert_eq!(normalized("m/s^2"), ("m/s^2".to_string(), 1.0));
        assert_eq!(normalized("kg*m/s^2"), ("kg*m/s^2".to_string(), 1.0));
        assert_eq!(normalized("N*m"), ("J".to_string(), 1.0));
    }

    #[test]
    fn prefix_needs_known_unit() {
        let system = UnitSystem::shared();
        let (num, den) = parse_units("mph/s").unwrap();
        let (top, bottom, factor) = system.strip_prefixes(&num, &den).unwrap();
        assert_eq!(atom::render(&top, &bottom), "mph/s");
        assert_eq!(factor, 1.0);
    }

    #[test]
    fn resolve_prefixed() {
        let system = UnitSystem::shared();
        let (dimension, conversion) = system.resolve("kPa").unwrap();
        assert_eq!(dimension, Dimension::Pressure);
        assert_eq!(conversion.to_standard(2.0), 2000.0);
        assert_eq!(
            system.resolve("foo").unwrap_err(),
            UnitError::Unregistered("foo".to_string())
        );
    }

    #[test]
    fn self_referencing_definition() {
        let mut system = UnitSystem::standard();
        system.define_derived("kWh", "kW*hr").unwrap();
        assert!(matches!(
            system.define_derived("foo", "foo*m"),
            Err(UnitError::Definitions(_))
        ));
        assert!(matches!(
            system.define_derived("W", "J/s"),
            Err(UnitError::Definitions(_))
        ));
    }
}
