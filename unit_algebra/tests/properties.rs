/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use proptest::prelude::*;
use unit_algebra::{atom, Atom, Quantity};

const CONVERSIONS: &[(&str, &str)] = &[
    ("m/s", "ft/hr"),
    ("Pa", "psi"),
    ("kPa", "mmHg"),
    ("W/m^2*K", "BTU/hr*ft^2*F"),
    ("kg/m^3", "lb/ft^3"),
    ("J", "BTU"),
    ("L/min", "gal/hr"),
    ("cP", "kg/m*s"),
    ("kW", "BTU/hr"),
    ("C", "F"),
    ("K", "R"),
    ("N", "lbf"),
];

const UNITS: &[&str] = &[
    "m", "kg", "s", "K", "J", "W", "Pa", "km", "kg/m^3", "m/s", "J/s",
    "N", "cm^2", "1/s", "mol/L", "W/m^2*K", "kg/m*s", "s^-2",
];

const SYMBOLS: &[&str] = &["kg", "m", "s", "K", "A", "mol"];

fn atoms() -> impl Strategy<Value = Vec<Atom>> {
    prop::collection::vec(
        (prop::sample::select(SYMBOLS), -3i32..=3)
            .prop_filter("non-zero exponent", |(_, e)| *e != 0)
            .prop_map(|(s, e)| Atom::new(s, e as f64)),
        0..6,
    )
}

proptest! {
    #[test]
    fn prop_roundtrip_conversion(
        value in 0.1..1000.0f64,
        (from, to) in prop::sample::select(CONVERSIONS),
    ) {
        let original = Quantity::new(value, from).unwrap();
        let back = original.convert_to(to).unwrap().convert_to(from).unwrap();
        prop_assert!(back.approx_eq(&original, 1e-9), "{} -> {}", original, back);
    }

    #[test]
    fn prop_multiplication_commutes(
        a in 0.1..1000.0f64,
        b in 0.1..1000.0f64,
        ua in prop::sample::select(UNITS),
        ub in prop::sample::select(UNITS),
    ) {
        let qa = Quantity::new(a, ua).unwrap();
        let qb = Quantity::new(b, ub).unwrap();
        let ab = (&qa * &qb).unwrap();
        let ba = (&qb * &qa).unwrap();
        prop_assert!(ab.approx_eq(&ba, 1e-12), "{} != {}", ab, ba);
    }

    #[test]
    fn prop_self_division_is_one(
        value in 0.1..1000.0f64,
        unit in prop::sample::select(UNITS),
    ) {
        let q = Quantity::new(value, unit).unwrap();
        prop_assert_eq!((&q / &q).unwrap(), Quantity::Number(1.0));
    }

    #[test]
    fn prop_cancellation_is_idempotent(top in atoms(), bottom in atoms()) {
        let once = atom::reduce(&top, &bottom);
        let twice = atom::reduce(&once.0, &once.1);
        prop_assert_eq!(&once, &twice);
        for a in once.0.iter() {
            prop_assert!(!once.1.iter().any(|b| b.symbol == a.symbol));
        }
    }
}
