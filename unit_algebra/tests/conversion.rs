/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use unit_algebra::{Composite, Conversion, Dimension, Quantity, UnitError, UnitSystem};

fn q(value: f64, unit: &str) -> Quantity {
    Quantity::new(value, unit).unwrap()
}

fn assert_close(actual: &Quantity, expected: &Quantity, tolerance: f64) {
    assert!(
        actual.approx_eq(expected, tolerance),
        "{} != {}",
        actual,
        expected
    );
}

#[test]
fn composite_prefix() {
    let v = q(3.0, "m/s").convert_to("cm/s").unwrap();
    assert_close(&v, &q(300.0, "cm/s"), 1e-12);
}

#[test]
fn temperature() {
    assert_close(&q(300.0, "C").convert_to("K").unwrap(), &q(573.15, "K"), 1e-12);
    assert_close(&q(212.0, "F").convert_to("C").unwrap(), &q(100.0, "C"), 1e-9);
    assert_close(&q(0.0, "K").convert_to("R").unwrap(), &q(0.0, "R"), 1e-9);
    assert_close(&q(100.0, "C").convert_to("F").unwrap(), &q(212.0, "F"), 1e-9);
}

#[test]
fn heat_transfer_coefficient() {
    let h = q(1.0, "W/m^2*K").convert_to("BTU/hr*ft^2*F").unwrap();
    assert_close(&h, &q(0.17611, "BTU/hr*ft^2*F"), 1e-4);
    let k = q(1.0, "W/m*K").convert_to("BTU/hr*ft*F").unwrap();
    assert_close(&k, &q(0.5778, "BTU/hr*ft*F"), 1e-4);
}

#[test]
fn temperature_differences_in_composites() {
    let cp = q(1.0, "BTU/lb*F").convert_to("J/kg*K").unwrap();
    assert_close(&cp, &q(4186.8, "J/kg*K"), 1e-6);
    let cp = q(1.0, "J/kg*C").convert_to("J/kg*K").unwrap();
    assert_close(&cp, &q(1.0, "J/kg*K"), 1e-12);
}

#[test]
fn volumes() {
    assert_close(&q(1000.0, "L/s").convert_to("m^3/s").unwrap(), &q(1.0, "m^3/s"), 1e-12);
    assert_close(&q(1.0, "L/s").convert_to("cm^3/s").unwrap(), &q(1000.0, "cm^3/s"), 1e-9);
    assert_close(&q(1.0, "ft^2").convert_to("m^2").unwrap(), &q(0.09290304, "m^2"), 1e-12);
}

#[test]
fn derived_units() {
    assert_close(&q(5.0, "kW").convert_to("W").unwrap(), &q(5000.0, "W"), 1e-12);
    assert_close(&q(1.0, "MW").convert_to("kW").unwrap(), &q(1000.0, "kW"), 1e-12);
    assert_close(&q(1.0, "cP").convert_to("kg/m*s").unwrap(), &q(1e-3, "kg/m*s"), 1e-12);
    assert_close(&q(1.0, "psi").convert_to("Pa").unwrap(), &q(6894.76, "Pa"), 1e-12);
    assert_close(&q(100.0, "kPa").convert_to("bar").unwrap(), &q(1.0, "bar"), 1e-12);
    assert_close(&q(1.0, "J/s").convert_to("W").unwrap(), &q(1.0, "W"), 1e-12);
    assert_close(
        &q(1.0, "lbf").convert_to("kg*m/s^2").unwrap(),
        &q(4.44822, "kg*m/s^2"),
        1e-12,
    );
}

#[test]
fn composite_stays_composite() {
    let c = Composite::new(2.0, "J/s").unwrap();
    let w = c.convert_to("W").unwrap();
    assert_eq!(w.unit(), "W");
    assert_eq!(w.numerator.len(), 1);
    assert!((w.value - 2.0).abs() < 1e-12);
}

#[test]
fn identical_target() {
    let c = q(2.0, "m/s");
    assert_eq!(c.convert_to("m/s").unwrap(), c);
}

#[test]
fn in_place() {
    let mut p = q(1.0, "atm");
    p.convert_in_place("kPa").unwrap();
    assert_close(&p, &q(101.325, "kPa"), 1e-12);
}

#[test]
fn not_allowed() {
    assert_eq!(
        q(1.0, "m").convert_to("kg").unwrap_err(),
        UnitError::NotAllowed {
            from: "m".to_string(),
            to: "kg".to_string()
        }
    );
    assert!(matches!(
        q(1.0, "W/m^2*K").convert_to("BTU/hr*ft*F"),
        Err(UnitError::NotAllowed { .. })
    ));
    assert!(matches!(
        Quantity::Number(1.0).convert_to("m"),
        Err(UnitError::NotAllowed { .. })
    ));
}

#[test]
fn repeated_symbol_target() {
    assert_eq!(
        q(1.0, "m*m/s").convert_to("m/s").unwrap_err(),
        UnitError::NotAllowed {
            from: "m*m/s".to_string(),
            to: "m/s".to_string()
        }
    );
    let area = q(2.0, "m*m/s").convert_to("cm^2/s").unwrap();
    assert_close(&area, &q(20000.0, "cm^2/s"), 1e-12);
}

#[test]
fn unconvertible() {
    assert_eq!(
        q(1.0, "foo/s").convert_to("m/s").unwrap_err(),
        UnitError::Unconvertible {
            symbol: "foo".to_string()
        }
    );
    assert_eq!(
        q(1.0, "mph").convert_to("m/s").unwrap_err(),
        UnitError::Unconvertible {
            symbol: "mph".to_string()
        }
    );
}

#[test]
fn unknown_prefix() {
    assert!(matches!(
        q(1.0, "GW").convert_to("W"),
        Err(UnitError::UnknownPrefix { prefix: 'G', .. })
    ));
    assert!(matches!(
        q(1.0, "nm").convert_to("m"),
        Err(UnitError::UnknownPrefix { prefix: 'n', .. })
    ));
}

#[test]
fn parse_errors() {
    assert!(matches!(Quantity::new(1.0, "m^"), Err(UnitError::Parse(_))));
    assert!(matches!(q(1.0, "m").convert_to("m//s"), Err(UnitError::Parse(_))));
}

#[test]
fn registered_units() {
    let mut system = UnitSystem::standard();
    system
        .register_unit("ksi", "psi", |x| x * 1000.0, |x| x / 1000.0)
        .unwrap();
    system
        .register("furlong", Dimension::Length, Conversion::Scale(201.168))
        .unwrap();

    let p = system.convert(&Quantity::scalar(1.0, "ksi"), "kPa").unwrap();
    assert_close(&p, &q(6894.76, "kPa"), 1e-12);
    let v = system.convert(&q(1.0, "furlong/day"), "m/s").unwrap();
    assert_close(&v, &q(201.168 / 86400.0, "m/s"), 1e-12);

    assert!(matches!(
        system.register("furlong", Dimension::Length, Conversion::Scale(1.0)),
        Err(UnitError::Definitions(_))
    ));
    assert_eq!(
        system.register_relative("x", "nope", Conversion::Scale(1.0)),
        Err(UnitError::Unregistered("nope".to_string()))
    );

    /* The shared system does not know the new units. */
    assert!(Quantity::scalar(1.0, "ksi").convert_to("kPa").is_err());
}
