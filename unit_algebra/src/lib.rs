/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

pub mod atom;
pub mod composite;
pub mod conversion;
pub mod definitions;
pub mod dimension;
pub mod error;
pub mod parser;
pub mod prefix;
pub mod quantity;
pub mod scalar;
pub mod system;

pub use atom::Atom;
pub use composite::Composite;
pub use conversion::{Conversion, DimensionTable};
pub use definitions::Definitions;
pub use dimension::Dimension;
pub use error::UnitError;
pub use prefix::MetricPrefix;
pub use quantity::Quantity;
pub use scalar::Scalar;
pub use system::{DerivedUnit, UnitSystem};
