pub mod calculations;
pub mod engine;
pub mod input;
pub mod models;
pub mod registry;

pub use engine::{
    BreakdownLine, EngineOptions, ScheduleBreakdown, TaxBreakdown, TaxEngine, TaxInputs,
};
pub use input::{ParseDecimalError, normalize_amount, parse_decimal};
pub use models::*;
pub use registry::{ConfigurationError, JurisdictionRegistry};
