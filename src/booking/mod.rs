//! Registration pricing: age brackets, session pricing, form reconciliation
//! and the program catalog that drives them.

pub mod age;
pub mod form;
pub mod pricing;
pub mod program;

pub use age::AgeBracket;
pub use form::{DaySelection, FormQuote};
pub use pricing::{PriceBasis, RateTable, SessionKind};
pub use program::{ProgramBuilder, ProgramCatalog, ProgramDefinition};
