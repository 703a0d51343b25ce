//! Domain of the event: guests, what they bring, and the views organizers
//! build from it.

pub use categories::{ByCategory, Category};
pub use contributions::{Contribution, ContributionEntry};
pub use error::EngineError;
pub use guests::{Guest, GuestSummary, GuestWithContributions};
pub use ops::{ContributionBoard, Engine, EngineBuilder};
pub use stats::{
    Alert, AlertKind, AlertThresholds, CategoryTotals, ContributionTotals, Pledge, Statistics,
};
pub use validation::{
    ContributionInput, ContributionPatch, FieldError, GuestInput, GuestPatch, ValidationErrors,
};

mod categories;
mod contributions;
mod error;
mod guests;
mod ops;
pub mod stats;
pub mod validation;

type ResultEngine<T> = Result<T, EngineError>;
