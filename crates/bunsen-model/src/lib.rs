//! Data types shared by the bunsen form-state crates.

pub mod action;
pub mod cell;
pub mod error;
pub mod ids;
pub mod options;
pub mod validation;

pub use action::{Action, ActionKind, InitialState};
pub use cell::CellConfig;
pub use error::{BunsenError, Result};
pub use ids::{BunsenId, Segment};
pub use options::{FormOptions, STATIC_WIDGET};
pub use validation::{FieldErrors, ValidationIssue, ValidationResult};
