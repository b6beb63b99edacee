//! gradebook-core: Weighted exam model, score entry, and result reconciliation.
//!
//! This crate defines the exam tree and its weight apportionment, the
//! interactive entry of task scores, the aggregation of scores into weighted
//! percentages and grades, and the CSV reconciliation of results with the
//! exam definition.

pub mod config;
pub mod entry;
pub mod error;
pub mod gradebook;
pub mod grading;
pub mod model;
pub mod parser;
pub mod presentation;
pub mod results;
pub mod table;
pub mod traits;

pub use error::{EntryError, GradebookError, ScoreError};
pub use gradebook::Gradebook;
pub use model::{Exam, Exercise, Question, Task, WeightedNode};
pub use presentation::{DisplayMode, Grid};
