//! Collection/task domain model.
//!
//! # Responsibility
//! - Define the entities shared by registries and command operations.
//! - Validate every attribute eagerly on construction and mutation.
//! - Own the canonical status parse/format pair and timestamp formats.
//!
//! # Invariants
//! - Names are trimmed and never empty.
//! - `updated_at` and `due_date` never precede `created_at`.
//! - Ids are positive once an entity exists.

pub mod collection;
pub mod render;
pub mod status;
pub mod task;
pub mod timestamp;
pub mod validation;

pub use collection::{Collection, CollectionId, NewCollection};
pub use render::render_sections;
pub use status::TaskStatus;
pub use task::{NewTask, Task, TaskId};
pub use validation::ValidationError;
