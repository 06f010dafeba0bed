//! Domain models for the course content store.
//!
//! # Core Concepts
//!
//! ## Course tree
//!
//! - [`Course`]: top-level unit, identified by a globally unique slug.
//! - [`CourseModule`]: ordered section of a course, slug unique per course.
//! - [`Microlesson`]: standalone lesson unit with a *globally* unique slug.
//!   Microlessons are the shared-content mechanism: any module may reference
//!   one by slug, and two manifests using the same slug converge on the same
//!   row. Course-owned items ([`Lesson`], [`Lab`], [`Quiz`]) are scoped to a
//!   single module instead.
//! - [`Exercise`]: graded or practice activity under a microlesson. The
//!   exercise set is replaced wholesale whenever its microlesson reloads.
//!
//! ## Module links
//!
//! Course-owned items attach to a module through a [`ModuleItem`] join row
//! carrying an explicit sequence index and a required flag. Ordering is
//! always written explicitly; nothing relies on insertion order.

mod content_item;
mod course;
mod course_module;
mod microlesson;

pub use content_item::*;
pub use course::*;
pub use course_module::*;
pub use microlesson::*;

/// Result of a find-or-create-by-natural-key followed by an attribute merge.
#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub entity: T,
    /// True when the row did not exist before this call.
    pub created: bool,
}
