//! The presentation collaborator: turns a resolved market block into a
//! self-contained static page and publishes it atomically.
//!
//! Rendering has no opinion about how the row was chosen - it receives a
//! prepared [`PageModel`] and emits HTML. A degraded resolution shows up
//! only as the model's diagnostic notice.

mod page;
mod write;

pub use page::{PageModel, render_page};
pub use write::write_page;
