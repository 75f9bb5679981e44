//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and owns the library tree, the
//! listing collaborator and the state the renderer reads each frame.

mod model;

pub use model::*;
