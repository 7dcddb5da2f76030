//! Application module: exposes the view model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds purely presentational
//! state (list cursor, side panel). Playback state lives in the controller.

mod model;

pub use model::*;
