//! Playback: the media handle abstraction, its rodio implementation and the
//! controller that owns the single now-playing slot.
//!
//! All user interaction reaches the controller as a `Command`; the runtime
//! translates keys and mouse clicks into commands and feeds background
//! results back through `Controller::apply_loaded` (catalogs) and
//! `Controller::apply_media` (tracks).

mod command;
mod controller;
mod fetcher;
mod media;
mod rodio_backend;
mod session;
mod transport;

pub use command::*;
pub use controller::*;
pub use fetcher::*;
pub use media::*;
pub use rodio_backend::*;
pub use session::*;
pub use transport::*;

#[cfg(test)]
mod tests;
