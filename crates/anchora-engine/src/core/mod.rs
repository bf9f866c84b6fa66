//! Contract between the runtime loop and the application.
//!
//! The runtime owns the window and device; the application sees them only
//! through [`App`] callbacks and the per-frame [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
