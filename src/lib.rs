//! Client-side behaviour for the showreel site: nav state, reveal
//! animations, hero parallax, smooth anchor scrolling and the work modal.
//!
//! Everything except `frontend` (wasm32 only) is written against [`surface::Surface`],
//! so it runs the same against the browser and against the test fake.

pub mod config;
pub mod error;
pub mod frame;
pub mod links;
pub mod modal;
pub mod nav;
pub mod page;
pub mod parallax;
pub mod reveal;
pub mod scroll;
pub mod smooth_scroll;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(test)]
mod testing;

pub use config::BehaviorConfig;
pub use error::SetupError;
pub use page::{Key, Outcome, Page, UiEvent};
pub use surface::Surface;
