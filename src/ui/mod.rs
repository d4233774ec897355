//! Presentation layer.
//!
//! The coordinator does not produce markup; it computes immutable view models
//! that a host applies to the page, plus the grid widget options.
//!
//! ```text
//! PageState → compute_viewmodel → PageViewModel → host / render_text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable page state
//! - [`renderer`]: Plain-text renderer used by the replay binary
//! - [`grid`]: Initialisation options for the external table widget

pub mod grid;
pub mod renderer;
pub mod viewmodel;

pub use grid::{GridOptions, TableKind};
pub use renderer::render_text;
pub use viewmodel::{BannerView, ControlView, GridView, PageViewModel};
