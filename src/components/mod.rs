//! The components module contains all shared components for our app.

mod app;
mod app_view;
mod icons;
mod status_view;

pub use app::*;
pub use app_view::*;
pub use icons::*;
pub use status_view::*;
