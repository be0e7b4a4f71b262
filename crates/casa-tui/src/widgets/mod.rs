//! Reusable widgets for the dashboard.

pub mod adjuster;
pub mod state_button;

pub use adjuster::{Adjuster, AdjusterStyle};
pub use state_button::StateButton;
