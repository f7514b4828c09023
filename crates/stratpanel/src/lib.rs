mod action;
mod command;
mod panel;
mod panel_set;
mod style;

pub use action::*;
pub use command::*;
pub use panel::*;
pub use panel_set::*;
pub use style::*;
