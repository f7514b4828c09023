mod automatic_entrypoints;
mod color;
mod entrypoints;
mod recent_scripts;
mod role;

pub mod settings;

pub use automatic_entrypoints::*;
pub use color::*;
pub use entrypoints::*;
pub use recent_scripts::*;
pub use role::*;
