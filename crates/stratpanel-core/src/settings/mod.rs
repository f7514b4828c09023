//! Persistent key-value preferences.
//!
//! Keys are hierarchical: a [`SettingsHandle`] can be narrowed to a group with
//! [`SettingsHandle::group`], and all keys read or written through the narrowed
//! handle are stored under `group/key`.

mod manager;

pub use manager::SettingsHandle;

/// Separator between group names and keys.
pub const GROUP_SEPARATOR: char = '/';
