//! Configuration for the Roster Generation Engine.
//!
//! Engine tunables live in a single `settings.yaml` file loaded through
//! [`SettingsLoader`]; [`RosterSettings::default`] carries the Award
//! values.

pub mod loader;
pub mod types;

pub use loader::SettingsLoader;
pub use types::RosterSettings;
