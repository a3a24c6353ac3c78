// src/tui/widgets/mod.rs — Widget sub-modules for each tab panel.

pub mod ledger;
pub mod profile;
pub mod spectrum;
pub mod studio;
