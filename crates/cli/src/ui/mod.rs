//! Terminal output

pub mod icons;
pub mod report;

pub use icons::StatusIcon;
