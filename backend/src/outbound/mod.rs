//! Outbound adapters (driven side of the hexagon).

pub mod mailer;
pub mod persistence;
