//! Booking microservice core.
//!
//! Manages the lifecycle of rental bookings (create, confirm, reject, cancel,
//! re-window, lookup) while guaranteeing that no two active bookings for the
//! same listing ever hold overlapping date ranges, even under concurrent
//! requests. State-changing operations serialize behind a per-listing
//! exclusivity scope; committed changes fan out to an event notifier on a
//! best-effort basis.

pub mod bookings;
pub mod config;
pub mod error;
pub mod telemetry;
