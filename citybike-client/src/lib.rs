//! City bicycle journeys client.
//!
//! Browses journeys and stations served by the journeys REST API: paged,
//! sorted and month-filtered journey listings backed by an exact-match
//! cache, a TTL-bound station directory, and per-station statistics.

pub mod api;
pub mod config;
pub mod domain;
pub mod journeys;
pub mod stations;
pub mod view;
