//! Test fixtures for ev-route-planner.
//!
//! Provides:
//! - A north-south corridor along the prime meridian where coordinates are
//!   placed by kilometers from the origin
//! - A builder for stations with sensible defaults
//! - Routing providers that record or fail calls

#![allow(dead_code)]

pub mod corridor;
pub mod routers;

pub use corridor::*;
pub use routers::*;
