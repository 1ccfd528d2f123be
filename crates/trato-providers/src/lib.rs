// crates/trato-providers/src/lib.rs
// ============================================================================
// Module: Trato Providers
// Description: Built-in location sources for signature geolocation capture.
// Purpose: Provide host-agnostic geolocation backends aligned with Trato core.
// Dependencies: trato-core, serde
// ============================================================================

//! ## Overview
//! This crate ships built-in [`trato_core::LocationSource`] implementations:
//! a fixed source for hosts with known coordinates, denied and silent sources
//! for platforms without geolocation capability, a channel source bridging
//! asynchronous host callbacks, and an environment-backed source for
//! deployment-configured coordinates.
//! Invariants:
//! - Sources never bound their own waiting time; the signing runtime does.
//! - Sources fail closed: invalid coordinates become denials, never fixes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod channel;
pub mod env;
pub mod fixed;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use channel::ChannelFixHandle;
pub use channel::ChannelLocationSource;
pub use env::EnvLocationConfig;
pub use env::EnvLocationSource;
pub use fixed::DeniedLocationSource;
pub use fixed::FixedLocationSource;
pub use fixed::SilentLocationSource;
