//! # CubeSat EPS Simulator
//!
//! Discrete-time simulator of a small satellite's electrical power
//! system: solar-array generation, battery state-of-charge evolution,
//! and priority-based load shedding, coupled time-step by time-step
//! into a uniformly-sampled simulation trace.

pub mod config;
pub mod simulation;
pub mod telemetry;
