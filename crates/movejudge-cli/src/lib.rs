//! movejudge CLI library.
//!
//! This crate provides the command implementations behind the `movejudge`
//! binary: rendering sweeps, inspecting trajectories and converting sample
//! files.

pub mod commands;
