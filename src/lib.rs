//! Core library for the token-swap form.
//!
//! Loads a price catalog, derives exchange rates, validates swap forms and
//! simulates their submission. The binary (`main.rs`) wires these into a
//! single demo session.

pub mod amount;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod rate;
pub mod session;
pub mod submission;
pub mod utils;
pub mod validation;
