//! Stress log input schema
//!
//! This module defines the wire shape of one classified message as produced by the
//! upstream classifier (`Stress_label`, `Stress_category`, `Stress_Reason`) and the
//! adapter that validates logs into [`crate::types::Record`] values.

mod adapter;
mod raw_log;

pub use adapter::*;
pub use raw_log::*;
