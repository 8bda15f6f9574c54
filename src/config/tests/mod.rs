//! Unit tests for configuration loading and precedence.
//!
//! - `helpers`: Layer composition shared by the tests
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Content, options, and page geometry resolution

mod field_resolution;
mod helpers;
mod precedence;
