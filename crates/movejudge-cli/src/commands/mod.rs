//! CLI command implementations

pub mod convert;
pub mod json_output;
pub mod len;
pub mod render;
pub mod trajectory;
