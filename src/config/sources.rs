//! Configuration file sources, in precedence order (lowest first).

pub mod global_file;
pub mod workspace_file;
