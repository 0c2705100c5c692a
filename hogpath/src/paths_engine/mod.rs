pub mod path_core;
pub mod types;
