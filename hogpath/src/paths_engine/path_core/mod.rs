pub mod aggregator;
pub mod config;
pub mod event;
pub mod extractor;
pub mod path_core;
