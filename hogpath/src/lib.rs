#[cfg(feature = "compiler")]
pub mod hogqlc;
pub mod paths_engine;
pub mod protocol;
