//! Voxfall (workspace facade crate).
//!
//! Re-exports the workspace crates as `voxfall::{types, core, replay}` so
//! hosts, integration tests and the batch runner share one import path
//! while the implementation lives in dedicated crates under `crates/`.

pub use voxfall_core as core;
pub use voxfall_replay as replay;
pub use voxfall_types as types;
