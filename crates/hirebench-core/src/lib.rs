//! hirebench-core: data model, traits and evaluation pipeline.
//!
//! Everything here is engine- and network-agnostic. The JavaScript loader
//! lives in `hirebench-runner` and the question backend in
//! `hirebench-providers`.

pub mod binder;
pub mod engine;
pub mod error;
pub mod executor;
pub mod judge;
pub mod model;
pub mod parser;
pub mod scheduler;
pub mod session;
pub mod traits;
