pub mod executor;
pub mod operation;
pub mod reconcile;
pub mod registry;
pub mod sampler;
