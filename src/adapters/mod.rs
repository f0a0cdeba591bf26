// Adapters layer: concrete implementations for external systems (Docker daemon, filesystem).

pub mod docker;
pub mod memory;
pub mod storage;
