//! Storage implementations for record persistence

pub mod in_memory;

pub use in_memory::InMemoryPersister;
