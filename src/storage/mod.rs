//! Storage layer: advisory locking, the line-delimited record store, and
//! the domain registry.
//!
//! The domain file is the only shared mutable resource in the system. All
//! mutation goes through [`DomainStore::mutate`], which composes the lock
//! with an atomic read-modify-write cycle; reads never take the lock.

pub mod lock;
mod registry;
mod store;

pub use lock::with_lock;
pub use registry::DomainRegistry;
pub use store::DomainStore;
