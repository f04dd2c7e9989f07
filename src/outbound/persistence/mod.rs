//! Persistence adapters.
//!
//! The in-memory adapters back the repository ports with process-local
//! state. They honour the same atomicity contract a database adapter would:
//! every conditional insert holds the store lock across both the duplicate
//! check and the write.

mod memory_identity_repository;
mod memory_relationship_repository;

pub use memory_identity_repository::MemoryIdentityRepository;
pub use memory_relationship_repository::MemoryRelationshipRepository;
