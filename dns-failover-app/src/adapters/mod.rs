//! Storage adapters.

mod memory;

pub use memory::{
    InMemoryAccountRepository, InMemoryActivityLog, InMemoryCredentialStore,
    InMemorySiteRepository,
};
