//! Deliberation history stores.

mod in_memory;

pub use in_memory::InMemoryHistory;
