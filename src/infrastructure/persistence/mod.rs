pub mod in_memory;
pub mod postgres_store;


pub use in_memory::InMemoryMessageStore;
pub use postgres_store::PostgresMessageStore;
