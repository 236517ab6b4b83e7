pub mod connection;
pub mod memory;
pub mod models;
pub mod repository;
pub mod schema;

pub use memory::InMemoryProductStore;
pub use models::{DecodeError, RawProduct};
pub use repository::{PgProductStore, ProductStore, StoreError};
