pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod record;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;
pub use record::RecordError;
pub use store::{Collection, Document, DocumentStore, StoreError, UnavailableStore, UpdateResult};
