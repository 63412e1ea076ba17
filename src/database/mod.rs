pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use models::{Message, MessageChanges, NewMessage, NewUser, User};
pub use postgres::PgMessageStore;
pub use store::{MessageStore, StoreError, StoreResult};
