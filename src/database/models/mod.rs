pub mod message;
pub mod user;

pub use message::{Message, MessageChanges, NewMessage};
pub use user::{NewUser, User};
