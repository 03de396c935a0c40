pub mod error;
pub mod session;
pub mod store;

pub use error::StoreError;
pub use session::ScorerSession;
pub use store::{ChangeEvent, MatchStore, MemoryStore};
