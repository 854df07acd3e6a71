pub mod credentials;
pub mod location;
pub mod page;
pub mod router;
pub mod storage;
pub mod store;

pub use credentials::{CredentialStore, Credentials};
pub use location::Location;
pub use page::Page;
pub use router::Router;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{Subscription, Writable};
