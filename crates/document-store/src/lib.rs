pub mod document;
pub mod error;
pub mod filter;
pub mod memory;
pub mod postgres;
pub mod store;

pub use common::{DocumentId, InvalidDocumentId};
pub use document::{Document, Fields, decode, encode};
pub use error::{DocumentStoreError, Result};
pub use filter::Filter;
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use store::{DEFAULT_LIST_LIMIT, DocumentStore, DocumentStoreExt, Mutation, UpsertOutcome};
