//! # blobdeck File Storage Module
//!
//! The storage client the HTTP front-end talks to: one container, four
//! operations (list, read whole, read chunked, overwrite).

pub mod errors;
pub mod backend;
pub mod chunks;
pub mod connection;
pub mod filename;
pub mod object_store_backend;

pub use errors::{StorageError, StorageResult};
pub use backend::{ByteStream, StorageBackend};
pub use chunks::{ChunkStream, StreamState};
pub use connection::ConnectionString;
pub use filename::secure_filename;
pub use object_store_backend::ObjectStoreBackend;
