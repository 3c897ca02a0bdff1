//! # blobdeck HTTP Server Module
//!
//! Browser front-end for one object-storage container, served with Axum.
//!
//! # Endpoints
//!
//! - `/` - Container listing and upload form
//! - `/upload` - Multipart upload (field `file`)
//! - `/download/*name` - Buffered attachment download
//! - `/stream-download/*name` - Chunked attachment download
//! - `/health` - Health check

pub mod config;
pub mod flash;
pub mod observability_routes;
pub mod server;
pub mod storage_routes;
pub mod views;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use storage_routes::StorageState;
