//! blobdeck - a minimal web front-end for an object-storage container
//!
//! List, upload, download and stream blobs through a browser.

pub mod cli;
pub mod file_storage;
pub mod http_server;
