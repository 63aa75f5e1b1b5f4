//! Static file server
//!
//! Serves the index page and the two export workbooks from one directory.
//! Run with `quicken-server`.

pub mod server;

pub use server::{router, run_server, ServerConfig};
