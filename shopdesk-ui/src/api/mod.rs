//! Browser Bindings
//!
//! Backend connection settings, local-storage stores and the small set of
//! DOM calls (history, downloads, clipboard) the pages need.

pub mod browser;
pub mod client;
pub mod storage;

pub use browser::{confirm, copy_to_clipboard, download, BrowserHistory};
pub use client::{connect, get_backend_url, set_backend_url};
pub use storage::{LocalScratchStore, LocalTokenStore};
