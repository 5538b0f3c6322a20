//! Chrome DevTools Protocol (CDP) client for menuscrape.
//!
//! Connects to Chrome/Chromium over WebSocket and speaks the CDP JSON-RPC
//! protocol directly, with no Node.js or driver binary in between.
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │   menuscrape    │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │ (local / remote) │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let page = client.new_page().await?;
//! page.navigate("https://example.com", Duration::from_secs(30)).await?;
//! ```
//!
//! Browsers are obtained through a [`BrowserProvider`]: [`RemoteBrowser`] for
//! an endpoint handed out by a hosted service, [`LocalChrome`] to launch one.

mod client;
mod error;
mod protocol;
pub mod provider;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use provider::{BrowserProvider, LocalChrome, LocalChromeConfig, RemoteBrowser};
pub use session::PageSession;
