//! Interaction layer for the Target Integrated Solution marketing page.
//!
//! Compiled to WebAssembly (feature `browser`) this crate runs once at page
//! load: it greets the visitor by time of day, marks the device class, wires
//! the navigation links and product cards, adds the theme toggle and
//! back-to-top controls, and reacts to scrolling. All behavior goes through
//! the [`host::Host`] trait, so the same code runs natively against
//! [`memory::MemoryHost`] in tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | Setup steps and event handlers ([`page::Page`]) |
//! | [`session`] | A page bound to its host; the dispatch entry point |
//! | [`host`] | Capability trait the page runs against |
//! | [`events`] | Listener, event and scheduled-task types |
//! | [`markup`] | Declarative element specs and patches |
//! | [`controls`] | Specs for the badge, notification and injected buttons |
//! | [`theme`] | Light/dark toggle, persistence and the dark stylesheet |
//! | [`greeting`] | Time-of-day greeting |
//! | [`config`] | Thresholds, texts and selectors |
//! | [`memory`] | In-memory host with a virtual clock |
//! | [`arena`] | Stable handles for host-owned elements |
//! | `browser` | `web-sys` host and WASM entry point (feature `browser`) |
//! | [`consts`] | Shared constants |

pub mod arena;
#[cfg(feature = "browser")]
pub mod browser;
pub mod config;
pub mod consts;
pub mod controls;
pub mod error;
pub mod events;
pub mod greeting;
pub mod host;
pub mod markup;
pub mod memory;
pub mod page;
pub mod session;
pub mod theme;

pub use config::PageConfig;
pub use error::PageError;
pub use session::Session;
