//! Text-mode presentation for CRTPad: title bar, tab strip, editor area,
//! status bar and the CRT frame around them.

pub mod chrome;
pub mod frame;
pub mod screen;
pub mod stats;
pub mod status;
pub mod width;

pub use chrome::{tab_strip, tabs, title_bar, Tab, APP_TITLE, APP_VERSION};
pub use frame::{CrtFrame, SCANLINE_MARKER};
pub use screen::{editor_rows, Screen, DEFAULT_WIDTH};
pub use stats::TextStats;
pub use status::StatusBar;
