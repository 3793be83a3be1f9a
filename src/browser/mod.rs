pub mod capability;
pub mod error;
pub mod webdriver;

pub use capability::{Browser, ElementHandle, Rect};
pub use error::BrowserError;
