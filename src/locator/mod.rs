pub mod elite_shoppy;
pub mod google;
pub mod registry;

pub use registry::{Locator, LocatorError, LocatorRegistry, Strategy};
