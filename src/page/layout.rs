//! Viewport presets and layout checks shared by page models.

use tracing::{debug, info};

use crate::browser::error::BrowserError;
use crate::element::access::ElementAccess;
use crate::element::outcome::Outcome;
use crate::element::wait::WaitError;
use crate::locator::registry::Locator;

/// Minimum touch target edge in CSS pixels.
pub const MIN_TOUCH_TARGET_PX: f64 = 44.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const DESKTOP: Viewport = Viewport {
        name: "desktop",
        width: 1920,
        height: 1080,
    };
    pub const TABLET: Viewport = Viewport {
        name: "tablet",
        width: 768,
        height: 1024,
    };
    pub const MOBILE: Viewport = Viewport {
        name: "mobile",
        width: 375,
        height: 667,
    };

    pub fn presets() -> [Viewport; 3] {
        [Viewport::DESKTOP, Viewport::TABLET, Viewport::MOBILE]
    }
}

/// Resize the window and wait for the layout to stop changing.
///
/// A layout that keeps moving past the settle budget is not an error; the
/// resize itself succeeded.
pub fn resize(access: &mut ElementAccess<'_>, width: u32, height: u32) -> Result<(), BrowserError> {
    access.set_window_size(width, height)?;
    match access.wait_for_layout_stable() {
        Ok(metrics) => debug!("layout settled at {}x{}: {:?}", width, height, metrics),
        Err(WaitError::TimedOut { .. }) => {
            debug!("layout still moving after resize to {}x{}", width, height)
        }
        Err(WaitError::Browser(e)) => return Err(e),
    }
    info!("Resized window to {}x{}", width, height);
    Ok(())
}

pub fn has_horizontal_scroll(access: &mut ElementAccess<'_>) -> Result<bool, BrowserError> {
    Ok(access.viewport_metrics()?.overflows_horizontally())
}

pub fn has_vertical_scroll_capacity(access: &mut ElementAccess<'_>) -> Result<bool, BrowserError> {
    Ok(access.viewport_metrics()?.overflows_vertically())
}

/// A landmark that is present but not displayed counts as covered by
/// another element. A landmark that is absent altogether does not.
pub fn has_hidden_landmark(
    access: &mut ElementAccess<'_>,
    landmarks: &[Locator],
) -> Result<bool, BrowserError> {
    for landmark in landmarks {
        match access.visibility(landmark) {
            Outcome::Found(true) | Outcome::NotFound => {}
            Outcome::Found(false) => {
                debug!("landmark {} is present but hidden", landmark);
                return Ok(true);
            }
            Outcome::Errored(e) => return Err(e),
        }
    }
    Ok(false)
}

/// Every element matched by `candidates` is at least `min_px` wide and high.
///
/// One undersized element fails the audit. Elements whose box cannot be
/// measured are skipped.
pub fn all_meet_minimum_size(
    access: &mut ElementAccess<'_>,
    candidates: &Locator,
    min_px: f64,
) -> Result<bool, BrowserError> {
    let elements = access.try_find_all(candidates)?;
    for (index, element) in elements.iter().enumerate() {
        match access.element_rect(element) {
            Outcome::Found(rect) => {
                if rect.width < min_px || rect.height < min_px {
                    debug!(
                        "touch target #{} is {}x{} (min {})",
                        index, rect.width, rect.height, min_px
                    );
                    return Ok(false);
                }
            }
            Outcome::NotFound => debug!("touch target #{} vanished before measuring", index),
            Outcome::Errored(e) => debug!("touch target #{} could not be measured: {}", index, e),
        }
    }
    Ok(true)
}
