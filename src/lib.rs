//! Gherkin-driven browser UI tests for the Elite Shoppy demo store and
//! Google Search.
//!
//! Layers, leaf to root: [`locator`] registries name elements, [`element`]
//! gives synchronized access to them over a [`browser`] session, [`page`]
//! models compose that access per page, [`steps`] dispatch scenario text to
//! handlers, and [`runner`] drives scenarios through lifecycle hooks into a
//! run record that [`report`] renders.

pub mod browser;
pub mod cli;
pub mod element;
pub mod locator;
pub mod page;
pub mod report;
pub mod runner;
pub mod steps;
pub mod trace;
pub mod validation;
