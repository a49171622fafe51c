use eframe::egui;
use encoding_rs::Encoding;
use sg_core::SpyError;
use sg_core::SpyResult;
use sg_dom::Document;
use sg_layout::LayoutOracle;
use sg_layout::ViewportMetrics;
use sg_spy::Highlighter;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use url::Url;

include!("constants.rs");
include!("types.rs");

mod loader;
mod startup;
#[cfg(test)]
mod tests;
mod ui;

pub(crate) use startup::run;
