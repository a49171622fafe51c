//! Scroll-position highlighting engine.
//!
//! Binds navigation links to their target sections once, then recomputes
//! the active link from live layout reads on every scroll, resize, and
//! initial-load trigger. Each computation is synchronous and derives the
//! result from scratch; there is no incremental state to invalidate.

use sg_dom::Document;
use sg_html::HtmlScanner;
use sg_layout::LayoutOracle;

/// Visual buffer added below the navigation region when probing.
const NAV_PROBE_GAP: f64 = 24.0;
/// Fraction of the viewport height the probe point sits below the fold.
const PROBE_VIEWPORT_FRACTION: f64 = 0.3;
/// Distance from the document bottom that counts as fully scrolled.
const BOTTOM_EPSILON: f64 = 2.0;

/// Recomputes the active navigation link from scroll position.
#[derive(Debug, Clone)]
pub struct Highlighter {
    // One entry per resolved link, in discovery order.
    bound_targets: Vec<String>,
    // Unique section ids, ascending bind-time top.
    scan_order: Vec<String>,
    active_id: Option<String>,
}

impl Highlighter {
    /// Resolves each fragment link against the document's sections,
    /// dropping links whose target does not exist. The ascending-top scan
    /// order is fixed here from the oracle's bind-time positions; live
    /// positions are still re-read on every [`recompute`](Self::recompute).
    pub fn bind(document: &Document, oracle: &dyn LayoutOracle) -> Self {
        let mut bound_targets = Vec::new();
        for link in &document.links {
            if link.target_id.is_empty() {
                continue;
            }
            if document.section(&link.target_id).is_none() {
                continue;
            }
            bound_targets.push(link.target_id.clone());
        }

        let mut scan_order: Vec<String> = Vec::new();
        for target in &bound_targets {
            if !scan_order.iter().any(|id| id == target) {
                scan_order.push(target.clone());
            }
        }
        scan_order.sort_by(|left, right| {
            let left_top = oracle.section_top(left).unwrap_or(f64::INFINITY);
            let right_top = oracle.section_top(right).unwrap_or(f64::INFINITY);
            left_top
                .partial_cmp(&right_top)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            bound_targets,
            scan_order,
            active_id: None,
        }
    }

    pub fn binding_count(&self) -> usize {
        self.bound_targets.len()
    }

    pub fn tracked_section_count(&self) -> usize {
        self.scan_order.len()
    }

    pub fn active_target(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Selects the current section and applies the active marker.
    ///
    /// The probe point sits `nav height + 24 + 0.3 × viewport` below the
    /// document top; the last section whose live top has passed it wins,
    /// with equal tops won by the later section in scan order. Within two
    /// pixels of the document bottom the last section still visible above
    /// the fold overrides that choice, so a short final section can be
    /// reached at all.
    ///
    /// With nothing bound this is a no-op returning `None`.
    pub fn recompute(
        &mut self,
        oracle: &dyn LayoutOracle,
        document: &mut Document,
    ) -> Option<String> {
        let Some(first_id) = self.scan_order.first() else {
            return None;
        };

        let viewport = oracle.viewport();
        let nav_offset = oracle.nav_bar_height().unwrap_or(0.0) + NAV_PROBE_GAP;
        let probe_y = viewport.scroll_y + nav_offset + viewport.height * PROBE_VIEWPORT_FRACTION;
        let at_bottom =
            viewport.scroll_y + viewport.height >= oracle.document_height() - BOTTOM_EPSILON;

        let mut current = first_id.as_str();
        let mut best_top = f64::NEG_INFINITY;
        for id in &self.scan_order {
            let Some(top) = oracle.section_top(id) else {
                continue;
            };
            if top <= probe_y && top >= best_top {
                best_top = top;
                current = id;
            }
        }

        if at_bottom {
            let cutoff = viewport.height - nav_offset;
            for id in self.scan_order.iter().rev() {
                let Some(relative_top) = oracle.section_viewport_top(id) else {
                    continue;
                };
                if relative_top < cutoff {
                    current = id;
                    break;
                }
            }
        }

        if current.is_empty() {
            return None;
        }

        let selected = current.to_owned();
        document.set_active_target(&selected);
        self.active_id = Some(selected.clone());
        Some(selected)
    }
}

/// Scanner-to-highlighter pipeline for one document.
///
/// Owns the scanned document and its bound highlighter together, the way
/// a host that does not manage the pieces itself consumes the engine.
#[derive(Debug)]
pub struct SpySession {
    document: Document,
    highlighter: Highlighter,
}

impl SpySession {
    pub fn from_html(source: &str, oracle: &dyn LayoutOracle) -> Self {
        let document = HtmlScanner.scan(source);
        Self::from_document(document, oracle)
    }

    pub fn from_document(document: Document, oracle: &dyn LayoutOracle) -> Self {
        let highlighter = Highlighter::bind(&document, oracle);
        Self {
            document,
            highlighter,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn recompute(&mut self, oracle: &dyn LayoutOracle) -> Option<String> {
        self.highlighter.recompute(oracle, &mut self.document)
    }
}
