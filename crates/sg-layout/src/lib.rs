//! Geometry metrics and the live-layout measurement boundary.

use sg_core::SpyError;
use sg_core::SpyResult;

/// Scroll state of the host viewport at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_y: f64,
    pub height: f64,
}

/// Document-coordinate box of one tracked section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRect {
    pub top: f64,
    pub height: f64,
}

/// Live layout reads injected into the highlighter.
///
/// Implementations report the current layout on every call, not a cached
/// snapshot; the engine re-reads positions each time it recomputes.
pub trait LayoutOracle {
    fn viewport(&self) -> ViewportMetrics;

    /// Height of the fixed navigation region, `None` when the region is
    /// absent from the document.
    fn nav_bar_height(&self) -> Option<f64>;

    /// Total scrollable height of the document.
    fn document_height(&self) -> f64;

    /// Document-coordinate top of a section, `None` when it cannot be
    /// measured right now.
    fn section_top(&self, section_id: &str) -> Option<f64>;

    /// Viewport-relative top of a section's bounding box. Hosts whose live
    /// layout diverges from the scroll arithmetic can override this.
    fn section_viewport_top(&self, section_id: &str) -> Option<f64> {
        let scroll_y = self.viewport().scroll_y;
        self.section_top(section_id).map(|top| top - scroll_y)
    }
}

/// Deterministic oracle over synthetic geometry.
///
/// Backs the engine tests and any headless host: sections are plain
/// `(id, rect)` data and the viewport is mutated directly to simulate
/// scrolling and resizing.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticLayout {
    viewport: ViewportMetrics,
    nav_bar_height: Option<f64>,
    document_height: f64,
    sections: Vec<(String, SectionRect)>,
}

impl StaticLayout {
    pub fn new(viewport: ViewportMetrics, document_height: f64) -> SpyResult<Self> {
        if !viewport.scroll_y.is_finite() || !viewport.height.is_finite() || viewport.height < 0.0 {
            return Err(SpyError::new(
                "layout.viewport_invalid",
                format!(
                    "viewport must be finite with non-negative height (scroll_y={}, height={})",
                    viewport.scroll_y, viewport.height
                ),
            ));
        }

        if !document_height.is_finite() || document_height < 0.0 {
            return Err(SpyError::new(
                "layout.document_height_invalid",
                format!("document height must be finite and non-negative ({document_height})"),
            ));
        }

        Ok(Self {
            viewport,
            nav_bar_height: None,
            document_height,
            sections: Vec::new(),
        })
    }

    pub fn with_nav_bar_height(mut self, height: f64) -> Self {
        self.nav_bar_height = Some(height);
        self
    }

    pub fn with_section(mut self, id: impl Into<String>, rect: SectionRect) -> Self {
        self.sections.push((id.into(), rect));
        self
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport.height = height;
    }
}

impl LayoutOracle for StaticLayout {
    fn viewport(&self) -> ViewportMetrics {
        self.viewport
    }

    fn nav_bar_height(&self) -> Option<f64> {
        self.nav_bar_height
    }

    fn document_height(&self) -> f64 {
        self.document_height
    }

    fn section_top(&self, section_id: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|(id, _)| id == section_id)
            .map(|(_, rect)| rect.top)
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutOracle;
    use super::SectionRect;
    use super::StaticLayout;
    use super::ViewportMetrics;

    fn viewport(scroll_y: f64, height: f64) -> ViewportMetrics {
        ViewportMetrics { scroll_y, height }
    }

    #[test]
    fn rejects_non_finite_viewport() {
        let result = StaticLayout::new(viewport(f64::NAN, 900.0), 2000.0);
        assert!(result.is_err());
        let error = result.err().map(|error| error.code);
        assert_eq!(error, Some("layout.viewport_invalid"));
    }

    #[test]
    fn rejects_negative_document_height() {
        let result = StaticLayout::new(viewport(0.0, 900.0), -1.0);
        let error = result.err().map(|error| error.code);
        assert_eq!(error, Some("layout.document_height_invalid"));
    }

    #[test]
    fn viewport_relative_top_subtracts_scroll_offset() {
        let layout = StaticLayout::new(viewport(400.0, 900.0), 3000.0)
            .map(|layout| {
                layout.with_section(
                    "details",
                    SectionRect {
                        top: 1000.0,
                        height: 600.0,
                    },
                )
            })
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(layout.section_top("details"), Some(1000.0));
        assert_eq!(layout.section_viewport_top("details"), Some(600.0));
    }

    #[test]
    fn unknown_section_is_unmeasurable() {
        let layout =
            StaticLayout::new(viewport(0.0, 900.0), 2000.0).unwrap_or_else(|_| unreachable!());
        assert_eq!(layout.section_top("missing"), None);
        assert_eq!(layout.section_viewport_top("missing"), None);
    }

    #[test]
    fn nav_bar_height_defaults_to_absent() {
        let layout =
            StaticLayout::new(viewport(0.0, 900.0), 2000.0).unwrap_or_else(|_| unreachable!());
        assert_eq!(layout.nav_bar_height(), None);

        let layout = layout.with_nav_bar_height(60.0);
        assert_eq!(layout.nav_bar_height(), Some(60.0));
    }
}
