#[derive(Debug, Clone)]
struct LoadedPage {
    file_path: PathBuf,
    document: Document,
    markup_bytes: usize,
}

#[derive(Debug)]
struct LoadResult {
    request_id: u64,
    result: Result<LoadedPage, String>,
}

/// Geometry measured while rendering one frame; serves as the layout
/// oracle for the highlight computation at the end of that frame.
#[derive(Debug, Clone, Default, PartialEq)]
struct FrameLayout {
    scroll_y: f32,
    viewport_height: f32,
    content_height: f32,
    nav_bar_height: Option<f32>,
    section_tops: Vec<(String, f32)>,
}

impl LayoutOracle for FrameLayout {
    fn viewport(&self) -> ViewportMetrics {
        ViewportMetrics {
            scroll_y: f64::from(self.scroll_y),
            height: f64::from(self.viewport_height),
        }
    }

    fn nav_bar_height(&self) -> Option<f64> {
        self.nav_bar_height.map(f64::from)
    }

    fn document_height(&self) -> f64 {
        f64::from(self.content_height)
    }

    fn section_top(&self, section_id: &str) -> Option<f64> {
        self.section_tops
            .iter()
            .find(|(id, _)| id == section_id)
            .map(|(_, top)| f64::from(*top))
    }
}

#[derive(Debug)]
struct PageState {
    page: LoadedPage,
    // Bound on the first frame with measured geometry, not at load time.
    highlighter: Option<Highlighter>,
    last_layout: Option<FrameLayout>,
    pending_jump: Option<String>,
}

impl PageState {
    fn new(page: LoadedPage) -> Self {
        Self {
            page,
            highlighter: None,
            last_layout: None,
            pending_jump: None,
        }
    }
}

struct ViewerApp {
    path_input: String,
    page: Option<PageState>,
    status_line: String,
    last_error: Option<String>,
    next_request_id: u64,
    inflight_request_id: Option<u64>,
    load_receiver: Option<mpsc::Receiver<LoadResult>>,
    show_highlight_details: bool,
    toolbar_height: f32,
    home_file_attempted: bool,
}
