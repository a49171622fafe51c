use super::loader::execute_load;
use super::*;

impl Default for ViewerApp {
    fn default() -> Self {
        Self {
            path_input: std::env::var(HOME_FILE_ENV).unwrap_or_default(),
            page: None,
            status_line: DEFAULT_STATUS.to_owned(),
            last_error: None,
            next_request_id: 1,
            inflight_request_id: None,
            load_receiver: None,
            show_highlight_details: false,
            toolbar_height: 0.0,
            home_file_attempted: false,
        }
    }
}

impl ViewerApp {
    fn open(&mut self, raw_path: String) {
        let display_path = raw_path.trim().to_owned();
        self.path_input = display_path.clone();
        self.status_line = format!("Loading {display_path}...");
        self.last_error = None;

        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.saturating_add(1);
        self.inflight_request_id = Some(request_id);

        let (tx, rx) = mpsc::channel();
        self.load_receiver = Some(rx);

        let load_job = move || {
            let result = execute_load(&display_path).map_err(|error| error.to_string());
            let _ = tx.send(LoadResult { request_id, result });
        };

        if thread::Builder::new()
            .name("spyglass-load".to_owned())
            .stack_size(LOAD_THREAD_STACK_SIZE)
            .spawn(load_job)
            .is_err()
        {
            self.inflight_request_id = None;
            self.load_receiver = None;
            self.status_line = "Load failed".to_owned();
            self.last_error = Some("failed to spawn load worker".to_owned());
        }
    }

    fn poll_loads(&mut self) {
        loop {
            let message = self
                .load_receiver
                .as_ref()
                .and_then(|receiver| receiver.try_recv().ok());

            let Some(message) = message else {
                break;
            };

            if Some(message.request_id) != self.inflight_request_id {
                continue;
            }

            self.inflight_request_id = None;
            self.load_receiver = None;

            match message.result {
                Ok(page) => {
                    self.status_line = format!(
                        "Loaded {} ({} sections, {} links)",
                        page.file_path.display(),
                        page.document.sections.len(),
                        page.document.links.len()
                    );
                    self.page = Some(PageState::new(page));
                    self.last_error = None;
                }
                Err(error) => {
                    self.status_line = "Load failed".to_owned();
                    self.last_error = Some(error);
                }
            }
        }
    }

    fn reload(&mut self) {
        let current = self
            .page
            .as_ref()
            .map(|state| state.page.file_path.display().to_string());

        match current {
            Some(path) => self.open(path),
            None => self.open(self.path_input.clone()),
        }
    }

    fn is_loading(&self) -> bool {
        self.inflight_request_id.is_some()
    }

    fn open_home_file_once(&mut self) {
        if self.home_file_attempted {
            return;
        }
        self.home_file_attempted = true;

        if !self.path_input.trim().is_empty() {
            self.open(self.path_input.clone());
        }
    }

    fn render_nav_panel(&self, ui: &mut egui::Ui) -> Option<String> {
        let Some(state) = self.page.as_ref() else {
            ui.label("No document loaded yet.");
            return None;
        };

        ui.heading(
            state
                .page
                .document
                .title
                .as_deref()
                .unwrap_or("Untitled document"),
        );
        ui.separator();

        if state.page.document.links.is_empty() {
            ui.label("This document has no in-page navigation.");
            return None;
        }

        let mut clicked = None;
        for link in &state.page.document.links {
            let label = truncate_label(&link.label, MAX_NAV_LABEL_CHARS);
            if ui.selectable_label(link.active, label).clicked() {
                clicked = Some(link.target_id.clone());
            }
        }
        clicked
    }

    fn render_document_panel(&mut self, ui: &mut egui::Ui) {
        let toolbar_height = self.toolbar_height;
        let Some(state) = self.page.as_mut() else {
            ui.label("Open a local HTML file to start.");
            return;
        };

        let pending_jump = state.pending_jump.take();
        let mut section_tops = Vec::with_capacity(state.page.document.sections.len());

        let sections = &state.page.document.sections;
        let output = egui::ScrollArea::vertical()
            .id_salt("document_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let origin_y = ui.cursor().top();
                for section in sections {
                    if pending_jump.as_deref() == Some(section.id.as_str()) {
                        ui.scroll_to_cursor(Some(egui::Align::TOP));
                    }
                    section_tops.push((section.id.clone(), ui.cursor().top() - origin_y));
                    render_section(ui, section);
                }
            });

        let layout = FrameLayout {
            scroll_y: output.state.offset.y,
            viewport_height: output.inner_rect.height(),
            content_height: output.content_size.y,
            nav_bar_height: Some(toolbar_height),
            section_tops,
        };

        // Scroll, resize, and initial load all surface here as a changed
        // (or absent) frame layout; anything else skips the recompute.
        let changed = state.last_layout.as_ref() != Some(&layout);
        if state.highlighter.is_none() {
            state.highlighter = Some(Highlighter::bind(&state.page.document, &layout));
        }
        if changed {
            if let Some(highlighter) = state.highlighter.as_mut() {
                highlighter.recompute(&layout, &mut state.page.document);
            }
            state.last_layout = Some(layout);
        }
    }

    fn render_highlight_details(&self, ui: &mut egui::Ui) {
        ui.heading("Highlight Details");
        ui.separator();

        let Some(state) = self.page.as_ref() else {
            ui.label("No document loaded yet.");
            return;
        };

        ui.label(format!("File: {}", state.page.file_path.display()));
        ui.label(format!("Markup bytes: {}", state.page.markup_bytes));
        ui.label(format!(
            "Discovered: {} sections, {} links",
            state.page.document.sections.len(),
            state.page.document.links.len()
        ));

        match state.highlighter.as_ref() {
            Some(highlighter) => {
                ui.label(format!(
                    "Bound: {} links over {} sections",
                    highlighter.binding_count(),
                    highlighter.tracked_section_count()
                ));
                ui.label(format!(
                    "Active target: {}",
                    highlighter.active_target().unwrap_or("-")
                ));
            }
            None => {
                ui.label("Highlighter: waiting for the first measured frame");
            }
        }

        if let Some(layout) = state.last_layout.as_ref() {
            ui.separator();
            ui.label(format!("Scroll offset: {:.1}", layout.scroll_y));
            ui.label(format!("Viewport height: {:.1}", layout.viewport_height));
            ui.label(format!("Content height: {:.1}", layout.content_height));
            ui.label(format!(
                "Nav bar height: {:.1}",
                layout.nav_bar_height.unwrap_or(0.0)
            ));
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loads();
        self.open_home_file_once();

        if ctx.input(|input| input.key_pressed(egui::Key::F12)) {
            self.show_highlight_details = !self.show_highlight_details;
        }
        if self.is_loading() {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }

        let toolbar = egui::TopBottomPanel::top("toolbar_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Reload").clicked() {
                    self.reload();
                }

                let width = (ui.available_width() - 90.0).max(200.0);
                let response = ui.add_sized(
                    [width, 28.0],
                    egui::TextEdit::singleline(&mut self.path_input)
                        .hint_text("Path or file:// URL of an HTML document"),
                );

                let pressed_enter =
                    response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
                if pressed_enter || ui.button("Open").clicked() {
                    self.open(self.path_input.clone());
                }

                if self.is_loading() {
                    ui.spinner();
                }
            });
        });
        self.toolbar_height = toolbar.response.rect.height();

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(&self.status_line);
                if let Some(error) = &self.last_error {
                    ui.colored_label(
                        egui::Color32::from_rgb(200, 65, 65),
                        format!("Error: {error}"),
                    );
                }
                ui.separator();
                ui.label("F12: Highlight Details");
            });
        });

        let mut jump_target: Option<String> = None;
        egui::SidePanel::left("nav_panel")
            .resizable(false)
            .default_width(230.0)
            .show(ctx, |ui| {
                jump_target = self.render_nav_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_document_panel(ui);
        });

        if let Some(target) = jump_target {
            if let Some(state) = self.page.as_mut() {
                state.pending_jump = Some(target);
            }
            ctx.request_repaint();
        }

        if self.show_highlight_details {
            egui::Window::new("Highlight Details")
                .id(egui::Id::new("highlight_details_window"))
                .resizable(true)
                .default_size([420.0, 360.0])
                .show(ctx, |ui| {
                    self.render_highlight_details(ui);
                });
        }
    }
}

fn render_section(ui: &mut egui::Ui, section: &sg_dom::Section) {
    let heading = if section.heading.is_empty() {
        section.id.as_str()
    } else {
        section.heading.as_str()
    };
    ui.label(egui::RichText::new(heading).strong().size(20.0));

    if !section.body_text.is_empty() {
        ui.add_space(6.0);
        ui.label(egui::RichText::new(section.body_text.as_str()).size(14.0));
    }

    ui.add_space(18.0);
    ui.separator();
    ui.add_space(18.0);
}

pub(super) fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let truncated: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}\u{2026}")
}
