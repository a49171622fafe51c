use super::*;

pub(crate) fn run() -> Result<(), eframe::Error> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SpyGlass Viewer")
            .with_inner_size([1180.0, 800.0])
            .with_min_inner_size([840.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpyGlass Viewer",
        native_options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::default()))),
    )
}
