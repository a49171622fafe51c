use super::loader::decode_document_bytes;
use super::loader::execute_load;
use super::loader::parse_charset_from_html_prefix;
use super::loader::resolve_input_path;
use super::ui::truncate_label;
use super::FrameLayout;
use sg_layout::LayoutOracle;
use std::path::PathBuf;

#[test]
fn parses_meta_charset_from_html_prefix() {
    let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>x</body></html>";
    let parsed = parse_charset_from_html_prefix(html);
    assert_eq!(parsed.as_deref(), Some("ISO-8859-1"));
}

#[test]
fn decodes_bytes_using_meta_charset() {
    // 0xE9 is "e acute" in ISO-8859-1 and invalid UTF-8 on its own.
    let html = b"<meta charset='ISO-8859-1'><p>caf\xE9</p>";
    let decoded = decode_document_bytes(html);
    assert!(decoded.contains("caf\u{E9}"));
}

#[test]
fn unknown_charset_falls_back_to_lossy_utf8() {
    let html = b"<meta charset=\"no-such-charset\"><p>plain</p>";
    let decoded = decode_document_bytes(html);
    assert!(decoded.contains("plain"));
}

#[test]
fn empty_input_path_is_rejected() {
    let error = resolve_input_path("   ").err().map(|error| error.code);
    assert_eq!(error, Some("viewer.load.path_empty"));
}

#[test]
fn file_urls_resolve_to_local_paths() {
    let resolved = resolve_input_path("file:///tmp/notes.html");
    assert_eq!(resolved.ok(), Some(PathBuf::from("/tmp/notes.html")));
}

#[test]
fn remote_urls_are_rejected() {
    let error = resolve_input_path("https://example.com/page.html")
        .err()
        .map(|error| error.code);
    assert_eq!(error, Some("viewer.load.remote_unsupported"));
}

#[test]
fn plain_paths_pass_through() {
    let resolved = resolve_input_path("  docs/guide.html ");
    assert_eq!(resolved.ok(), Some(PathBuf::from("docs/guide.html")));
}

#[test]
fn loading_a_missing_file_reports_read_failed() {
    let error = execute_load("/definitely/not/here.html")
        .err()
        .map(|error| error.code);
    assert_eq!(error, Some("viewer.load.read_failed"));
}

#[test]
fn nav_labels_are_truncated_on_char_boundaries() {
    let label = truncate_label("caf\u{E9} caf\u{E9} caf\u{E9}", 6);
    assert_eq!(label, "caf\u{E9} \u{2026}");
    assert_eq!(truncate_label("short", 6), "short");
}

#[test]
fn frame_layout_reports_measured_geometry() {
    let layout = FrameLayout {
        scroll_y: 120.0,
        viewport_height: 600.0,
        content_height: 2400.0,
        nav_bar_height: Some(36.0),
        section_tops: vec![("intro".to_owned(), 0.0), ("details".to_owned(), 800.0)],
    };

    assert_eq!(layout.viewport().scroll_y, 120.0);
    assert_eq!(layout.viewport().height, 600.0);
    assert_eq!(layout.document_height(), 2400.0);
    assert_eq!(layout.nav_bar_height(), Some(36.0));
    assert_eq!(layout.section_top("details"), Some(800.0));
    assert_eq!(layout.section_viewport_top("details"), Some(680.0));
    assert_eq!(layout.section_top("missing"), None);
}
