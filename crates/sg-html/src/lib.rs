//! HTML discovery: navigation links and id-addressable sections.
//!
//! The scanner walks raw markup once and extracts what the highlighter
//! needs: the document title, fragment anchors inside navigation regions,
//! and every element carrying an `id`. It tolerates malformed markup and
//! never fails.

use sg_dom::Document;
use sg_dom::NavLink;
use sg_dom::Section;

const MAX_NAV_LINKS: usize = 256;
const MAX_TRACKED_SECTIONS: usize = 512;
const MAX_SECTION_TEXT_BYTES: usize = 32 * 1024;

/// Scans markup into a navigation [`Document`].
#[derive(Debug, Default)]
pub struct HtmlScanner;

impl HtmlScanner {
    pub fn scan(&self, source: &str) -> Document {
        let bytes = source.as_bytes();
        let mut state = ScanState::default();
        let mut idx = 0_usize;

        while idx < bytes.len() {
            if starts_with(bytes, idx, b"<!--") {
                idx = skip_comment(bytes, idx);
                continue;
            }

            if bytes[idx] == b'<' {
                if starts_with(bytes, idx, b"</") {
                    if let Some((name, next)) = parse_end_tag(bytes, idx) {
                        state.close_element(&name);
                        idx = next;
                        continue;
                    }
                } else if starts_with(bytes, idx, b"<!") || starts_with(bytes, idx, b"<?") {
                    idx = skip_decl(bytes, idx);
                    continue;
                } else if let Some((tag, next)) = parse_start_tag(bytes, idx) {
                    idx = next;

                    if !tag.self_closing && is_raw_text_tag(&tag.name) {
                        idx = skip_raw_text(bytes, idx, &tag.name);
                        continue;
                    }

                    state.open_element(tag);
                    continue;
                }
            }

            let (text, next) = parse_text(bytes, idx);
            if !text.is_empty() {
                state.append_text(&decode_entities(&text));
            }
            idx = next;
        }

        state.finish()
    }
}

#[derive(Debug)]
struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    nav_region: bool,
    is_title: bool,
    is_heading: bool,
    is_link: bool,
    capture_index: Option<usize>,
}

#[derive(Debug)]
struct SectionCapture {
    id: String,
    heading: String,
    heading_done: bool,
    body: String,
    open: bool,
}

#[derive(Debug)]
struct LinkCapture {
    target_id: String,
    label: String,
    fallback: Option<String>,
}

#[derive(Debug, Default)]
struct ScanState {
    document: Document,
    open: Vec<OpenElement>,
    captures: Vec<SectionCapture>,
    link: Option<LinkCapture>,
    title_text: String,
    nav_depth: usize,
    heading_depth: usize,
    title_depth: usize,
}

impl ScanState {
    fn open_element(&mut self, tag: StartTag) {
        let closes_immediately = tag.self_closing || is_void(&tag.name);
        let nav_region = is_nav_region(&tag);
        let is_heading = is_heading_tag(&tag.name);
        let is_title = tag.name == "title";

        let mut capture_index = None;
        if let Some(id) = attr_value(&tag.attrs, "id") {
            let id = id.trim();
            if !id.is_empty()
                && self.captures.len() < MAX_TRACKED_SECTIONS
                && !self.captures.iter().any(|capture| capture.id == id)
            {
                self.captures.push(SectionCapture {
                    id: id.to_owned(),
                    heading: String::new(),
                    heading_done: false,
                    body: String::new(),
                    open: !closes_immediately,
                });
                if !closes_immediately {
                    capture_index = Some(self.captures.len() - 1);
                }
            }
        }

        let mut is_link = false;
        if tag.name == "a" && self.nav_depth > 0 && self.link.is_none() && !closes_immediately {
            if let Some(target) = attr_value(&tag.attrs, "href").and_then(fragment_target) {
                if self.document.links.len() < MAX_NAV_LINKS {
                    let fallback = attr_value(&tag.attrs, "aria-label")
                        .or_else(|| attr_value(&tag.attrs, "title"))
                        .map(collapse_whitespace)
                        .filter(|label| !label.is_empty());
                    self.link = Some(LinkCapture {
                        target_id: target.to_owned(),
                        label: String::new(),
                        fallback,
                    });
                    is_link = true;
                }
            }
        }

        self.append_separator();

        if closes_immediately {
            return;
        }

        if nav_region {
            self.nav_depth = self.nav_depth.saturating_add(1);
        }
        if is_heading {
            self.heading_depth = self.heading_depth.saturating_add(1);
        }
        if is_title {
            self.title_depth = self.title_depth.saturating_add(1);
        }

        self.open.push(OpenElement {
            name: tag.name,
            nav_region,
            is_title,
            is_heading,
            is_link,
            capture_index,
        });
    }

    fn close_element(&mut self, name: &str) {
        // Stray end tags with no matching open element are dropped.
        let Some(position) = self.open.iter().rposition(|el| el.name == name) else {
            return;
        };

        while self.open.len() > position {
            let Some(el) = self.open.pop() else {
                break;
            };
            self.finalize_element(el);
        }
    }

    fn finalize_element(&mut self, el: OpenElement) {
        if el.nav_region {
            self.nav_depth = self.nav_depth.saturating_sub(1);
        }

        if el.is_heading {
            self.heading_depth = self.heading_depth.saturating_sub(1);
            for capture in self.captures.iter_mut().filter(|capture| capture.open) {
                if !capture.heading.trim().is_empty() {
                    capture.heading_done = true;
                }
            }
        }

        if el.is_title {
            self.title_depth = self.title_depth.saturating_sub(1);
            if self.document.title.is_none() {
                let title = collapse_whitespace(&self.title_text);
                if !title.is_empty() {
                    self.document.title = Some(title);
                }
            }
        }

        if el.is_link {
            if let Some(link) = self.link.take() {
                let label = collapse_whitespace(&link.label);
                let label = if label.is_empty() {
                    link.fallback.unwrap_or_else(|| link.target_id.clone())
                } else {
                    label
                };
                self.document.links.push(NavLink::new(link.target_id, label));
            }
        }

        if let Some(index) = el.capture_index {
            if let Some(capture) = self.captures.get_mut(index) {
                capture.open = false;
            }
        }

        self.append_separator();
    }

    fn append_text(&mut self, text: &str) {
        if self.title_depth > 0 {
            self.title_text.push_str(text);
        }

        if let Some(link) = self.link.as_mut() {
            link.label.push_str(text);
        }

        let route_to_heading = self.heading_depth > 0;
        for capture in self.captures.iter_mut().filter(|capture| capture.open) {
            if capture.heading.len() + capture.body.len() >= MAX_SECTION_TEXT_BYTES {
                continue;
            }
            if route_to_heading && !capture.heading_done {
                capture.heading.push_str(text);
            } else {
                capture.body.push_str(text);
            }
        }
    }

    /// Word boundary at element edges so adjacent blocks do not fuse.
    fn append_separator(&mut self) {
        if let Some(link) = self.link.as_mut() {
            link.label.push(' ');
        }
        for capture in self.captures.iter_mut().filter(|capture| capture.open) {
            if capture.heading.len() + capture.body.len() >= MAX_SECTION_TEXT_BYTES {
                continue;
            }
            if self.heading_depth > 0 && !capture.heading_done {
                capture.heading.push(' ');
            } else {
                capture.body.push(' ');
            }
        }
    }

    fn finish(mut self) -> Document {
        while let Some(el) = self.open.pop() {
            self.finalize_element(el);
        }

        for capture in self.captures {
            let mut section = Section::new(capture.id);
            section.heading = truncate_text(&collapse_whitespace(&capture.heading), MAX_SECTION_TEXT_BYTES);
            section.body_text = truncate_text(&collapse_whitespace(&capture.body), MAX_SECTION_TEXT_BYTES);
            self.document.sections.push(section);
        }

        self.document
    }
}

/// `#target` hrefs only; anything with a path, scheme, or empty fragment
/// is not an in-page navigation link.
fn fragment_target(href: &str) -> Option<&str> {
    let trimmed = href.trim();
    let target = trimmed.strip_prefix('#')?;
    if target.is_empty() {
        return None;
    }
    Some(target)
}

fn is_nav_region(tag: &StartTag) -> bool {
    if tag.name == "nav" {
        return true;
    }

    attr_value(&tag.attrs, "class").is_some_and(|classes| {
        classes
            .split_whitespace()
            .any(|token| token == "nav" || token == "links")
    })
}

fn attr_value<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn parse_start_tag(bytes: &[u8], start: usize) -> Option<(StartTag, usize)> {
    let mut idx = start + 1;
    skip_spaces(bytes, &mut idx);
    let name_start = idx;
    while idx < bytes.len() && is_name_char(bytes[idx]) {
        idx += 1;
    }
    if idx == name_start {
        return None;
    }

    let name = String::from_utf8_lossy(&bytes[name_start..idx]).to_ascii_lowercase();
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        skip_spaces(bytes, &mut idx);
        if idx >= bytes.len() {
            return None;
        }

        if bytes[idx] == b'>' {
            idx += 1;
            break;
        }

        if bytes[idx] == b'/' {
            self_closing = true;
            idx += 1;
            skip_spaces(bytes, &mut idx);
            if idx < bytes.len() && bytes[idx] == b'>' {
                idx += 1;
                break;
            }
            continue;
        }

        let attr_start = idx;
        while idx < bytes.len() && is_name_char(bytes[idx]) {
            idx += 1;
        }
        if idx == attr_start {
            // Unparseable attribute soup; skip to the end of the tag.
            while idx < bytes.len() && bytes[idx] != b'>' {
                idx += 1;
            }
            if idx < bytes.len() {
                idx += 1;
            }
            break;
        }

        let attr_name = String::from_utf8_lossy(&bytes[attr_start..idx]).to_ascii_lowercase();
        skip_spaces(bytes, &mut idx);

        let mut value = String::new();
        if idx < bytes.len() && bytes[idx] == b'=' {
            idx += 1;
            skip_spaces(bytes, &mut idx);
            if idx < bytes.len() && (bytes[idx] == b'"' || bytes[idx] == b'\'') {
                let quote = bytes[idx];
                idx += 1;
                let value_start = idx;
                while idx < bytes.len() && bytes[idx] != quote {
                    idx += 1;
                }
                value = String::from_utf8_lossy(&bytes[value_start..idx]).to_string();
                if idx < bytes.len() && bytes[idx] == quote {
                    idx += 1;
                }
            } else {
                let value_start = idx;
                while idx < bytes.len()
                    && !bytes[idx].is_ascii_whitespace()
                    && bytes[idx] != b'>'
                    && bytes[idx] != b'/'
                {
                    idx += 1;
                }
                value = String::from_utf8_lossy(&bytes[value_start..idx]).to_string();
            }
        }

        attrs.push((attr_name, decode_entities(&value)));
    }

    Some((
        StartTag {
            name,
            attrs,
            self_closing,
        },
        idx,
    ))
}

fn parse_end_tag(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 2;
    skip_spaces(bytes, &mut idx);
    let name_start = idx;
    while idx < bytes.len() && is_name_char(bytes[idx]) {
        idx += 1;
    }
    if idx == name_start {
        return None;
    }

    let name = String::from_utf8_lossy(&bytes[name_start..idx]).to_ascii_lowercase();
    while idx < bytes.len() && bytes[idx] != b'>' {
        idx += 1;
    }
    if idx >= bytes.len() {
        return None;
    }

    Some((name, idx + 1))
}

fn parse_text(bytes: &[u8], start: usize) -> (String, usize) {
    let mut idx = start;
    if idx < bytes.len() && bytes[idx] == b'<' {
        // A '<' that opened no tag is literal text.
        idx += 1;
    }
    while idx < bytes.len() && bytes[idx] != b'<' {
        idx += 1;
    }
    (String::from_utf8_lossy(&bytes[start..idx]).to_string(), idx)
}

/// Consumes `<script>`/`<style>` content up to the matching end tag; the
/// raw text never reaches the captures.
fn skip_raw_text(bytes: &[u8], start: usize, tag_name: &str) -> usize {
    let tag_bytes = tag_name.as_bytes();
    let mut idx = start;

    while idx < bytes.len() {
        if bytes[idx] != b'<'
            || idx + 2 + tag_bytes.len() > bytes.len()
            || bytes[idx + 1] != b'/'
        {
            idx = idx.saturating_add(1);
            continue;
        }

        let name_start = idx + 2;
        let name_end = name_start + tag_bytes.len();
        if !bytes[name_start..name_end].eq_ignore_ascii_case(tag_bytes) {
            idx = idx.saturating_add(1);
            continue;
        }

        let mut close = name_end;
        while close < bytes.len() && bytes[close] != b'>' {
            close = close.saturating_add(1);
        }
        if close < bytes.len() {
            return close + 1;
        }
        return bytes.len();
    }

    bytes.len()
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    let mut idx = start.saturating_add(4);
    while idx + 2 < bytes.len() {
        if bytes[idx] == b'-' && bytes[idx + 1] == b'-' && bytes[idx + 2] == b'>' {
            return idx + 3;
        }
        idx += 1;
    }
    bytes.len()
}

fn skip_decl(bytes: &[u8], start: usize) -> usize {
    let mut idx = start + 2;
    while idx < bytes.len() {
        if bytes[idx] == b'>' {
            return idx + 1;
        }
        idx += 1;
    }
    bytes.len()
}

fn skip_spaces(bytes: &[u8], idx: &mut usize) {
    while *idx < bytes.len() && bytes[*idx].is_ascii_whitespace() {
        *idx += 1;
    }
}

fn is_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':')
}

fn starts_with(bytes: &[u8], idx: usize, pattern: &[u8]) -> bool {
    let end = idx.saturating_add(pattern.len());
    end <= bytes.len() && &bytes[idx..end] == pattern
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_text(input: &str, max_bytes: usize) -> String {
    if input.len() <= max_bytes {
        return input.to_owned();
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    input[..end].to_owned()
}

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0_usize;

    while let Some(rel_amp) = input[cursor..].find('&') {
        let amp = cursor + rel_amp;
        out.push_str(&input[cursor..amp]);

        let rest = &input[(amp + 1)..];
        let Some(rel_semi) = rest.find(';') else {
            out.push('&');
            cursor = amp + 1;
            continue;
        };

        let semi = amp + 1 + rel_semi;
        let entity = &input[(amp + 1)..semi];
        if let Some(decoded) = decode_entity(entity) {
            out.push_str(&decoded);
            cursor = semi + 1;
        } else {
            out.push('&');
            cursor = amp + 1;
        }
    }

    out.push_str(&input[cursor..]);
    out
}

fn decode_entity(entity: &str) -> Option<String> {
    match entity {
        "nbsp" => Some(" ".to_owned()),
        "amp" => Some("&".to_owned()),
        "lt" => Some("<".to_owned()),
        "gt" => Some(">".to_owned()),
        "quot" => Some("\"".to_owned()),
        "apos" => Some("'".to_owned()),
        _ => {
            if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                let value = u32::from_str_radix(hex, 16).ok()?;
                char::from_u32(value).map(|ch| ch.to_string())
            } else if let Some(dec) = entity.strip_prefix('#') {
                let value = dec.parse::<u32>().ok()?;
                char::from_u32(value).map(|ch| ch.to_string())
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HtmlScanner;

    const PAGE: &str = r##"
        <html>
          <head><title> Field Notes </title></head>
          <body>
            <nav class="nav">
              <div class="links">
                <a href="#intro">Intro</a>
                <a href="#details">Details</a>
                <a href="#missing">Missing</a>
                <a href="https://example.com/#external">External</a>
              </div>
            </nav>
            <section id="intro"><h2>Introduction</h2><p>Opening words.</p></section>
            <section id="details"><h2>All the Details</h2><p>Body copy.</p></section>
          </body>
        </html>
    "##;

    #[test]
    fn discovers_fragment_links_and_sections() {
        let document = HtmlScanner.scan(PAGE);

        assert_eq!(document.title.as_deref(), Some("Field Notes"));

        let targets: Vec<&str> = document
            .links
            .iter()
            .map(|link| link.target_id.as_str())
            .collect();
        assert_eq!(targets, vec!["intro", "details", "missing"]);

        let ids: Vec<&str> = document
            .sections
            .iter()
            .map(|section| section.id.as_str())
            .collect();
        assert_eq!(ids, vec!["intro", "details"]);
    }

    #[test]
    fn section_headings_and_body_text_are_split() {
        let document = HtmlScanner.scan(PAGE);
        let details = document.section("details").unwrap_or_else(|| unreachable!());
        assert_eq!(details.heading, "All the Details");
        assert_eq!(details.body_text, "Body copy.");
    }

    #[test]
    fn anchors_outside_nav_regions_are_ignored() {
        let document = HtmlScanner.scan(
            "<body><p><a href=\"#intro\">inline</a></p><section id=\"intro\"></section></body>",
        );
        assert!(document.links.is_empty());
        assert_eq!(document.sections.len(), 1);
    }

    #[test]
    fn non_fragment_hrefs_are_not_navigation_links() {
        let document = HtmlScanner.scan(
            "<nav><a href=\"page.html#intro\">a</a><a href=\"/docs\">b</a><a href=\"#\">c</a></nav>",
        );
        assert!(document.links.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_the_first_element() {
        let document = HtmlScanner.scan(
            "<div id=\"dup\"><h3>First</h3></div><div id=\"dup\"><h3>Second</h3></div>",
        );
        assert_eq!(document.sections.len(), 1);
        let section = document.section("dup").unwrap_or_else(|| unreachable!());
        assert_eq!(section.heading, "First");
    }

    #[test]
    fn script_and_style_text_is_not_captured() {
        let document = HtmlScanner.scan(
            "<section id=\"s\"><script>var hidden = 1;</script><style>p{}</style><p>Visible</p></section>",
        );
        let section = document.section("s").unwrap_or_else(|| unreachable!());
        assert_eq!(section.body_text, "Visible");
    }

    #[test]
    fn id_on_a_heading_uses_its_own_text() {
        let document = HtmlScanner.scan("<h2 id=\"setup\">Setup Guide</h2><p>after</p>");
        let section = document.section("setup").unwrap_or_else(|| unreachable!());
        assert_eq!(section.heading, "Setup Guide");
        assert_eq!(section.body_text, "");
    }

    #[test]
    fn tag_and_attribute_names_are_case_insensitive() {
        let document =
            HtmlScanner.scan("<NAV><A HREF=\"#Top\">Top</A></NAV><DIV ID=\"Top\"></DIV>");
        assert_eq!(document.links.len(), 1);
        assert_eq!(document.links[0].target_id, "Top");
        assert_eq!(document.sections.len(), 1);
    }

    #[test]
    fn entities_are_decoded_in_labels() {
        let document = HtmlScanner.scan("<nav><a href=\"#qa\">Q&amp;A &#x2192;</a></nav>");
        assert_eq!(document.links[0].label, "Q&A \u{2192}");
    }

    #[test]
    fn empty_labels_fall_back_to_aria_label_then_target() {
        let document = HtmlScanner.scan(
            "<nav><a href=\"#one\" aria-label=\"Section One\"></a><a href=\"#two\"></a></nav>",
        );
        assert_eq!(document.links[0].label, "Section One");
        assert_eq!(document.links[1].label, "two");
    }

    #[test]
    fn class_links_region_counts_as_navigation() {
        let document = HtmlScanner.scan("<div class=\"links\"><a href=\"#x\">x</a></div>");
        assert_eq!(document.links.len(), 1);
    }

    #[test]
    fn malformed_markup_still_scans() {
        let document = HtmlScanner.scan("<nav><a href=\"#a\">broken <section id=\"a\"><p>text");
        assert_eq!(document.links.len(), 1);
        assert_eq!(document.sections.len(), 1);
    }

    #[test]
    fn void_elements_with_ids_become_empty_sections() {
        let document = HtmlScanner.scan("<img id=\"figure-1\" src=\"x.png\">");
        let section = document
            .section("figure-1")
            .unwrap_or_else(|| unreachable!());
        assert_eq!(section.body_text, "");
    }

    #[test]
    fn comments_and_doctypes_are_skipped() {
        let document =
            HtmlScanner.scan("<!DOCTYPE html><!-- <a href=\"#ghost\">x</a> --><nav><a href=\"#real\">r</a></nav>");
        assert_eq!(document.links.len(), 1);
        assert_eq!(document.links[0].target_id, "real");
    }
}
