use super::*;

pub(super) fn execute_load(raw_input: &str) -> SpyResult<LoadedPage> {
    let file_path = resolve_input_path(raw_input)?;

    let bytes = std::fs::read(&file_path).map_err(|error| {
        SpyError::new(
            "viewer.load.read_failed",
            format!("failed to read `{}`: {error}", file_path.display()),
        )
    })?;

    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(SpyError::new(
            "viewer.load.document_too_large",
            format!(
                "document is {} bytes (limit {MAX_DOCUMENT_BYTES})",
                bytes.len()
            ),
        ));
    }

    let markup = decode_document_bytes(&bytes);
    let document = sg_html::HtmlScanner.scan(&markup);

    Ok(LoadedPage {
        file_path,
        document,
        markup_bytes: bytes.len(),
    })
}

/// Accepts plain filesystem paths and `file://` URLs. Remote schemes are
/// rejected outright; this viewer never touches the network.
pub(super) fn resolve_input_path(raw_input: &str) -> SpyResult<PathBuf> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return Err(SpyError::new(
            "viewer.load.path_empty",
            "no document path given",
        ));
    }

    if trimmed.starts_with("file://") {
        let url = Url::parse(trimmed).map_err(|error| {
            SpyError::new(
                "viewer.load.url_invalid",
                format!("cannot parse `{trimmed}`: {error}"),
            )
        })?;
        return url.to_file_path().map_err(|_| {
            SpyError::new(
                "viewer.load.url_invalid",
                format!("`{trimmed}` does not name a local file"),
            )
        });
    }

    if let Ok(url) = Url::parse(trimmed) {
        if matches!(url.scheme(), "http" | "https") {
            return Err(SpyError::new(
                "viewer.load.remote_unsupported",
                "remote documents are not supported; pass a local file",
            ));
        }
    }

    Ok(PathBuf::from(trimmed))
}

pub(super) fn decode_document_bytes(bytes: &[u8]) -> String {
    if let Some(label) = parse_charset_from_html_prefix(bytes) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            let (decoded, _, _) = encoding.decode(bytes);
            return decoded.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).to_string()
}

pub(super) fn parse_charset_from_html_prefix(bytes: &[u8]) -> Option<String> {
    let prefix_len = bytes.len().min(CHARSET_SNIFF_BYTES);
    let prefix = String::from_utf8_lossy(&bytes[..prefix_len]);
    let lower = prefix.to_ascii_lowercase();
    let mut search_start = 0_usize;

    while let Some(relative) = lower[search_start..].find("charset=") {
        let charset_start = search_start + relative + "charset=".len();
        let remainder = &prefix[charset_start..];
        if let Some(label) = parse_charset_label(remainder) {
            return Some(label);
        }
        search_start = charset_start;
    }

    None
}

fn parse_charset_label(input: &str) -> Option<String> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return None;
    }

    let mut chars = trimmed.chars();
    let first = chars.next()?;

    if first == '"' || first == '\'' {
        let rest = &trimmed[first.len_utf8()..];
        let end = rest.find(first)?;
        let label = rest[..end].trim();
        return if label.is_empty() {
            None
        } else {
            Some(label.to_owned())
        };
    }

    let end = trimmed
        .find(|ch: char| ch.is_whitespace() || matches!(ch, '"' | '\'' | ';' | '>' | '/'))
        .unwrap_or(trimmed.len());
    let label = trimmed[..end].trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_owned())
    }
}
