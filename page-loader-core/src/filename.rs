// URL to filesystem name mapping

use url::{Position, Url};

const HTML_EXTENSION: &str = ".html";
const ASSETS_DIR_SUFFIX: &str = "_files";

/// The `host[:port]` part of a URL, empty when the URL has no host.
pub fn network_location(url: &Url) -> &str {
    &url[Position::BeforeHost..Position::AfterPort]
}

/// Split `path` into stem and extension at the last `.` of its final segment.
///
/// Leading dots of the final segment never start an extension, so
/// `"site/.htaccess"` has none. The extension keeps its dot.
pub fn split_extension(path: &str) -> (&str, &str) {
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    let segment = &path[segment_start..];
    let leading_dots = segment.len() - segment.trim_start_matches('.').len();

    match segment.rfind('.') {
        Some(dot) if dot > leading_dots => path.split_at(segment_start + dot),
        _ => (path, ""),
    }
}

/// Map a URL to a filesystem-safe name.
///
/// Network location and path are joined, every character of the stem outside
/// `[A-Za-z0-9]` becomes `-`, and the original extension is kept. Paths with
/// no extension get `.html` unless they end in `/`. A URL naming only its host
/// (`https://example.com` or `https://example.com/`) becomes `<host>.html`.
///
/// ```
/// use page_loader_core::filename::format_filename;
/// use url::Url;
///
/// let url = Url::parse("https://ru.hexlet.io/assets/application.css").unwrap();
/// assert_eq!(format_filename(&url), "ru-hexlet-io-assets-application.css");
///
/// let root = Url::parse("https://ru.hexlet.io").unwrap();
/// assert_eq!(format_filename(&root), "ru-hexlet-io.html");
/// ```
pub fn format_filename(url: &Url) -> String {
    // The url crate stores an empty path as "/", so both spellings land here.
    if url.has_host() && url.path() == "/" {
        return format!("{}{}", hyphenate(network_location(url)), HTML_EXTENSION);
    }

    let location = format!("{}{}", network_location(url), url.path());
    let (stem, extension) = split_extension(&location);

    let mut name = hyphenate(stem);
    if extension.is_empty() && !location.ends_with('/') {
        name.push_str(HTML_EXTENSION);
    } else {
        name.push_str(extension);
    }
    name
}

fn hyphenate(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Name of the directory holding a page's assets: `<stem>_files`.
pub fn assets_dir_name(html_filename: &str) -> String {
    let (stem, _) = split_extension(html_filename);
    format!("{stem}{ASSETS_DIR_SUFFIX}")
}
