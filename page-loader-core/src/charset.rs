// Text decoding for downloaded pages

use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

/// How far into the body a `<meta charset>` declaration is looked for.
const META_PREFIX_LEN: usize = 1024;

/// Decode an HTML body to text.
///
/// The encoding comes from the `charset` parameter of `content_type`, then
/// from a charset declaration near the top of the document, then defaults to
/// UTF-8. A byte order mark overrides all of them. Unknown labels are skipped.
pub fn decode_html(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(body, content_type);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!("Body is not valid {}, malformed bytes replaced", used.name());
    }
    text.into_owned()
}

/// The encoding [`decode_html`] would use for `body`, before BOM sniffing.
pub fn detect_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| {
            charset_from_meta(body).and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or(UTF_8)
}

fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|part| {
        let (name, value) = part.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches('"').trim_matches('\'');
        (!label.is_empty()).then(|| label.to_string())
    })
}

/// Finds `charset=` in the document prefix, which covers both
/// `<meta charset="..">` and the `http-equiv` form.
fn charset_from_meta(body: &[u8]) -> Option<String> {
    let prefix = String::from_utf8_lossy(&body[..body.len().min(META_PREFIX_LEN)]);
    let lower = prefix.to_ascii_lowercase();

    lower.match_indices("charset=").find_map(|(start, needle)| {
        let rest = prefix[start + needle.len()..].trim_start();
        let rest = rest.trim_start_matches(['"', '\'']);
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | ';' | '>' | '/'))
            .unwrap_or(rest.len());
        let label = &rest[..end];
        (!label.is_empty()).then(|| label.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{WINDOWS_1251, WINDOWS_1252};

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=windows-1251"),
            Some("windows-1251".to_string())
        );
        assert_eq!(
            charset_from_content_type("text/html;Charset=\"UTF-8\""),
            Some("UTF-8".to_string())
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
    }

    #[test]
    fn test_charset_from_meta() {
        assert_eq!(
            charset_from_meta(b"<html><head><meta charset=\"koi8-r\"></head>"),
            Some("koi8-r".to_string())
        );
        assert_eq!(
            charset_from_meta(
                b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1251\">"
            ),
            Some("windows-1251".to_string())
        );
        assert_eq!(charset_from_meta(b"<html><body>no declaration</body></html>"), None);
    }

    #[test]
    fn test_header_wins_over_meta() {
        let body = b"<meta charset=\"windows-1252\">";
        assert_eq!(
            detect_encoding(body, Some("text/html; charset=windows-1251")),
            WINDOWS_1251
        );
        assert_eq!(detect_encoding(body, Some("text/html")), WINDOWS_1252);
        assert_eq!(detect_encoding(body, None), WINDOWS_1252);
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        assert_eq!(detect_encoding(b"<p>hi</p>", Some("text/html; charset=bogus")), UTF_8);
        assert_eq!(detect_encoding(b"<p>hi</p>", None), UTF_8);
    }

    #[test]
    fn test_decode_windows_1251() {
        let (bytes, _, _) = WINDOWS_1251.encode("<p>Привет</p>");
        let text = decode_html(&bytes, Some("text/html; charset=windows-1251"));
        assert_eq!(text, "<p>Привет</p>");
    }

    #[test]
    fn test_decode_uses_meta_without_header() {
        let mut body = b"<meta charset=\"windows-1251\"><p>".to_vec();
        body.extend_from_slice(&WINDOWS_1251.encode("Мир").0);
        let text = decode_html(&body, None);
        assert!(text.ends_with("<p>Мир"));
    }

    #[test]
    fn test_bom_overrides_declared_charset() {
        let body = "\u{feff}<p>Ёж</p>".as_bytes();
        let text = decode_html(body, Some("text/html; charset=windows-1251"));
        assert_eq!(text, "<p>Ёж</p>");
    }
}
