// Same-host classification of resource references

use crate::filename::network_location;
use url::Url;

/// Whether `resource_url`, resolved against the page, stays on the page's host.
///
/// A resolved URL without a network location (`data:`, `mailto:` and friends)
/// also counts as local. References that cannot be resolved at all are not.
pub fn is_local(resource_url: &str, page_url: &Url) -> bool {
    match page_url.join(resource_url) {
        Ok(resolved) => {
            let location = network_location(&resolved);
            location.is_empty() || location == network_location(page_url)
        }
        Err(_) => false,
    }
}

/// Resolve a local reference to the absolute URL that should be fetched.
///
/// Returns `None` for references that are not local, and for local ones that
/// have no host to fetch from.
pub fn resolve_local(resource_url: &str, page_url: &Url) -> Option<Url> {
    if !is_local(resource_url, page_url) {
        return None;
    }

    let resolved = page_url.join(resource_url).ok()?;
    match resolved.scheme() {
        "http" | "https" if resolved.has_host() => Some(resolved),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://ru.hexlet.io/courses").unwrap()
    }

    #[test]
    fn test_relative_paths_are_local() {
        assert!(is_local("/assets/application.css", &page()));
        assert!(is_local("assets/app.js", &page()));
        assert!(is_local("../img/logo.png", &page()));
    }

    #[test]
    fn test_absolute_same_host_is_local() {
        assert!(is_local("https://ru.hexlet.io/packs/js/runtime.js", &page()));
        assert!(is_local("http://ru.hexlet.io/packs/js/runtime.js", &page()));
    }

    #[test]
    fn test_protocol_relative_same_host_is_local() {
        assert!(is_local("//ru.hexlet.io/a.png", &page()));
    }

    #[test]
    fn test_other_hosts_are_not_local() {
        assert!(!is_local("https://cdn2.hexlet.io/assets/menu.css", &page()));
        assert!(!is_local("https://external.com/img.png", &page()));
        assert!(!is_local("//external.com/img.png", &page()));
        assert!(!is_local("https://hexlet.io/", &page()));
    }

    #[test]
    fn test_port_is_part_of_network_location() {
        let page = Url::parse("http://localhost:8080/index").unwrap();
        assert!(is_local("http://localhost:8080/a.js", &page));
        assert!(!is_local("http://localhost:9090/a.js", &page));
    }

    #[test]
    fn test_hostless_reference_is_local_but_not_fetchable() {
        let data = "data:image/png;base64,iVBORw0KGgo=";
        assert!(is_local(data, &page()));
        assert_eq!(resolve_local(data, &page()), None);
        assert_eq!(resolve_local("mailto:team@hexlet.io", &page()), None);
    }

    #[test]
    fn test_resolve_local_returns_absolute_url() {
        let resolved = resolve_local("/assets/application.css", &page()).unwrap();
        assert_eq!(resolved.as_str(), "https://ru.hexlet.io/assets/application.css");

        assert_eq!(resolve_local("https://external.com/img.png", &page()), None);
    }

    #[test]
    fn test_unresolvable_reference_is_not_local() {
        assert!(!is_local("http://[not-an-ip/x.png", &page()));
    }
}
