// src/utils/url.rs

//! URL canonicalization and resolution.
//!
//! Canonical URLs are the deduplication keys of a crawl run. The resolver
//! intentionally stays string-based: hrefs are combined with the current
//! page's directory by concatenation, without RFC-3986 dot-segment
//! normalization.

/// Path extensions that are never fetched (binary assets, styles, media).
const SKIP_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "bmp", "css", "js", "json", "xml", "pdf",
    "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "gz", "tar", "7z", "mp3", "mp4",
    "avi", "mov", "wmv", "flv", "woff", "woff2", "ttf", "eot",
];

/// Hyperlink schemes that are not crawlable documents.
const REJECTED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:"];

/// Canonicalize a URL into its deduplication key form.
///
/// Lowercases the host, defaults the scheme to `https` and the path to `/`,
/// keeps the query verbatim and drops any fragment. Returns `None` when no
/// host can be found. Trailing slashes are preserved, so `/a` and `/a/`
/// stay distinct.
///
/// # Examples
/// ```
/// use sitefeed::utils::url::canonicalize;
///
/// assert_eq!(
///     canonicalize("https://Example.COM/About#team"),
///     Some("https://example.com/About".to_string())
/// );
/// ```
pub fn canonicalize(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    if without_fragment.is_empty() {
        return None;
    }

    let (scheme, rest) = match without_fragment.find("://") {
        Some(idx) => (&without_fragment[..idx], &without_fragment[idx + 3..]),
        // Protocol-relative form still carries a host
        None => match without_fragment.strip_prefix("//") {
            Some(stripped) => ("https", stripped),
            None => return None,
        },
    };

    let (authority, path_and_query) = match rest.find(['/', '?']) {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };
    if authority.is_empty() || scheme.is_empty() {
        return None;
    }

    let (path, query) = match path_and_query.find('?') {
        Some(idx) => (&path_and_query[..idx], &path_and_query[idx..]),
        None => (path_and_query, ""),
    };
    let path = if path.is_empty() { "/" } else { path };

    Some(format!(
        "{}://{}{}{}",
        scheme,
        authority.to_lowercase(),
        path,
        query
    ))
}

/// Resolve an href found on `base` into an absolute URL.
///
/// `seed_scheme` is used for protocol-relative hrefs (`//host/path`).
/// Returns `None` for non-document schemes and empty hrefs.
pub fn resolve(base: &str, href: &str, seed_scheme: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || is_rejected_scheme(href) {
        return None;
    }

    // Already absolute
    if starts_with_ignore_case(href, "http://") || starts_with_ignore_case(href, "https://") {
        return Some(href.to_string());
    }

    // Protocol-relative inherits the seed's scheme
    if href.starts_with("//") {
        return Some(format!("{seed_scheme}:{href}"));
    }

    let (scheme, host, path) = split_url(base)?;

    // Root-relative - combine with the base origin
    if href.starts_with('/') {
        return Some(format!("{scheme}://{host}{href}"));
    }

    // Directory-relative - combine with the base directory
    let dir = match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "/",
    };
    Some(format!("{scheme}://{host}{dir}{href}"))
}

/// Whether the canonical URL's path ends in a skipped asset extension.
pub fn has_skipped_extension(url: &str) -> bool {
    let Some((_, _, path)) = split_url(url) else {
        return false;
    };
    let path = path.split('?').next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_lowercase();
            SKIP_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

/// Extract the host of a URL, lowercased and without any port.
pub fn host_of(url: &str) -> Option<String> {
    let (_, host, _) = split_url(url)?;
    let host = host.split(':').next().unwrap_or_default();
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// Extract the scheme of a URL.
pub fn scheme_of(url: &str) -> Option<&str> {
    url.find("://").map(|idx| &url[..idx])
}

/// Registry/domain-scoping key for a host: lowercased, `www.` stripped.
pub fn host_key(host: &str) -> String {
    let host = host.to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Registry key for a URL (host without `www.` prefix or port).
pub fn domain_key(url: &str) -> Option<String> {
    host_of(url).map(|h| host_key(&h))
}

/// Whether two hosts belong to the same domain, ignoring a `www.` prefix.
pub fn same_domain(host: &str, other: &str) -> bool {
    host_key(host) == host_key(other)
}

fn is_rejected_scheme(href: &str) -> bool {
    REJECTED_SCHEMES
        .iter()
        .any(|scheme| starts_with_ignore_case(href, scheme))
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Split an absolute URL into (scheme, authority, path-and-query).
fn split_url(url: &str) -> Option<(&str, &str, &str)> {
    let scheme_end = url.find("://")?;
    let scheme = &url[..scheme_end];
    let rest = &url[scheme_end + 3..];
    let (host, path) = match rest.find(['/', '?']) {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, "/"),
    };
    if host.is_empty() {
        return None;
    }
    Some((scheme, host, path))
}
