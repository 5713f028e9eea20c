//! # Context URL Derivation
//!
//! A linked-data context document identifies itself with a URL derived
//! from the project metadata:
//!
//! ```text
//! {base}/{category}/{leaf}
//!
//! leaf = credential_name              when present and non-empty
//!      = slug(title)                  otherwise
//! ```
//!
//! The category is kept as given (trimmed) and percent-encoded as a single
//! path segment, so distinct categories never share a URL. Empty segments
//! are dropped, never doubled. The derivation is a pure function of its
//! inputs.

use url::Url;

/// Namespace every context URL lives under unless configured otherwise.
pub const DEFAULT_CONTEXT_BASE_URL: &str = "https://schemas.credef.dev/contexts";

/// Lower-case ASCII slug: alphanumerics are kept, every run of anything
/// else becomes a single `-`, and leading/trailing hyphens are stripped.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Derive the context URL under [`DEFAULT_CONTEXT_BASE_URL`].
pub fn derive_context_url(
    title: &str,
    category: Option<&str>,
    credential_name: Option<&str>,
) -> String {
    derive_context_url_with_base(DEFAULT_CONTEXT_BASE_URL, title, category, credential_name)
}

/// Derive the context URL under an explicit base.
///
/// `credential_name` is used as given, apart from trimming and collapsing
/// empty path segments; each `/`-separated part becomes one segment. It is
/// not re-slugified. A base that does not parse as a hierarchical URL is
/// joined textually, without encoding.
pub fn derive_context_url_with_base(
    base: &str,
    title: &str,
    category: Option<&str>,
    credential_name: Option<&str>,
) -> String {
    let segments = path_segments(title, category, credential_name);

    match Url::parse(base) {
        Ok(mut url) => {
            let extended = match url.path_segments_mut() {
                Ok(mut path) => {
                    path.pop_if_empty().extend(&segments);
                    true
                }
                Err(()) => false,
            };
            if extended {
                return url.into();
            }
            tracing::debug!(base, "context base cannot carry path segments");
            join_textually(base, &segments)
        }
        Err(e) => {
            tracing::debug!(base, error = %e, "context base is not a URL");
            join_textually(base, &segments)
        }
    }
}

fn path_segments(title: &str, category: Option<&str>, credential_name: Option<&str>) -> Vec<String> {
    let mut segments = Vec::new();
    if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
        segments.push(category.to_string());
    }
    match credential_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => segments.extend(
            name.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        ),
        None => {
            let slug = slugify(title);
            if !slug.is_empty() {
                segments.push(slug);
            }
        }
    }
    segments
}

fn join_textually(base: &str, segments: &[String]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment);
    }
    url
}
