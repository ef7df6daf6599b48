//! Canonical login targets.
//!
//! A target is the lower-cased host of a web URI, or the package id of an
//! app link (`android://<hash>@com.example.app/`). Normalizing a target
//! again returns it unchanged.

/// True when `uri` starts with one of the app-link schemes (ASCII case-insensitive).
pub fn is_app_link<S: AsRef<str>>(uri: &str, app_schemes: &[S]) -> bool {
    app_schemes
        .iter()
        .any(|scheme| strip_prefix_ignore_case(uri, scheme.as_ref()).is_some())
}

/// Canonicalize a URI into a comparable target string.
pub fn normalize_uri<S: AsRef<str>>(uri: &str, app_schemes: &[S]) -> String {
    if is_app_link(uri, app_schemes) {
        app_id(uri)
    } else {
        web_domain(uri)
    }
}

/// Package id between the first `@` and the following `/`, else everything
/// after the last scheme separator.
fn app_id(uri: &str) -> String {
    let between_at_and_slash = uri.find('@').and_then(|at| {
        let rest = &uri[at + 1..];
        // At least one character before the slash.
        rest.char_indices()
            .skip(1)
            .find(|&(_, c)| c == '/')
            .map(|(end, _)| &rest[..end])
    });
    let id = match between_at_and_slash {
        Some(id) => id,
        None => {
            let tail = uri.rsplit("://").next().unwrap_or(uri);
            tail.split('/').next().unwrap_or(tail)
        }
    };
    id.to_lowercase()
}

fn web_domain(uri: &str) -> String {
    let rest = strip_prefix_ignore_case(uri, "https://")
        .or_else(|| strip_prefix_ignore_case(uri, "http://"))
        .unwrap_or(uri)
        .to_lowercase();
    let rest = rest.strip_suffix('/').unwrap_or(&rest);
    rest.split('/').next().unwrap_or_default().to_string()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
