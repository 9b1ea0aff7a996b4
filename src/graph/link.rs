/// Routing prefix the site mounts documents under.
pub const DEFAULT_ROUTING_PREFIX: &str = "/posts/";

/// Turn a raw link reference into a node id.
///
/// The first matching routing prefix is stripped; failing that a single
/// leading `/` is. Fragments and trailing separators are dropped.
pub fn normalize_link<S: AsRef<str>>(raw: &str, prefixes: &[S]) -> Option<String> {
    let trimmed = raw.trim();
    let without_fragment = trimmed.split_once('#').map_or(trimmed, |(path, _)| path);

    let stripped = prefixes
        .iter()
        .find_map(|p| without_fragment.strip_prefix(p.as_ref()))
        .or_else(|| without_fragment.strip_prefix('/'))
        .unwrap_or(without_fragment);

    let id = stripped.trim_end_matches('/');
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
