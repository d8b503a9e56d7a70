use crate::error::{Error, Result};

/// Turn the opaque profile link embedded in a search result into a query
/// path for the player API.
///
/// The link is slash-delimited; its second segment is the identifier and
/// everything after it is re-joined with `|` so it survives as a single
/// path segment: `/players/42/profile` becomes `/42|profile`. The player
/// API undoes the substitution on its side, so the segment rule here is a
/// wire contract and must not drift.
pub fn resolve_detail_path(link: &str) -> Result<String> {
    let segments: Vec<&str> = link.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return Err(Error::MalformedLink(link.to_string()));
    }

    let mut path = String::with_capacity(link.len());
    path.push('/');
    path.push_str(segments[1]);
    for segment in &segments[2..] {
        path.push('|');
        path.push_str(segment);
    }
    Ok(path)
}
