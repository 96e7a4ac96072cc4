//! Alert tag aggregation

use super::event::PropertyValue;

/// Split a comma-delimited tags setting into trimmed, non-empty tags.
pub fn parse_static_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge static tags with tags taken from an event property.
///
/// Static tags come first, then dynamic tags in source order. A tag is
/// skipped when it case-insensitively matches anything already collected.
pub fn build_tags(static_tags: &[String], dynamic: Option<&PropertyValue>) -> Vec<String> {
    let mut tags = Vec::with_capacity(static_tags.len());
    for tag in static_tags {
        push_unique(&mut tags, tag);
    }

    match dynamic {
        Some(PropertyValue::List(items)) => {
            for item in items {
                push_unique(&mut tags, item);
            }
        }
        Some(PropertyValue::String(raw)) => {
            for item in raw.split(',') {
                push_unique(&mut tags, item);
            }
        }
        Some(PropertyValue::Other(_)) | None => {}
    }

    tags
}

fn push_unique(tags: &mut Vec<String>, candidate: &str) {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return;
    }
    let folded = candidate.to_lowercase();
    if tags.iter().any(|t| t.to_lowercase() == folded) {
        return;
    }
    tags.push(candidate.to_string());
}
