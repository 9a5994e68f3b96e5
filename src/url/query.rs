//! Nested query string encoding
//!
//! Maps and lists are flattened with brackets:
//!
//! ```text
//! o[size][w]=100&o[size][h]=50&e[tags][]=a&e[tags][]=b
//! ```
//!
//! Parsing reverses the flattening. `+` decodes to a space, as browsers
//! submit it.

use crate::constants::MAX_QUERY_DEPTH;
use crate::descriptor::{Options, Value};

use super::error::UrlError;

/// Percent-escape a single component
pub fn escape(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

/// Reverse [`escape`]. Invalid UTF-8 sequences are replaced.
pub fn unescape(text: &str) -> String {
    let spaced = text.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Escape each `/`-separated segment independently, keeping the slashes
pub fn escape_except_for_slashes(path: &str) -> String {
    path.split('/').map(escape).collect::<Vec<_>>().join("/")
}

/// Flatten `value` under the query key `prefix`
pub fn build_query(value: &Value, prefix: &str) -> String {
    match value {
        Value::Text(text) => format!("{}={}", prefix, escape(text)),
        Value::List(items) => {
            let prefix = format!("{}[]", prefix);
            join_pairs(items.iter().map(|item| build_query(item, &prefix)))
        }
        Value::Map(map) => join_pairs(
            map.iter()
                .map(|(key, item)| build_query(item, &format!("{}[{}]", prefix, escape(key)))),
        ),
    }
}

fn join_pairs(parts: impl Iterator<Item = String>) -> String {
    parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("&")
}

/// Parse a query string into nested values
pub fn parse_nested_query(query: &str) -> Result<Options, UrlError> {
    let mut params = Options::new();

    for pair in query.split(['&', ';']).filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = unescape(key);
        if key.is_empty() {
            continue;
        }

        let (name, segments) = split_key(&key);
        if segments.len() > MAX_QUERY_DEPTH {
            return Err(UrlError::malformed(
                truncate_key(&key),
                format!("nested deeper than {} levels", MAX_QUERY_DEPTH),
            ));
        }
        normalize(&mut params, &key, name, &segments, Value::Text(unescape(value)))?;
    }

    Ok(params)
}

// Keeps error messages short for oversized keys
fn truncate_key(key: &str) -> String {
    key.chars().take(64).collect()
}

// "o[a][b]" -> ("o", ["a", "b"]), "e[]" -> ("e", [""])
fn split_key(key: &str) -> (&str, Vec<&str>) {
    match key.find('[') {
        Some(open) if open > 0 && key.ends_with(']') => {
            let inner = &key[open + 1..key.len() - 1];
            (&key[..open], inner.split("][").collect())
        }
        _ => (key, Vec::new()),
    }
}

fn normalize(
    params: &mut Options,
    full_key: &str,
    name: &str,
    segments: &[&str],
    value: Value,
) -> Result<(), UrlError> {
    match segments.split_first() {
        None => {
            params.insert(name.to_string(), value);
        }
        Some((&"", rest)) => {
            let slot = params
                .entry(name.to_string())
                .or_insert_with(|| Value::List(Vec::new()));
            let Value::List(items) = slot else {
                return Err(UrlError::malformed(full_key, "expected a list"));
            };

            match rest.split_first() {
                None => items.push(value),
                Some((&"", _)) => {
                    return Err(UrlError::malformed(full_key, "nested lists are not supported"));
                }
                Some((child, rest)) => {
                    // Keys for the same list element arrive one pair at a time;
                    // a repeated key path starts the next element.
                    let reuse_last = matches!(
                        items.last(),
                        Some(Value::Map(map)) if !contains_path(map, child, rest)
                    );
                    if !reuse_last {
                        items.push(Value::Map(Options::new()));
                    }
                    if let Some(Value::Map(map)) = items.last_mut() {
                        normalize(map, full_key, child, rest, value)?;
                    }
                }
            }
        }
        Some((child, rest)) => {
            let slot = params
                .entry(name.to_string())
                .or_insert_with(|| Value::Map(Options::new()));
            let Value::Map(map) = slot else {
                return Err(UrlError::malformed(full_key, "expected a map"));
            };
            normalize(map, full_key, child, rest, value)?;
        }
    }
    Ok(())
}

// Whether `child[rest...]` already holds a value. Paths through a list
// never count, so list members keep filling the current element.
fn contains_path(map: &Options, child: &str, rest: &[&str]) -> bool {
    if rest.contains(&"") {
        return false;
    }
    let mut current = map.get(child);
    for segment in rest {
        current = match current {
            Some(Value::Map(inner)) => inner.get(*segment),
            _ => return false,
        };
    }
    current.is_some()
}
