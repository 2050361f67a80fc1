use serde_json::{Map, Value};

/// Look up a value by dot-separated path, e.g. `"traveler.age_class"`.
///
/// Numeric segments index into arrays (`"flight_options.0.price"`).
/// Returns `None` if any segment is absent.
#[must_use]
pub fn get_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('.').collect();
    get_recursive(payload, &segments)
}

/// Write `value` at a dot-separated path, creating intermediate objects as
/// needed. Intermediate scalars are replaced by objects; arrays are only
/// entered through an in-range numeric index.
///
/// Returns the previous value at the path, or `None` if it did not exist.
/// Returns `Err(())` when the path is empty, the root is not an object, or a
/// segment cannot index an array on the way.
pub(crate) fn set_path(payload: &mut Value, path: &str, value: Value) -> Result<Option<Value>, ()> {
    if !is_valid_path(path) || !payload.is_object() {
        return Err(());
    }
    let segments: Vec<&str> = path.split('.').collect();
    set_recursive(payload, &segments, value)
}

/// A path is valid if it is non-empty and has no empty segments.
#[must_use]
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(|segment| !segment.is_empty())
}

fn get_recursive<'a>(current: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    match segments {
        [] => Some(current),
        [first, rest @ ..] => {
            let next = match current {
                Value::Object(map) => map.get(*first)?,
                Value::Array(items) => items.get(first.parse::<usize>().ok()?)?,
                _ => return None,
            };
            get_recursive(next, rest)
        }
    }
}

fn set_recursive(
    current: &mut Value,
    segments: &[&str],
    value: Value,
) -> Result<Option<Value>, ()> {
    let [first, rest @ ..] = segments else {
        return Ok(Some(std::mem::replace(current, value)));
    };
    if let Value::Array(items) = current {
        let slot = first
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get_mut(idx))
            .ok_or(())?;
        return set_recursive(slot, rest, value);
    }
    if rest.is_empty() {
        return Ok(match current {
            Value::Object(map) => map.insert((*first).to_owned(), value),
            _ => replace_with_object(current, first, value),
        });
    }
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    let Value::Object(map) = current else {
        return Err(());
    };
    let entry = map
        .entry((*first).to_owned())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() && !entry.is_array() {
        *entry = Value::Object(Map::new());
    }
    set_recursive(entry, rest, value)
}

fn replace_with_object(current: &mut Value, key: &str, value: Value) -> Option<Value> {
    let mut map = Map::new();
    map.insert(key.to_owned(), value);
    *current = Value::Object(map);
    None
}
