//! Composite provider ids.
//!
//! A provider id names one or more sections by joining their eids with `+`.

const SEPARATOR: char = '+';

/// Joins section eids into one provider id.
pub fn pack_id<S: AsRef<str>>(eids: &[S]) -> String {
    let mut id = String::new();
    for (i, eid) in eids.iter().enumerate() {
        if i > 0 {
            id.push(SEPARATOR);
        }
        id.push_str(eid.as_ref());
    }
    id
}

/// Splits a provider id into section eids.
///
/// The split is exact: no trimming and no deduplication. An empty id names
/// no sections.
pub fn unpack_id(id: &str) -> Vec<String> {
    if id.is_empty() {
        return Vec::new();
    }
    id.split(SEPARATOR).map(String::from).collect()
}
