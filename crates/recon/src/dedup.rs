use std::collections::HashSet;

/// Result of deduplicating one username sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduped {
    pub usernames: Vec<String>,
    pub removed: usize,
}

/// Remove exact duplicates, first occurrence wins, order otherwise kept.
pub fn dedupe(usernames: Vec<String>) -> Deduped {
    let before = usernames.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    let usernames: Vec<String> = usernames
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect();

    Deduped {
        removed: before - usernames.len(),
        usernames,
    }
}
