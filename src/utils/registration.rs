use std::collections::HashSet;

/// Canonical form of a registration number: whitespace, periods and hyphens removed.
///
/// Two registrations collide iff their canonical keys are equal.
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != '-')
        .collect()
}

/// Running set of canonical registration keys.
///
/// Seeded with the keys already persisted, then grown as an import accepts rows,
/// so later rows in the same batch see the earlier ones.
#[derive(Debug, Default)]
pub struct RegistrationIndex {
    keys: HashSet<String>,
}

impl RegistrationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.keys.contains(&sanitize(raw))
    }

    /// Returns false when the key was already known.
    pub fn insert(&mut self, raw: &str) -> bool {
        self.keys.insert(sanitize(raw))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl<S: AsRef<str>> FromIterator<S> for RegistrationIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(|k| sanitize(k.as_ref())).collect(),
        }
    }
}
