use std::collections::BTreeSet;

use super::model::Picture;

/// Every tag seen in any catalogue since startup.
///
/// Additive only: tags of deleted pictures stay known so they keep showing
/// up as suggestions.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    tags: BTreeSet<String>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the tags of every picture. Never removes anything.
    pub fn rebuild_from(&mut self, catalogue: &[Picture]) {
        for picture in catalogue {
            for tag in &picture.tags {
                if !self.tags.contains(tag) {
                    self.tags.insert(tag.clone());
                }
            }
        }
        tracing::debug!(known = self.tags.len(), "tag index rebuilt");
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Sorted list for autocompletion.
    pub fn to_vec(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }

    /// Known tags containing `input`, ignoring case. Empty input yields all.
    pub fn suggestions(&self, input: &str) -> Vec<String> {
        matching_tags(&self.tags, input)
    }
}

/// Tags from `known` containing `input`, ignoring case, in their original order.
pub fn matching_tags<'a, I>(known: I, input: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let lower = input.trim().to_lowercase();
    known
        .into_iter()
        .filter(|t| lower.is_empty() || t.to_lowercase().contains(&lower))
        .cloned()
        .collect()
}
