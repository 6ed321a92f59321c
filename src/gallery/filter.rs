use std::collections::BTreeSet;

use super::model::Picture;

/// The tags the user currently filters by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    tags: BTreeSet<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the tag was already active.
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        self.tags.insert(tag.to_string())
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    pub fn clear(&mut self) {
        self.tags.clear();
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

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.tags.iter()
    }

    /// True if the picture carries every active tag.
    pub fn matches(&self, picture: &Picture) -> bool {
        self.tags.iter().all(|tag| picture.has_tag(tag))
    }
}

/// Pictures carrying all tags of `filter`, in catalogue order.
pub fn recompute<'a>(catalogue: &'a [Picture], filter: &FilterSet) -> Vec<&'a Picture> {
    catalogue.iter().filter(|p| filter.matches(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(id: usize, name: &str, tags: &[&str]) -> Picture {
        Picture {
            id,
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            file: format!("{}.png", name.to_lowercase()),
        }
    }

    fn names(view: &[&Picture]) -> Vec<String> {
        view.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let catalogue = vec![picture(0, "A", &["x"]), picture(1, "B", &[])];
        let view = recompute(&catalogue, &FilterSet::new());
        assert_eq!(view.len(), 2);
        assert_eq!(view[0], &catalogue[0]);
        assert_eq!(view[1], &catalogue[1]);
    }

    #[test]
    fn test_all_filter_tags_required() {
        let catalogue = vec![picture(0, "A", &["x", "y"])];
        let mut filter = FilterSet::new();

        filter.add("x");
        assert_eq!(names(&recompute(&catalogue, &filter)), vec!["A"]);

        filter.add("z");
        assert!(recompute(&catalogue, &filter).is_empty());

        filter.remove("z");
        assert_eq!(names(&recompute(&catalogue, &filter)), vec!["A"]);
    }

    #[test]
    fn test_order_preserved() {
        let catalogue = vec![
            picture(0, "A", &["sea"]),
            picture(1, "B", &["sky"]),
            picture(2, "C", &["sea", "sky"]),
            picture(3, "D", &["sea"]),
        ];
        let mut filter = FilterSet::new();
        filter.add("sea");
        assert_eq!(names(&recompute(&catalogue, &filter)), vec!["A", "C", "D"]);
    }

    #[test]
    fn test_duplicate_picture_tags_do_not_count_twice() {
        let catalogue = vec![picture(0, "A", &["x", "x"])];
        let mut filter = FilterSet::new();
        filter.add("x");
        filter.add("y");
        assert!(recompute(&catalogue, &filter).is_empty());
    }

    #[test]
    fn test_blank_tag_is_ignored() {
        let mut filter = FilterSet::new();
        assert!(!filter.add("   "));
        assert!(filter.add(" sea "));
        assert!(filter.contains("sea"));
        assert!(!filter.add("sea"));
    }
}
