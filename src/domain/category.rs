//! The caller-supplied set of allowed classification labels.

use std::collections::HashMap;
use std::fmt;

use super::error::DomainError;

/// Ordered, non-empty list of category labels for one batch.
///
/// Labels are trimmed and blank entries dropped on construction. Lookups
/// through [`normalize`](Self::normalize) ignore case and return the
/// canonical spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    labels: Vec<String>,
    by_lowercase: HashMap<String, usize>,
}

impl CategorySet {
    /// Build a category set from raw labels.
    ///
    /// When two labels differ only by case, the last one wins as the
    /// canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyCategories`] if no non-blank label remains.
    pub fn try_new<I, S>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();

        if labels.is_empty() {
            return Err(DomainError::EmptyCategories);
        }

        let mut by_lowercase = HashMap::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            by_lowercase.insert(label.to_lowercase(), index);
        }

        Ok(Self {
            labels,
            by_lowercase,
        })
    }

    /// Labels in the order they were supplied.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Canonical label matching `candidate` case-insensitively, if any.
    #[must_use]
    pub fn find(&self, candidate: &str) -> Option<&str> {
        self.by_lowercase
            .get(&candidate.to_lowercase())
            .map(|&index| self.labels[index].as_str())
    }

    /// Rewrite a recognized category to its canonical casing.
    ///
    /// Unrecognized values, including the `UNPARSEABLE` sentinel, are
    /// returned unchanged.
    #[must_use]
    pub fn normalize(&self, candidate: &str) -> String {
        self.find(candidate)
            .map_or_else(|| candidate.to_string(), ToString::to_string)
    }
}

impl fmt::Display for CategorySet {
    /// Renders the labels as a JSON array, the form used inside prompts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.labels).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billing_technical() -> CategorySet {
        CategorySet::try_new(["Billing", "Technical"]).unwrap()
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(
            CategorySet::try_new(Vec::<&str>::new()),
            Err(DomainError::EmptyCategories)
        );
    }

    #[test]
    fn rejects_only_blank_labels() {
        assert_eq!(
            CategorySet::try_new(["  ", ""]),
            Err(DomainError::EmptyCategories)
        );
    }

    #[test]
    fn trims_labels_and_keeps_order() {
        let set = CategorySet::try_new([" Technical ", "Billing", ""]).unwrap();
        assert_eq!(set.labels(), &["Technical".to_string(), "Billing".to_string()]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn normalizes_case_insensitively() {
        let set = billing_technical();
        assert_eq!(set.normalize("billing"), "Billing");
        assert_eq!(set.normalize("TECHNICAL"), "Technical");
    }

    #[test]
    fn leaves_unknown_categories_untouched() {
        let set = billing_technical();
        assert_eq!(set.normalize("Refunds"), "Refunds");
        assert_eq!(set.normalize("UNPARSEABLE"), "UNPARSEABLE");
        assert_eq!(set.normalize(""), "");
    }

    #[test]
    fn last_label_wins_on_case_collision() {
        let set = CategorySet::try_new(["Billing", "BILLING"]).unwrap();
        assert_eq!(set.normalize("billing"), "BILLING");
        assert_eq!(set.find("Billing"), Some("BILLING"));
        assert_eq!(set.labels().len(), 2);
    }

    #[test]
    fn displays_as_json_array() {
        assert_eq!(billing_technical().to_string(), r#"["Billing","Technical"]"#);
    }
}
