//! Keyword-triggered side data.
//!
//! A plain substring rule table: if the lowercased query contains any
//! trigger keyword, every publication record is appended to the grounding.
//! False positives ("newspaper" contains "paper") are accepted; the listing
//! is supplementary to the retrieved excerpts.

use folio_core::types::Publication;

pub const PUBLICATIONS_HEADING: &str = "Publications:";

#[derive(Debug, Clone, Default)]
pub struct SideData {
    publications: Vec<Publication>,
    triggers: Vec<String>,
}

impl SideData {
    pub fn new<S: AsRef<str>>(publications: Vec<Publication>, triggers: &[S]) -> Self {
        let triggers = triggers
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { publications, triggers }
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn is_triggered(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.triggers.iter().any(|t| query.contains(t.as_str()))
    }

    fn listing(&self) -> String {
        self.publications
            .iter()
            .map(|p| format!("- {} ({})", p.title, p.link))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Append the publications section when `query` hits a trigger keyword.
/// Without a trigger, or with no records, `grounding` is returned unchanged.
pub fn augment_with_side_data(query: &str, grounding: &str, side_data: &SideData) -> String {
    if side_data.publications.is_empty() || !side_data.is_triggered(query) {
        return grounding.to_string();
    }
    let section = format!("{PUBLICATIONS_HEADING}\n{}", side_data.listing());
    if grounding.trim().is_empty() {
        section
    } else {
        format!("{}\n\n{section}", grounding.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side_data() -> SideData {
        SideData::new(
            vec![
                Publication { title: "Paper A".into(), link: "http://x".into() },
                Publication { title: "Budget App".into(), link: "https://apps.example/budget".into() },
            ],
            &["publications", "DOI", "research"],
        )
    }

    #[test]
    fn trigger_appends_one_line_per_record() {
        let out = augment_with_side_data("Any publications?", "Skills: Rust", &side_data());
        assert!(out.starts_with("Skills: Rust\n\nPublications:\n"));
        assert!(out.lines().any(|l| l == "- Paper A (http://x)"));
        assert!(out.lines().any(|l| l == "- Budget App (https://apps.example/budget)"));
    }

    #[test]
    fn triggers_are_case_insensitive() {
        assert!(side_data().is_triggered("What is the doi of that?"));
        assert!(side_data().is_triggered("RESEARCH interests"));
    }

    #[test]
    fn no_trigger_leaves_grounding_unchanged() {
        let grounding = "Experience: 2 years at Acme Corp\n\n";
        assert_eq!(augment_with_side_data("Where did you work?", grounding, &side_data()), grounding);
    }

    #[test]
    fn empty_grounding_gets_only_the_listing() {
        let out = augment_with_side_data("research?", "", &side_data());
        assert_eq!(out.lines().next(), Some(PUBLICATIONS_HEADING));
    }

    #[test]
    fn no_records_means_no_section() {
        let empty = SideData::new(Vec::new(), &["publications"]);
        assert_eq!(augment_with_side_data("publications", "g", &empty), "g");
    }
}
