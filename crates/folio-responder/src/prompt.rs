use serde::Serialize;

/// Shown to the model in place of excerpts when retrieval found nothing.
pub const NO_GROUNDING: &str = "(no relevant résumé excerpts were found)";

/// The three parts the language model sees. Providers may render them as
/// separate chat messages or flatten them with [`PromptSpec::render`], but
/// the parts always stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptSpec {
    pub system: String,
    pub question: String,
    pub grounding: String,
}

impl PromptSpec {
    pub fn has_grounding(&self) -> bool {
        !self.grounding.trim().is_empty()
    }

    /// User turn: the question followed by the labelled excerpts.
    pub fn user_message(&self) -> String {
        let excerpts = if self.has_grounding() { self.grounding.as_str() } else { NO_GROUNDING };
        format!("User Question: {}\n\nRelevant résumé excerpt(s):\n{}", self.question, excerpts)
    }

    /// Single-string form for backends without chat roles.
    pub fn render(&self) -> String {
        format!("Instructions:\n{}\n\n{}", self.system, self.user_message())
    }
}

pub fn system_instruction(subject: &str) -> String {
    format!(
        "You are an assistant that answers questions about {subject}'s professional background using only {subject}'s résumé.\n\
         Guidelines:\n\
         - Only use information found in the provided résumé excerpts.\n\
         - If the excerpts are missing, incomplete or ambiguous for the question, say that you do not have enough information to answer. Never guess or invent details.\n\
         - If the question is unrelated to {subject}'s résumé (general knowledge, other people, opinions), politely say you can only answer questions about {subject}'s résumé.\n\
         - When asked about publications or research, list every publication given in the excerpts with its full title and link. If none are given, say that the résumé mentions no publications.\n\
         Keep answers factual and concise."
    )
}

pub fn build_prompt(query: &str, grounding: &str, subject: &str) -> PromptSpec {
    PromptSpec {
        system: system_instruction(subject),
        question: query.trim().to_string(),
        grounding: grounding.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_stay_separate_and_labelled() {
        let prompt = build_prompt("  What are the skills? ", "Skills: Python, SQL", "Ada");
        assert_eq!(prompt.question, "What are the skills?");
        assert!(prompt.system.contains("Ada's résumé"));
        assert!(!prompt.system.contains("Python"));
        let user = prompt.user_message();
        assert!(user.starts_with("User Question: What are the skills?"));
        assert!(user.ends_with("Relevant résumé excerpt(s):\nSkills: Python, SQL"));
    }

    #[test]
    fn empty_grounding_is_announced() {
        let prompt = build_prompt("Hobbies?", "  ", "Ada");
        assert!(!prompt.has_grounding());
        assert!(prompt.user_message().contains(NO_GROUNDING));
        assert!(prompt.render().starts_with("Instructions:\n"));
    }
}
