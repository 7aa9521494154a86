use crate::llm::prompts::{NOT_FOUND_IN_PDF, SECTION_NOT_FOUND};

/// Combines the per-chunk answers of one question into a single answer
#[derive(Debug, Clone)]
pub struct AnswerMerger {
    not_found: String,
}

impl Default for AnswerMerger {
    fn default() -> Self {
        Self::new(SECTION_NOT_FOUND)
    }
}

impl AnswerMerger {
    /// `not_found` is the reply that marks a chunk as not containing the answer
    pub fn new(not_found: impl Into<String>) -> Self {
        Self {
            not_found: not_found.into(),
        }
    }

    /// Answers that carry content, trimmed, in their original order
    pub fn relevant<'a>(&self, answers: &'a [String]) -> Vec<&'a str> {
        answers
            .iter()
            .map(|answer| answer.trim())
            .filter(|answer| !answer.is_empty() && !self.is_not_found(answer))
            .collect()
    }

    /// Merge answers, index-aligned with the chunks they came from
    ///
    /// A single answer is passed through untouched. Otherwise the relevant
    /// answers are joined with a blank line; when none is left the result is
    /// [`NOT_FOUND_IN_PDF`].
    pub fn merge(&self, answers: &[String]) -> String {
        if let [only] = answers {
            return only.clone();
        }

        let relevant = self.relevant(answers);
        if relevant.is_empty() {
            NOT_FOUND_IN_PDF.to_string()
        } else {
            relevant.join("\n\n")
        }
    }

    /// The configured sentinel, or the whole-document reply the shared
    /// instructions ask for
    fn is_not_found(&self, answer: &str) -> bool {
        let answer = answer.trim_end_matches('.').trim();
        answer.eq_ignore_ascii_case(&self.not_found)
            || answer.eq_ignore_ascii_case(NOT_FOUND_IN_PDF.trim_end_matches('.'))
    }
}
