/// Reply the model is asked to give when a section lacks the answer
pub const SECTION_NOT_FOUND: &str = "NOT_FOUND_IN_SECTION";

/// Reply used when no part of the document answers the question
pub const NOT_FOUND_IN_PDF: &str = "I could not find that in the PDF.";

/// Instructions shared by every question prompt
const ANSWER_INSTRUCTIONS: &str = "You are a careful assistant. Use ONLY the provided PDF context to answer. \
If the answer is not present, explicitly say: 'I could not find that in the PDF.'";

/// Build the prompt for one chunk of the document
///
/// `partial` marks the chunk as one of several; the model is then told to
/// answer from this section alone and to reply with [`SECTION_NOT_FOUND`]
/// when the section does not contain the answer.
pub fn build_prompt(context: &str, question: &str, partial: bool) -> String {
    let mut prompt = String::from(ANSWER_INSTRUCTIONS);
    prompt.push_str("\n\n");

    if partial {
        prompt.push_str(&format!(
            "This context is only one section of a longer document that was split into several parts. \
Answer only from this section. If this section does not contain the answer, \
reply with exactly {} instead of the sentence above.\n\n",
            SECTION_NOT_FOUND
        ));
    }

    prompt.push_str(&format!(
        "PDF CONTEXT:\n{}\n\nQUESTION: {}\nANSWER:",
        context, question
    ));
    prompt
}

/// Build the prompt that asks the model to merge partial answers
pub fn synthesis_prompt(question: &str, partials: &[&str]) -> String {
    let mut prompt = String::from(
        "You are given multiple partial answers extracted from different PDF chunks. \
Merge them into one concise final answer. If conflicting, prefer overlap across chunks.\n\n",
    );
    prompt.push_str(&format!("QUESTION: {}\n\n", question));

    let parts = partials
        .iter()
        .enumerate()
        .map(|(i, answer)| format!("Partial answer {}:\n{}", i + 1, answer))
        .collect::<Vec<_>>()
        .join("\n\n");
    prompt.push_str(&parts);
    prompt.push_str("\n\nFINAL ANSWER:");
    prompt
}
