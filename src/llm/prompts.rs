//! Prompt builders for the generative-model calls.

/// Summarize web snippets into an answer, admitting when the retrieved
/// material does not actually cover the question.
pub fn snippet_summary_prompt(question: &str, snippets: &str) -> String {
    format!(
        "You are a helpful assistant. Summarize the following information to \
         answer the question below. If the information is not sufficient to \
         answer it, state that clearly instead of guessing.\n\n\
         Question: {question}\n\n\
         Retrieved information:\n{snippets}\n\n\
         Summarized answer:"
    )
}

/// Last-resort open completion: polite, no fabrication, plain uncertainty.
pub fn general_fallback_prompt(question: &str) -> String {
    format!(
        "You are a helpful assistant. Answer the question politely and \
         clearly. If it asks for specific facts you do not know and could \
         not find in any source, say plainly that you do not know. Do not \
         make up answers.\n\n\
         User question: {question}\n\n\
         Answer:"
    )
}

/// Offline QA-pair generation over one corpus chunk. The output format is
/// the same `---`-delimited record stream the index builder consumes.
pub fn qa_generation_prompt(text_chunk: &str) -> String {
    format!(
        "You generate question/answer pairs from source text. Extract 2 to 5 \
         specific, concise questions with their answers from the text below. \
         Each answer must come directly from the text. Use exactly this \
         format, one pair per block:\n\
         Q: [question]\n\
         A: [answer]\n\
         ---\n\n\
         Text:\n{text_chunk}\n\n\
         Questions and answers:"
    )
}
