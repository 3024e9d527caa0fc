use serde::{Deserialize, Serialize};

/// One canonical question/answer pair. Immutable once stored; the index
/// deduplicates on exact `(question, answer)` text, and near-duplicate
/// phrasings are deliberately kept to enrich retrieval recall.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

const QUESTION_MARKERS: [&str; 3] = ["Q:", "q:", "س:"];
const ANSWER_MARKERS: [&str; 3] = ["A:", "a:", "ج:"];

/// Parse a `---`-delimited QA record stream.
///
/// Within a record the first line is the question and the second the
/// answer, each after stripping its leading marker. Records that fail to
/// yield both sides are silently dropped.
pub fn parse_qa_records(content: &str) -> Vec<QaRecord> {
    let mut records = Vec::new();

    for entry in content.split("---") {
        let mut lines = entry.lines().map(str::trim).filter(|l| !l.is_empty());

        let question = lines.next().map(|l| strip_marker(l, &QUESTION_MARKERS));
        let answer = lines.next().map(|l| strip_marker(l, &ANSWER_MARKERS));

        if let (Some(question), Some(answer)) = (question, answer) {
            if !question.is_empty() && !answer.is_empty() {
                records.push(QaRecord { question, answer });
            }
        }
    }

    records
}

/// Render records back into the `---`-delimited stream consumed by the
/// index builder.
pub fn format_qa_records(records: &[QaRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!("Q: {}\nA: {}\n---\n", record.question, record.answer));
    }
    out
}

fn strip_marker(line: &str, markers: &[&str]) -> String {
    let trimmed = line.trim();
    for marker in markers {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}
