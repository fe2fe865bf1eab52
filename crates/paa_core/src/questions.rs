use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LIST_MARKER: Regex = Regex::new(r"^[-*•]?\s*").expect("marker pattern is valid");
}

/// Splits pasted "People Also Ask" text into one question per line.
///
/// Blank lines are dropped and a leading `-`, `*` or `•` list marker is removed.
pub fn parse_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| LIST_MARKER.replace(line, "").into_owned())
        .collect()
}

/// Inverse of [`parse_questions`] for persisting a question list.
pub fn join_questions(questions: &[String]) -> String {
    questions.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions() {
        let text = "\n- What is a root canal?\n\n* How much does it cost?\n• Does it hurt?\nIs it safe?  \n   \n";
        assert_eq!(
            parse_questions(text),
            vec![
                "What is a root canal?",
                "How much does it cost?",
                "Does it hurt?",
                "Is it safe?",
            ]
        );
    }

    #[test]
    fn test_blank_input() {
        assert!(parse_questions("   \n\n").is_empty());
    }

    #[test]
    fn test_only_one_marker_is_stripped() {
        assert_eq!(parse_questions("-- odd"), vec!["- odd"]);
    }
}
