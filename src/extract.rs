//! Answer extraction from raw generations.
//!
//! Generation backends return the prompt followed by the continuation. The
//! answer is the first line of the continuation, trimmed.

/// Strip the echoed prompt from `generated` and return the first line
///
/// Only the first occurrence of `prompt` is removed. An empty answer is
/// returned as-is.
#[must_use]
pub fn extract_answer(generated: &str, prompt: &str) -> String {
    let continuation = if prompt.is_empty() {
        generated.to_string()
    } else {
        generated.replacen(prompt, "", 1)
    };
    first_line(&continuation).to_string()
}

/// Drop the first `prompt_len` tokens of `output`, decode the rest and
/// return its first line
///
/// Preferred over [`extract_answer`] when the backend reports token-level
/// output, since decoding may not reproduce the prompt text byte for byte.
pub fn extract_answer_from_tokens<T, F>(prompt_len: usize, output: &[T], decode: F) -> String
where
    F: FnOnce(&[T]) -> String,
{
    let continuation = output.get(prompt_len..).unwrap_or_default();
    first_line(&decode(continuation)).to_string()
}

/// First `\n`-separated segment of `text`, trimmed
#[must_use]
pub fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_strips_prompt_and_keeps_first_line() {
        let prompt = "Instruction: Translate.\nGerman: Hallo\nEnglish:";
        let generated = format!("{prompt}Bonjour\nextra");
        assert_eq!(extract_answer(&generated, prompt), "Bonjour");
    }

    #[test]
    fn test_extract_trims_whitespace() {
        assert_eq!(extract_answer("P:   Hello world  \nGerman: x", "P:"), "Hello world");
    }

    #[test]
    fn test_extract_empty_continuation() {
        assert_eq!(extract_answer("English:", "English:"), "");
        assert_eq!(extract_answer("English:\nGerman: next", "English:"), "");
    }

    #[test]
    fn test_extract_removes_first_occurrence_only() {
        assert_eq!(extract_answer("ab ab", "ab"), "ab");
    }

    #[test]
    fn test_extract_prompt_not_echoed() {
        assert_eq!(extract_answer("Good day\nmore", "something else"), "Good day");
    }

    #[test]
    fn test_extract_empty_prompt() {
        assert_eq!(extract_answer(" only line ", ""), "only line");
    }

    #[test]
    fn test_extract_from_tokens() {
        let tokens = ["Eng", "lish", ":", " Good", " day", "\n", "Ger"];
        let answer = extract_answer_from_tokens(3, &tokens, |rest| rest.concat());
        assert_eq!(answer, "Good day");
    }

    #[test]
    fn test_extract_from_tokens_prompt_longer_than_output() {
        let tokens = [1u32, 2];
        let answer = extract_answer_from_tokens(5, &tokens, |rest| format!("{}", rest.len()));
        assert_eq!(answer, "0");
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("\n\nx"), "");
        assert_eq!(first_line("  a b \r\nc"), "a b");
    }
}
