//! Parsing of model output between pipeline stages
//!
//! Models are asked for a JSON array of strings, but answers drift: fenced
//! code blocks, Python-style single-quoted lists, or plain prose. Nothing
//! here evaluates text; list literals are read by a small scanner and
//! everything else falls back to the documented single-element rule.

use crate::types::TaskOutput;
use tracing::warn;

/// Remove one surrounding markdown code fence (```` ```lang ... ``` ````)
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // The info string (e.g. `json`) runs to the end of the first line
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// Strict JSON array of strings, after removing a code fence
pub fn parse_json_list(text: &str) -> Option<Vec<String>> {
    serde_json::from_str::<Vec<String>>(strip_code_fence(text)).ok()
}

/// Read a list of string literals: JSON first, then Python-style literals
///
/// Returns `None` for anything that is not exactly one list made only of
/// string literals.
pub fn parse_string_list(text: &str) -> Option<Vec<String>> {
    let body = strip_code_fence(text);
    serde_json::from_str::<Vec<String>>(body)
        .ok()
        .or_else(|| LiteralScanner::new(body).list())
}

/// Questions from the prep stage output
///
/// A native list is used as-is. Text is parsed as a list literal; if that
/// fails the whole raw text becomes the single question. Blank entries are
/// dropped and blank text yields no questions.
pub fn parse_questions(output: &TaskOutput) -> Vec<String> {
    let items = match output {
        TaskOutput::List(items) => items.clone(),
        TaskOutput::Text(raw) => {
            if raw.trim().is_empty() {
                return Vec::new();
            }
            match parse_string_list(raw) {
                Some(items) => items,
                None => {
                    warn!(
                        chars = raw.len(),
                        "Could not parse questions as a list; using the raw output as one question"
                    );
                    vec![raw.clone()]
                }
            }
        }
    };

    items
        .into_iter()
        .filter(|item| !item.trim().is_empty())
        .collect()
}

/// The block handed to the summary stage
pub fn format_analyses(analyses: &[String]) -> String {
    analyses
        .iter()
        .enumerate()
        .map(|(i, analysis)| format!("Analysis {}:\n{}", i + 1, analysis))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Scanner for `['a', "b" 'c', ]`-style list literals
struct LiteralScanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> LiteralScanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
    }

    fn list(mut self) -> Option<Vec<String>> {
        self.skip_whitespace();
        if self.chars.next()? != '[' {
            return None;
        }

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek()? {
                ']' => {
                    self.chars.next();
                    break;
                }
                '\'' | '"' => items.push(self.concatenated_string()?),
                _ => return None,
            }

            self.skip_whitespace();
            match self.chars.next()? {
                ',' => continue,
                ']' => break,
                _ => return None,
            }
        }

        self.skip_whitespace();
        match self.chars.next() {
            None => Some(items),
            Some(_) => None,
        }
    }

    /// One or more adjacent literals, joined
    fn concatenated_string(&mut self) -> Option<String> {
        let mut value = self.string_literal()?;
        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                Some('\'') | Some('"') => value.push_str(&self.string_literal()?),
                _ => return Some(value),
            }
        }
    }

    fn string_literal(&mut self) -> Option<String> {
        let quote = self.chars.next()?;
        let mut value = String::new();

        loop {
            match self.chars.next()? {
                c if c == quote => return Some(value),
                '\n' => return None,
                '\\' => self.escape(&mut value)?,
                c => value.push(c),
            }
        }
    }

    fn escape(&mut self, value: &mut String) -> Option<()> {
        match self.chars.next()? {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'a' => value.push('\x07'),
            'b' => value.push('\x08'),
            'f' => value.push('\x0c'),
            'v' => value.push('\x0b'),
            '\\' => value.push('\\'),
            '\'' => value.push('\''),
            '"' => value.push('"'),
            '\n' => {}
            first @ '0'..='7' => value.push(self.octal_char(first)?),
            'x' => value.push(self.hex_char(2)?),
            'u' => value.push(self.hex_char(4)?),
            'U' => value.push(self.hex_char(8)?),
            // Named escapes need the Unicode name table; leave them to the fallback
            'N' => return None,
            other => {
                // Unknown escapes keep their backslash
                value.push('\\');
                value.push(other);
            }
        }
        Some(())
    }

    /// Up to three octal digits, the first already consumed
    fn octal_char(&mut self, first: char) -> Option<char> {
        let mut code = first.to_digit(8)?;
        for _ in 0..2 {
            match self.chars.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    code = code * 8 + digit;
                    self.chars.next();
                }
                None => break,
            }
        }
        char::from_u32(code)
    }

    fn hex_char(&mut self, digits: usize) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            code = code * 16 + self.chars.next()?.to_digit(16)?;
        }
        char::from_u32(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("[\"a\"]", "[\"a\"]")]
    #[case("```json\n[\"a\"]\n```", "[\"a\"]")]
    #[case("```\n['a']\n```", "['a']")]
    #[case("  ```python\n['a', 'b']```  ", "['a', 'b']")]
    #[case("```[1]```", "[1]")]
    #[case("```json\n[\"a\"]", "```json\n[\"a\"]")]
    fn test_strip_code_fence(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_code_fence(input), expected);
    }

    #[rstest]
    #[case(r#"["Q1", "Q2"]"#, Some(vec!["Q1", "Q2"]))]
    #[case(r#"["Say \"hi\"", "tab\there"]"#, Some(vec!["Say \"hi\"", "tab\there"]))]
    #[case("['Q1', 'Q2']", Some(vec!["Q1", "Q2"]))]
    #[case("['Q1', \"Q2\",]", Some(vec!["Q1", "Q2"]))]
    #[case("[\n  'What is the mean age?',\n  'How many rows?'\n]", Some(vec!["What is the mean age?", "How many rows?"]))]
    #[case(r#"['What\'s the median?', 'a\\b']"#, Some(vec!["What's the median?", "a\\b"]))]
    #[case("['Part one, ' 'part two']", Some(vec!["Part one, part two"]))]
    #[case(r"['caf\xe9', 'été', '\d+']", Some(vec!["café", "été", "\\d+"]))]
    #[case(r"['x\012y', 'nul\0', '\101\1018']", Some(vec!["x\ny", "nul\0", "AA8"]))]
    #[case(r"['\U0001F600', '\U000000e9t\u00e9']", Some(vec!["\u{1F600}", "été"]))]
    #[case(r"['a\bb', '\a\f\v']", Some(vec!["a\x08b", "\x07\x0c\x0b"]))]
    #[case(r"['\N{DEGREE SIGN}']", None)]
    #[case(r"['\U0011FFFF']", None)]
    #[case("[]", Some(vec![]))]
    #[case("[ ]", Some(vec![]))]
    #[case("['Q1', 2]", None)]
    #[case("['Q1'] and more", None)]
    #[case("['unterminated]", None)]
    #[case("['line\nbreak']", None)]
    #[case("['a' 'b' , , 'c']", None)]
    #[case("('a', 'b')", None)]
    #[case("1. Q1\n2. Q2", None)]
    #[case("", None)]
    fn test_parse_string_list(#[case] input: &str, #[case] expected: Option<Vec<&str>>) {
        assert_eq!(
            parse_string_list(input),
            expected.map(|items| strings(&items))
        );
    }

    #[test]
    fn test_parse_json_list_is_strict() {
        assert_eq!(
            parse_json_list("```json\n[\"Q1\"]\n```"),
            Some(strings(&["Q1"]))
        );
        assert_eq!(parse_json_list("['Q1']"), None);
        assert_eq!(parse_json_list("[\"Q1\", 2]"), None);
    }

    #[test]
    fn test_native_list_is_used_as_is() {
        let output = TaskOutput::List(strings(&["Q1", "  ", "Q2 "]));
        assert_eq!(parse_questions(&output), strings(&["Q1", "Q2 "]));
    }

    #[test]
    fn test_list_literal_text() {
        let output = TaskOutput::Text("['Q1', 'Q2', 'Q3']".to_string());
        assert_eq!(parse_questions(&output), strings(&["Q1", "Q2", "Q3"]));
    }

    #[test]
    fn test_unparsable_text_becomes_single_question() {
        let raw = "What is the distribution of prices?\n";
        let output = TaskOutput::Text(raw.to_string());
        assert_eq!(parse_questions(&output), vec![raw.to_string()]);
    }

    #[rstest]
    #[case(TaskOutput::Text(String::new()))]
    #[case(TaskOutput::Text("  \n ".to_string()))]
    #[case(TaskOutput::Text("[]".to_string()))]
    #[case(TaskOutput::Text("['', '  ']".to_string()))]
    #[case(TaskOutput::List(vec![]))]
    fn test_no_questions(#[case] output: TaskOutput) {
        assert!(parse_questions(&output).is_empty());
    }

    #[test]
    fn test_format_analyses() {
        let block = format_analyses(&strings(&["first", "second"]));
        assert_eq!(block, "Analysis 1:\nfirst\n\nAnalysis 2:\nsecond");
        assert_eq!(format_analyses(&[]), "");
    }
}
