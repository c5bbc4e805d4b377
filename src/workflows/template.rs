//! `{placeholder}` substitution for task prompts
//!
//! Only braces that wrap an identifier (`[A-Za-z_][A-Za-z0-9_]*`) are
//! placeholders. Anything else, such as a JSON example in a prompt, is left
//! untouched.

use crate::types::{AppError, Result};
use crate::workflows::WorkflowInputs;

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Byte spans `(start, end)` of every placeholder, braces included
fn spans(template: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = template[pos..].find('{') {
        let start = pos + offset;
        let Some(close) = template[start + 1..].find('}') else {
            break;
        };
        let end = start + 1 + close + 1;

        if is_identifier(&template[start + 1..end - 1]) {
            spans.push((start, end));
            pos = end;
        } else {
            pos = start + 1;
        }
    }

    spans
}

/// Placeholder names in order of appearance, without duplicates
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for (start, end) in spans(template) {
        let name = &template[start + 1..end - 1];
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Substitute every placeholder with its input value
///
/// # Errors
///
/// Returns [`AppError::Workflow`] naming every placeholder without an input.
pub fn render(template: &str, inputs: &WorkflowInputs) -> Result<String> {
    let missing: Vec<&str> = placeholders(template)
        .into_iter()
        .filter(|name| inputs.get(name).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Workflow(format!(
            "Missing template input(s): {}",
            missing.join(", ")
        )));
    }

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for (start, end) in spans(template) {
        rendered.push_str(&template[last..start]);
        rendered.push_str(inputs.get(&template[start + 1..end - 1]).unwrap_or_default());
        last = end;
    }
    rendered.push_str(&template[last..]);

    Ok(rendered)
}
