const ISSUE_PROMPT_TEMPLATE: &str = r#"List any known legal or problematic issues involving {name}. Provide each issue with a date and short description. Use JSON format like this:
[
  {"date": "YYYY-MM-DD", "description": "...", "severity": "low|medium|high"},
  ...
]
Respond with the JSON array only. If there are no known issues, respond with []."#;

/// Build the instruction sent to the model for `name`.
pub fn issue_prompt(name: &str) -> String {
    ISSUE_PROMPT_TEMPLATE.replace("{name}", name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_subject_and_shape() {
        let prompt = issue_prompt("  Jane Roe ");
        assert!(prompt.starts_with("List any known legal or problematic issues involving Jane Roe."));
        assert!(prompt.contains(r#""severity": "low|medium|high""#));
        assert!(!prompt.contains("{name}"));
    }
}
