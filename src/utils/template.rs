//! String template rendering utilities.
//!
//! Placeholders use `{{name}}` with no inner whitespace, so GitHub Actions
//! expressions such as `${{ github.ref }}` pass through untouched.

use regex::Regex;
use std::sync::OnceLock;

pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

/// Placeholder names still present in a rendered string.
pub fn unresolved(rendered: &str) -> Vec<String> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let pattern = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{([a-z_]+)\}\}").expect("placeholder pattern is valid")
    });

    pattern
        .captures_iter(rendered)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_all_occurrences() {
        let out = render("{{name}} and {{name}}", &[("name", "x")]);
        assert_eq!(out, "x and x");
    }

    #[test]
    fn render_leaves_actions_expressions_alone() {
        let out = render(
            "tags: {{image}}:${{ steps.version.outputs.tag }}",
            &[("image", "sampler")],
        );
        assert_eq!(out, "tags: sampler:${{ steps.version.outputs.tag }}");
        assert!(unresolved(&out).is_empty());
    }

    #[test]
    fn unresolved_reports_missing_placeholders() {
        let out = render("{{a}} {{b}}", &[("a", "1")]);
        assert_eq!(unresolved(&out), vec!["b".to_string()]);
    }
}
