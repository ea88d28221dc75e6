//! `{placeholder}` interpolation of crew inputs
//!
//! Agent and task definitions may reference crew inputs as `{name}`, where
//! `name` starts with a letter or underscore and continues with letters,
//! digits, underscores or dashes. Anything else in braces (JSON snippets,
//! `{ }`) is left untouched.

use crate::{Error, Inputs, Result};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("placeholder pattern is valid")
});

/// Replace every `{name}` placeholder with the matching input
///
/// Fails with [`Error::MissingInput`] naming the first placeholder that has
/// no value.
pub fn interpolate(template: &str, inputs: &Inputs) -> Result<String> {
    if let Some(missing) = PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .find(|name| !inputs.contains_key(name))
    {
        return Err(Error::MissingInput(missing));
    }

    Ok(PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            inputs.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> Inputs {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_replaces_placeholders() {
        let result = interpolate(
            "Conduct a thorough research about {topic} in {current_year}",
            &inputs(&[("topic", "AI LLMs"), ("current_year", "2026")]),
        )
        .unwrap();
        assert_eq!(result, "Conduct a thorough research about AI LLMs in 2026");
    }

    #[test]
    fn test_repeated_placeholder() {
        let result = interpolate("{topic} and {topic}", &inputs(&[("topic", "VUG")])).unwrap();
        assert_eq!(result, "VUG and VUG");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "No variables here, not even { spaced } or {1st}";
        assert_eq!(interpolate(text, &Inputs::new()).unwrap(), text);
    }

    #[test]
    fn test_missing_input() {
        let err = interpolate("About {topic}", &Inputs::new()).unwrap_err();
        assert!(matches!(err, Error::MissingInput(ref name) if name == "topic"));
        assert_eq!(
            err.to_string(),
            "Missing input for template variable 'topic'"
        );
    }

    #[test]
    fn test_dashed_names() {
        let result = interpolate("{report-name}.md", &inputs(&[("report-name", "first")])).unwrap();
        assert_eq!(result, "first.md");
    }
}
