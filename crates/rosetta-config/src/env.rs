use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Failure while expanding `{{ env.VAR }}` placeholders
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Placeholder names an unset variable and has no default
    #[error("environment variable not found: `{0}`")]
    MissingVariable(String),
    /// Placeholder is not scoped with `env.`
    #[error("only variables scoped with 'env.' are supported: `{0}`")]
    UnsupportedScope(String),
}

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Group 1: dotted key, group 2: optional default("...") value
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` and `{{ env.VAR | default("x") }}` in raw TOML
///
/// Comment lines pass through untouched so commented-out examples never
/// require their variables to be set.
pub fn expand_env(input: &str) -> Result<String, ExpandError> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') || !line.contains("{{") {
            output.push_str(line);
            continue;
        }

        let mut failure = None;
        let expanded = placeholder().replace_all(line, |caps: &Captures<'_>| {
            match resolve(&caps[1], caps.get(2).map(|m| m.as_str())) {
                Ok(value) => value,
                Err(err) => {
                    failure.get_or_insert(err);
                    String::new()
                }
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }
        output.push_str(&expanded);
    }

    Ok(output)
}

fn resolve(key: &str, default: Option<&str>) -> Result<String, ExpandError> {
    let Some(name) = key.strip_prefix("env.").filter(|rest| !rest.is_empty() && !rest.contains('.')) else {
        return Err(ExpandError::UnsupportedScope(key.to_owned()));
    };

    match (std::env::var(name), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(ExpandError::MissingVariable(name.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_without_placeholders() {
        let input = "[providers.kimi]\nvendor = \"kimi\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_set_variable() {
        temp_env::with_var("ROSETTA_FILTER", Some("debug"), || {
            let out = expand_env("filter = \"{{ env.ROSETTA_FILTER }}\"").unwrap();
            assert_eq!(out, "filter = \"debug\"");
        });
    }

    #[test]
    fn default_used_when_unset() {
        temp_env::with_var_unset("ROSETTA_UNSET", || {
            let out = expand_env("filter = \"{{ env.ROSETTA_UNSET | default(\"warn\") }}\"").unwrap();
            assert_eq!(out, "filter = \"warn\"");
        });
    }

    #[test]
    fn missing_variable_is_error() {
        temp_env::with_var_unset("ROSETTA_MISSING", || {
            let err = expand_env("filter = \"{{ env.ROSETTA_MISSING }}\"").unwrap_err();
            assert_eq!(err, ExpandError::MissingVariable("ROSETTA_MISSING".to_owned()));
        });
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("ROSETTA_MISSING", || {
            let input = "# filter = \"{{ env.ROSETTA_MISSING }}\"\nformat = \"json\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn unscoped_key_is_rejected() {
        let err = expand_env("x = \"{{ vault.TOKEN }}\"").unwrap_err();
        assert!(matches!(err, ExpandError::UnsupportedScope(key) if key == "vault.TOKEN"));
    }
}
