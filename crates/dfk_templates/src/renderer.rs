//! Placeholder substitution for Dockerfile template bodies.

use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder tokens understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Placeholder {
    LanguageVersion,
    ExtraPackages,
    EnvVars,
}

impl Placeholder {
    pub const ALL: [Placeholder; 3] = [
        Placeholder::LanguageVersion,
        Placeholder::ExtraPackages,
        Placeholder::EnvVars,
    ];

    /// Name as it appears between braces.
    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::LanguageVersion => "LANGUAGE_VERSION",
            Placeholder::ExtraPackages => "EXTRA_PACKAGES",
            Placeholder::EnvVars => "ENV_VARS",
        }
    }

    /// Full token, e.g. `{LANGUAGE_VERSION}`.
    pub fn token(&self) -> String {
        format!("{{{}}}", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Renders template bodies by replacing `{UPPER_SNAKE}` tokens.
pub struct TemplateRenderer {
    placeholder_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            // Match {PLACEHOLDER_NAME}; a leading `$` marks a shell variable
            placeholder_pattern: Regex::new(r"\$?\{([A-Z][A-Z0-9_]*)\}")
                .expect("placeholder pattern is a valid regex"),
        }
    }

    /// Distinct placeholder names found in `content`, in order of first appearance.
    pub fn placeholder_names(&self, content: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in self.placeholder_pattern.captures_iter(content) {
            if caps[0].starts_with('$') {
                continue;
            }
            let name = &caps[1];
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Tokens in `content` that are not known [`Placeholder`]s, formatted with braces.
    pub fn unknown_placeholders(&self, content: &str) -> Vec<String> {
        self.placeholder_names(content)
            .into_iter()
            .filter(|name| Placeholder::from_name(name).is_none())
            .map(|name| format!("{{{}}}", name))
            .collect()
    }

    /// Known placeholders written in shell form (`${LANGUAGE_VERSION}`).
    ///
    /// These are never substituted, so a body containing one cannot render.
    pub fn shell_form_placeholders(&self, content: &str) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        for caps in self.placeholder_pattern.captures_iter(content) {
            if caps[0].starts_with('$')
                && Placeholder::from_name(&caps[1]).is_some()
                && !tokens.iter().any(|t| t == &caps[0])
            {
                tokens.push(caps[0].to_string());
            }
        }
        tokens
    }

    /// Whether `content` contains the given placeholder at least once.
    pub fn contains(&self, content: &str, placeholder: Placeholder) -> bool {
        self.placeholder_names(content)
            .iter()
            .any(|name| name == placeholder.name())
    }

    /// Substitute known placeholders in a single pass.
    ///
    /// Tokens without a value are left untouched, and substituted values are
    /// never re-scanned.
    pub fn render_content(&self, content: &str, values: &HashMap<Placeholder, String>) -> String {
        self.placeholder_pattern
            .replace_all(content, |caps: &regex::Captures| {
                if caps[0].starts_with('$') {
                    return caps[0].to_string();
                }
                Placeholder::from_name(&caps[1])
                    .and_then(|p| values.get(&p))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .to_string()
    }
}
