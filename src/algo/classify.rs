use std::path::PathBuf;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{InstacheckError, Result};

/// Embedded default rules — compiled from `rules/default.json`.
/// Users override by placing a file at `$XDG_DATA_HOME/instacheck/rules.json`
/// or `$INSTACHECK_RULES` env var, or passing `--rules <path>`.
const EMBEDDED_DEFAULT: &str = include_str!("../../rules/default.json");

/// Which relationship set a payload feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Followers,
    Following,
    /// Matched on purpose and dropped (e.g. followed hashtags).
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: SourceKind,
    /// Case-insensitive regex tested against the file name.
    pub pattern: String,
}

/// An ordered, first-match-wins list of classification rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub name: String,
    pub version: String,
    pub rules: Vec<Rule>,
}

/// A compiled [`RuleSet`].
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(SourceKind, Regex)>,
}

impl Classifier {
    pub fn new(set: &RuleSet) -> Result<Self> {
        let rules = set
            .rules
            .iter()
            .map(|rule| {
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map(|re| (rule.kind, re))
                    .map_err(|e| {
                        InstacheckError::InvalidRules(format!("pattern '{}': {e}", rule.pattern))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Classify a logical path by its file name (last `/` or `\` segment).
    /// Directory names never classify: an export keeps `following.json`
    /// inside `followers_and_following/`. Rules are tried in order; when a
    /// name matches several, the earliest rule wins.
    pub fn classify(&self, path: &str) -> Option<SourceKind> {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(file_name))
            .map(|(kind, _)| *kind)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&embedded_default()).expect("embedded default rules are invalid")
    }
}

/// Load the default rules using this resolution order:
///
/// 1. `$INSTACHECK_RULES` env var (path to JSON file)
/// 2. `$XDG_DATA_HOME/instacheck/rules.json` (user override)
/// 3. `~/.local/share/instacheck/rules.json` (fallback XDG path)
/// 4. Embedded compile-time default from `rules/default.json`
///
/// Any resolution step that fails silently falls through to the next.
pub fn default_rules() -> RuleSet {
    // 1. Env var override
    if let Ok(path) = std::env::var("INSTACHECK_RULES") {
        if let Ok(set) = load_rules(&path) {
            return set;
        }
        log::warn!("Ignoring unusable rules file from INSTACHECK_RULES: {path}");
    }

    // 2. XDG_DATA_HOME
    if let Some(path) = xdg_rules_path() {
        if path.exists() {
            if let Ok(set) = load_rules(&path.to_string_lossy()) {
                return set;
            }
            log::warn!("Ignoring unusable rules file {}", path.display());
        }
    }

    // 3. Embedded fallback
    embedded_default()
}

/// Parse a rule set from a JSON string. Patterns are validated eagerly.
pub fn parse_rules(json: &str) -> Result<RuleSet> {
    let set: RuleSet = serde_json::from_str(json)
        .map_err(|e| InstacheckError::InvalidRules(format!("failed to parse rules: {e}")))?;
    Classifier::new(&set)?;
    Ok(set)
}

/// Load a rule set from a file path.
pub fn load_rules(path: &str) -> Result<RuleSet> {
    let json = std::fs::read_to_string(path).map_err(|source| InstacheckError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_rules(&json)
}

/// Return the embedded default rules as a JSON string.
pub fn embedded_default_json() -> &'static str {
    EMBEDDED_DEFAULT
}

fn embedded_default() -> RuleSet {
    serde_json::from_str(EMBEDDED_DEFAULT).expect("embedded default rules are invalid JSON")
}

fn xdg_rules_path() -> Option<PathBuf> {
    let data_home = std::env::var("XDG_DATA_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".local/share"))
        })?;
    Some(data_home.join("instacheck/rules.json"))
}
