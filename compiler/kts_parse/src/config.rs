//! Parser configuration.
//!
//! Defaults suit every realistic input; the environment can override them
//! for debugging:
//!
//! - `KTS_MAX_DEPTH`: recursion depth limit, a positive integer.
//! - `KTS_TRACE_RULES`: `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`.
//!
//! Empty values count as unset.

use kts_ir::TokenList;
use kts_peg::{Cursor, DEFAULT_MAX_DEPTH};

pub const MAX_DEPTH_VAR: &str = "KTS_MAX_DEPTH";
pub const TRACE_RULES_VAR: &str = "KTS_TRACE_RULES";

/// Settings for building a grammar and its cursors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum number of nested recursive rule invocations.
    pub max_depth: usize,
    /// Wrap named rules in tracing decorators.
    pub trace_rules: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            trace_rules: false,
        }
    }
}

/// A malformed configuration value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got `{value}`")]
    InvalidDepth { var: &'static str, value: String },
    #[error("{var} must be a boolean flag (1/0, true/false, yes/no, on/off), got `{value}`")]
    InvalidFlag { var: &'static str, value: String },
}

impl ParseConfig {
    /// Defaults overridden by `KTS_MAX_DEPTH` and `KTS_TRACE_RULES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ParseConfig::default();
        if let Some(value) = non_empty(lookup(MAX_DEPTH_VAR)) {
            config.max_depth = parse_depth(MAX_DEPTH_VAR, &value)?;
        }
        if let Some(value) = non_empty(lookup(TRACE_RULES_VAR)) {
            config.trace_rules = parse_flag(TRACE_RULES_VAR, &value)?;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_trace_rules(mut self, trace_rules: bool) -> Self {
        self.trace_rules = trace_rules;
        self
    }

    /// A cursor at the first of `tokens` with this depth limit.
    pub fn cursor<'a>(&self, tokens: &'a TokenList) -> Cursor<'a, TokenList> {
        Cursor::new(tokens).with_max_depth(self.max_depth)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_depth(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(ConfigError::InvalidDepth {
            var,
            value: value.to_owned(),
        }),
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_owned(),
        }),
    }
}
