//! Line-oriented rule parser.
//!
//! Grammar, one or more repetitions of:
//!
//! ```text
//! RULE "<name>"
//! WHEN <condition...>          (may continue on following lines;
//!                               a blank line ends the block)
//! THEN <action>[; <action>]*   (continues until WITH or the next RULE)
//! [WITH <key>=<value>[, ...]]
//! ```
//!
//! Parsing is two-phase: a line/block scanner isolates the RULE / WHEN
//! / THEN / WITH segments, then a nesting-aware tokenizer splits action
//! argument lists (commas inside quotes or nested parentheses are not
//! split points).

use std::collections::HashMap;

use thiserror::Error;

use super::{Action, Rule, Value};

/// Structural parse failure.
///
/// Raised for malformed rule text; callers must not swallow these,
/// since they indicate corrupted authored rules. Policy questions
/// (prohibited or unexpected action names) are *not* parse errors -
/// see [`validate_rules`](super::validate_rules).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DslError {
    #[error("invalid RULE line: {line}")]
    InvalidRuleLine { line: String },

    #[error("expected WHEN after RULE \"{rule}\"")]
    ExpectedWhen { rule: String },

    #[error("expected THEN in rule \"{rule}\"")]
    ExpectedThen { rule: String },

    #[error("invalid action: {text}")]
    InvalidAction { text: String },

    #[error("argument without '=': {arg}")]
    MissingEquals { arg: String },

    #[error("no valid RULE block found")]
    NoRuleBlock,
}

/// Parse one or more rules from text.
///
/// Empty or whitespace-only input yields an empty list. Non-empty
/// input containing no RULE block is a structural error.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, DslError> {
    let normalized = text.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.split('\n').map(str::trim_end).collect();
    let n = lines.len();

    let any_content = lines.iter().any(|ln| !ln.trim().is_empty());
    let mut saw_rule = false;
    let mut rules = Vec::new();
    let mut i = 0;

    while i < n {
        // Seek the next RULE line.
        while i < n && !lines[i].trim().starts_with("RULE ") {
            i += 1;
        }
        if i >= n {
            break;
        }
        let name = parse_rule_line(lines[i].trim()).ok_or_else(|| DslError::InvalidRuleLine {
            line: lines[i].to_string(),
        })?;
        saw_rule = true;
        i += 1;

        // WHEN block: single line or continuation until THEN; a blank
        // line terminates the block early.
        if i >= n || !lines[i].trim().starts_with("WHEN") {
            return Err(DslError::ExpectedWhen { rule: name });
        }
        let mut cond_parts: Vec<String> = Vec::new();
        while i < n && !lines[i].trim().starts_with("THEN") {
            let trimmed = lines[i].trim();
            let part = trimmed.strip_prefix("WHEN").unwrap_or(trimmed).trim();
            cond_parts.push(part.to_string());
            i += 1;
            if i < n && lines[i].trim().is_empty() {
                i += 1;
                break;
            }
        }
        let condition = cond_parts
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        if i >= n || !lines[i].trim().starts_with("THEN") {
            return Err(DslError::ExpectedThen { rule: name });
        }

        // THEN block: inline actions after the keyword plus
        // continuation lines until WITH or the next RULE.
        let mut then_lines: Vec<&str> = Vec::new();
        let inline = lines[i].trim()["THEN".len()..].trim();
        if !inline.is_empty() {
            then_lines.push(inline);
        }
        i += 1;
        while i < n
            && !lines[i].trim().starts_with("WITH")
            && !lines[i].trim().starts_with("RULE ")
        {
            let trimmed = lines[i].trim();
            if !trimmed.is_empty() {
                then_lines.push(trimmed);
            }
            i += 1;
        }
        let then_text = then_lines.join(" ");
        let actions = then_text
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(parse_action)
            .collect::<Result<Vec<_>, _>>()?;

        let mut metadata = HashMap::new();
        if i < n && lines[i].trim().starts_with("WITH") {
            let meta_text = lines[i].trim().strip_prefix("WITH").unwrap_or("").trim();
            metadata = parse_kv_list(meta_text)?;
            i += 1;
        }

        rules.push(Rule {
            name,
            condition: normalize_condition(&condition),
            actions,
            metadata,
        });
    }

    if !saw_rule && any_content {
        return Err(DslError::NoRuleBlock);
    }
    Ok(rules)
}

/// Extract the quoted name from a trimmed `RULE "<name>"` line.
fn parse_rule_line(line: &str) -> Option<String> {
    let rest = line.strip_prefix("RULE")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let quoted = rest.trim();
    if quoted.len() < 2 || !quoted.starts_with('"') || !quoted.ends_with('"') {
        return None;
    }
    let name = &quoted[1..quoted.len() - 1];
    (!name.is_empty()).then(|| name.to_string())
}

/// Parse a single `NAME(arg, ...)` action.
pub fn parse_action(text: &str) -> Result<Action, DslError> {
    let t = text.trim();
    let invalid = || DslError::InvalidAction {
        text: t.to_string(),
    };

    let name_end = t
        .find(|c: char| !(c.is_ascii_uppercase() || c == '_'))
        .unwrap_or(t.len());
    let name = &t[..name_end];
    let rest = t[name_end..].trim_start();
    if name.is_empty() || !rest.starts_with('(') || !rest.ends_with(')') || rest.len() < 2 {
        return Err(invalid());
    }
    let args_text = rest[1..rest.len() - 1].trim();

    let mut args = HashMap::new();
    let mut posargs = Vec::new();
    if !args_text.is_empty() {
        for part in split_commas(args_text) {
            if part.contains('=') {
                let (key, value) = split_kv(&part)?;
                args.insert(key, Value::parse(&value));
            } else {
                posargs.push(Value::parse(&part));
            }
        }
    }

    Ok(Action {
        name: name.to_string(),
        args,
        posargs,
    })
}

/// Split on top-level commas only.
///
/// Commas inside quoted strings or nested parentheses are preserved.
pub fn split_commas(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut buf = String::new();
    let mut depth: u32 = 0;
    let mut in_str = false;
    let mut quote = '"';

    for ch in s.chars() {
        if in_str {
            buf.push(ch);
            if ch == quote {
                in_str = false;
            }
        } else {
            match ch {
                '"' | '\'' => {
                    in_str = true;
                    quote = ch;
                    buf.push(ch);
                }
                '(' => {
                    depth += 1;
                    buf.push(ch);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    buf.push(ch);
                }
                ',' if depth == 0 => {
                    parts.push(buf.trim().to_string());
                    buf.clear();
                }
                _ => buf.push(ch),
            }
        }
    }
    if !buf.is_empty() {
        parts.push(buf.trim().to_string());
    }
    parts
}

fn split_kv(s: &str) -> Result<(String, String), DslError> {
    let (k, v) = s.split_once('=').ok_or_else(|| DslError::MissingEquals {
        arg: s.to_string(),
    })?;
    Ok((k.trim().to_string(), v.trim().to_string()))
}

fn parse_kv_list(s: &str) -> Result<HashMap<String, Value>, DslError> {
    let mut map = HashMap::new();
    for part in split_commas(s) {
        let (key, value) = split_kv(&part)?;
        map.insert(key, Value::parse(&value));
    }
    Ok(map)
}

/// Collapse whitespace runs to single spaces.
fn normalize_condition(cond: &str) -> String {
    cond.split_whitespace().collect::<Vec<_>>().join(" ")
}
