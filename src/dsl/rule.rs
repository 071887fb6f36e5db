//! Parsed rule structures.

use std::collections::HashMap;

use super::Value;

/// One action invocation inside a rule's THEN clause.
///
/// The name must eventually pass guardrail validation; the parser
/// itself accepts any `[A-Z_]+` name so that violations can be
/// reported rather than lost.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    /// Keyword arguments, e.g. `qty=10`.
    pub args: HashMap<String, Value>,
    /// Positional arguments in written order.
    pub posargs: Vec<Value>,
}

/// One parsed advisory rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    /// Condition text, whitespace-normalized. Kept as a string; a full
    /// expression AST is a possible later step.
    pub condition: String,
    /// Actions in written order; a valid rule has at least one.
    pub actions: Vec<Action>,
    /// Optional WITH metadata, e.g. `PRIORITY=90`.
    pub metadata: HashMap<String, Value>,
}
