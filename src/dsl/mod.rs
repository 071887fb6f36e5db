//! Advisory rule DSL: parser and validator.
//!
//! Rule text (authored by hand or generated by a model) parses into
//! structured [`Rule`]s, which are then validated against the
//! compliance guardrail's vocabulary. Parsing is strict about
//! structure, validation is advisory about policy.
//!
//! ```
//! use bazaarlord::dsl::{parse_rules, validate_rules};
//!
//! let rules = parse_rules(
//!     "RULE \"flip\"\nWHEN price < p50_30d*0.75\nTHEN RECOMMEND_BUY(qty=10)",
//! )
//! .unwrap();
//! assert!(validate_rules(&rules).is_empty());
//! ```

mod parser;
mod rule;
mod validate;
mod value;

pub use parser::{parse_action, parse_rules, split_commas, DslError};
pub use rule::{Action, Rule};
pub use validate::validate_rules;
pub use value::Value;
