//! Advisory-only compliance guardrail.
//!
//! Centralizes the closed action vocabularies that keep every output
//! advisory: a fixed set of allowed recommendation/annotation actions
//! and a fixed set of prohibited executive actions. Free-form text
//! (typically model output) is sanitized by rewriting the two common
//! executive verbs to their advisory equivalents; anything else
//! prohibited is detected and reported, never silently executed.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// Allowed advisory action. The DSL accepts exactly these names (plus
/// `RECOMMEND_`-prefixed extensions, which validation soft-flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvisoryAction {
    RecommendBuy,
    RecommendCraft,
    Set,
    Alert,
    Watchlist,
    Simulate,
    Skip,
    Notify,
    OpenAhSearch,
    CopyPostString,
}

impl AdvisoryAction {
    /// Every allowed action, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::RecommendBuy,
        Self::RecommendCraft,
        Self::Set,
        Self::Alert,
        Self::Watchlist,
        Self::Simulate,
        Self::Skip,
        Self::Notify,
        Self::OpenAhSearch,
        Self::CopyPostString,
    ];

    /// DSL token for this action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecommendBuy => "RECOMMEND_BUY",
            Self::RecommendCraft => "RECOMMEND_CRAFT",
            Self::Set => "SET",
            Self::Alert => "ALERT",
            Self::Watchlist => "WATCHLIST",
            Self::Simulate => "SIMULATE",
            Self::Skip => "SKIP",
            Self::Notify => "NOTIFY",
            Self::OpenAhSearch => "OPEN_AH_SEARCH",
            Self::CopyPostString => "COPY_POST_STRING",
        }
    }

    /// Look up an action by its DSL token.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for AdvisoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prohibited executive action. Never emitted by any component; the
/// guardrail exists to catch these in authored or model-generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProhibitedAction {
    Buy,
    Craft,
    Cancel,
    Post,
    Repost,
    Undercut,
    Autobuy,
    Autocraft,
    Autocancel,
    Autorepost,
}

impl ProhibitedAction {
    /// Every prohibited action, in alphabetical token order (detection
    /// reports hits in this order).
    pub const ALL: [Self; 10] = [
        Self::Autobuy,
        Self::Autocancel,
        Self::Autocraft,
        Self::Autorepost,
        Self::Buy,
        Self::Cancel,
        Self::Craft,
        Self::Post,
        Self::Repost,
        Self::Undercut,
    ];

    /// DSL token for this action.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Craft => "CRAFT",
            Self::Cancel => "CANCEL",
            Self::Post => "POST",
            Self::Repost => "REPOST",
            Self::Undercut => "UNDERCUT",
            Self::Autobuy => "AUTOBUY",
            Self::Autocraft => "AUTOCRAFT",
            Self::Autocancel => "AUTOCANCEL",
            Self::Autorepost => "AUTOREPOST",
        }
    }

    /// Look up an action by its DSL token.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl fmt::Display for ProhibitedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if `name` is an allowed advisory action token.
pub fn is_allowed_action(name: &str) -> bool {
    AdvisoryAction::from_name(name).is_some()
}

/// True if `name` is a prohibited executive action token.
pub fn is_prohibited_action(name: &str) -> bool {
    ProhibitedAction::from_name(name).is_some()
}

/// Fixed preamble for model prompts, restating the advisory contract.
pub fn advisory_preamble() -> &'static str {
    "Advisory-only mode: analyze and recommend, never automate. \
     Do not generate instructions that would drive the game client. \
     Use ONLY these DSL actions: RECOMMEND_BUY(qty,target,eta_h), \
     RECOMMEND_CRAFT(qty,target,eta_h), SET(key,value), ALERT(type,msg), \
     WATCHLIST(tag), SIMULATE(days,strategy), SKIP(reason), \
     NOTIFY(channel), OPEN_AH_SEARCH(query), COPY_POST_STRING(text). \
     Prohibited actions: BUY, CRAFT, CANCEL, POST, REPOST, UNDERCUT, \
     AUTOBUY, AUTOCRAFT and similar. If you must propose an action, \
     phrase it as a recommendation."
}

fn buy_rewrite() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bBUY\s*\(").expect("valid regex"))
}

fn craft_rewrite() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bCRAFT\s*\(").expect("valid regex"))
}

/// One pattern per prohibited token. The regex crate has no
/// lookbehind, so "not preceded by [A-Z_]" is matched as an explicit
/// alternation on the preceding character.
fn detection_patterns() -> &'static Vec<(ProhibitedAction, Regex)> {
    static PATTERNS: OnceLock<Vec<(ProhibitedAction, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        ProhibitedAction::ALL
            .into_iter()
            .map(|action| {
                let pattern = format!(r"(?:^|[^A-Z_]){}\s*\(", action.as_str());
                (action, Regex::new(&pattern).expect("valid regex"))
            })
            .collect()
    })
}

/// Rewrite executive verbs to advisory equivalents and warn on
/// residual prohibited tokens.
///
/// `BUY(` becomes `RECOMMEND_BUY(` and `CRAFT(` becomes
/// `RECOMMEND_CRAFT(`, case-insensitively and tolerating whitespace
/// before the parenthesis. Any other prohibited invocation left in the
/// rewritten text is logged as a warning; the text is still returned
/// so the caller can decide policy.
pub fn sanitize_dsl_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let replaced = buy_rewrite().replace_all(text, "RECOMMEND_BUY(");
    let replaced = craft_rewrite().replace_all(&replaced, "RECOMMEND_CRAFT(");
    let replaced = replaced.into_owned();

    let residual: Vec<ProhibitedAction> = detect_prohibited_actions(&replaced)
        .into_iter()
        .filter(|a| !matches!(a, ProhibitedAction::Buy | ProhibitedAction::Craft))
        .collect();
    if !residual.is_empty() {
        let tokens: Vec<&str> = residual.iter().map(|a| a.as_str()).collect();
        warn!(
            "prohibited actions detected in rule text: {}",
            tokens.join(", ")
        );
    }

    replaced
}

/// Detect prohibited tokens used as standalone invocations.
///
/// A hit requires the token to be followed by `(` (optionally after
/// whitespace) and not preceded by an uppercase letter or underscore,
/// which keeps `RECOMMEND_BUY(` from matching as `BUY(`. Bare mentions
/// without a parenthesis are not invocations and do not match.
pub fn detect_prohibited_actions(text: &str) -> Vec<ProhibitedAction> {
    if text.is_empty() {
        return Vec::new();
    }
    detection_patterns()
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|&(action, _)| action)
        .collect()
}
