//! Integration tests for the advisory guardrail.

use bazaarlord::compliance::{
    advisory_preamble, detect_prohibited_actions, sanitize_dsl_text, AdvisoryAction,
    ProhibitedAction,
};
use bazaarlord::dsl::{parse_rules, validate_rules};

#[test]
fn sanitize_then_detect_is_clean() {
    let sanitized = sanitize_dsl_text("BUY(qty=1); CRAFT(qty=2)");
    assert!(sanitized.contains("RECOMMEND_BUY("));
    assert!(sanitized.contains("RECOMMEND_CRAFT("));
    assert!(detect_prohibited_actions(&sanitized).is_empty());
}

#[test]
fn detect_ignores_bare_mentions_and_advisory_prefixes() {
    assert!(detect_prohibited_actions("RECOMMEND_BUY(1) BUY CRAFT").is_empty());
}

#[test]
fn detect_reports_hits_in_token_order() {
    let hits = detect_prohibited_actions("UNDERCUT(1) AUTOBUY(2) POST(3)");
    assert_eq!(
        hits,
        vec![
            ProhibitedAction::Autobuy,
            ProhibitedAction::Post,
            ProhibitedAction::Undercut,
        ]
    );
}

#[test]
fn sanitized_model_output_parses_as_advisory_rules() {
    // A model that emits executive verbs still yields a clean rule set
    // after sanitization.
    let model_output = "RULE \"model\"\nWHEN price < p50_7d*0.8\nTHEN BUY(qty=5)";
    let sanitized = sanitize_dsl_text(model_output);

    let rules = parse_rules(&sanitized).unwrap();
    assert_eq!(rules[0].actions[0].name, "RECOMMEND_BUY");
    assert!(validate_rules(&rules).is_empty());
}

#[test]
fn vocabulary_sizes_are_fixed() {
    assert_eq!(AdvisoryAction::ALL.len(), 10);
    assert_eq!(ProhibitedAction::ALL.len(), 10);
}

#[test]
fn preamble_lists_every_allowed_action() {
    let preamble = advisory_preamble();
    for action in AdvisoryAction::ALL {
        assert!(
            preamble.contains(action.as_str()),
            "preamble missing {action}"
        );
    }
}
