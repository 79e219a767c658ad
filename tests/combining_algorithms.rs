//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use common::{pdp_for_policy, pdp_for_policy_with_config, policy_with_rules, unconditional_rule};
use xacml_pdp::config::Config;
use xacml_pdp::policy::Effect;
use xacml_pdp::request::Request;
use xacml_pdp::status::Decision;

/// deny-overrides: a Deny anywhere in the sequence wins, even when a
/// Permit precedes it.
#[test]
fn deny_overrides_picks_deny_over_permit() {
    let rules = vec![
        unconditional_rule("r1", Effect::Permit),
        unconditional_rule("r2", Effect::Deny),
    ];
    let policy = policy_with_rules(
        "p",
        rules,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
    );
    let pdp = pdp_for_policy(policy);
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Deny);
}

/// permit-overrides: symmetric to deny-overrides.
#[test]
fn permit_overrides_picks_permit_over_deny() {
    let rules = vec![
        unconditional_rule("r1", Effect::Deny),
        unconditional_rule("r2", Effect::Permit),
    ];
    let policy = policy_with_rules(
        "p",
        rules,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:permit-overrides",
    );
    let pdp = pdp_for_policy(policy);
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Permit);
}

/// first-applicable: the first rule whose target matches wins,
/// regardless of what later rules would produce.
#[test]
fn first_applicable_takes_first_rule() {
    let rules = vec![
        unconditional_rule("r1", Effect::Deny),
        unconditional_rule("r2", Effect::Permit),
    ];
    let policy = policy_with_rules(
        "p",
        rules,
        "urn:oasis:names:tc:xacml:1.0:rule-combining-algorithm:first-applicable",
    );
    let pdp = pdp_for_policy(policy);
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Deny);
}

/// deny-unless-permit never produces Indeterminate or NotApplicable:
/// absent any Permit, the result defaults to Deny.
#[test]
fn deny_unless_permit_defaults_to_deny() {
    let policy = policy_with_rules(
        "p",
        Vec::new(),
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-unless-permit",
    );
    let pdp = pdp_for_policy(policy);
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Deny);
}

/// permit-unless-deny is the mirror image.
#[test]
fn permit_unless_deny_defaults_to_permit() {
    let policy = policy_with_rules(
        "p",
        Vec::new(),
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:permit-unless-deny",
    );
    let pdp = pdp_for_policy(policy);
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Permit);
}

/// `on-permit-apply-second` is not in the default policy-combining
/// registry; a policy naming it is rejected by `Config::validate`
/// only indirectly — the algorithm lookup inside evaluation fails and
/// surfaces as an `Indeterminate{DP}`, unless the protected registry
/// was explicitly enabled.
#[test]
fn protected_algorithm_requires_opt_in() {
    use xacml_pdp::policy::{Policy, PolicySet, PolicySetEntry, PolicyVersion, Target};
    use xacml_pdp::provider::PolicyProvider;
    use xacml_pdp::status::IndeterminateKind;
    use xacml_pdp::Pdp;

    let inner_a = Policy {
        id: "a".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables: Vec::new(),
        rules: vec![unconditional_rule("r", Effect::Permit)],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let inner_b = Policy {
        id: "b".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables: Vec::new(),
        rules: vec![unconditional_rule("r", Effect::Deny)],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let policy_set = PolicySet {
        id: "ps".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:on-permit-apply-second"
                .to_owned(),
        entries: vec![
            PolicySetEntry::Policy(inner_a),
            PolicySetEntry::Policy(inner_b),
        ],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };

    let mut provider = PolicyProvider::new();
    provider
        .add_policy_set(policy_set.clone())
        .expect("add_policy_set");
    provider.set_root(PolicySetEntry::PolicySet(policy_set));
    let pdp = Pdp::new(Config::default(), provider).expect("Pdp::new");
    assert_eq!(
        pdp.evaluate(&Request::new()).decision,
        Decision::Indeterminate(IndeterminateKind::DP)
    );
}

/// With the protected registry enabled, `on-permit-apply-second`
/// applies its defined semantics: since the first child is Permit,
/// the combined result is the second child's decision.
#[test]
fn protected_algorithm_applies_once_enabled() {
    use xacml_pdp::policy::{Policy, PolicySet, PolicySetEntry, PolicyVersion, Target};
    use xacml_pdp::provider::PolicyProvider;

    let inner_a = Policy {
        id: "a".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables: Vec::new(),
        rules: vec![unconditional_rule("r", Effect::Permit)],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let inner_b = Policy {
        id: "b".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables: Vec::new(),
        rules: vec![unconditional_rule("r", Effect::Deny)],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let policy_set = PolicySet {
        id: "ps".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:on-permit-apply-second"
                .to_owned(),
        entries: vec![
            PolicySetEntry::Policy(inner_a),
            PolicySetEntry::Policy(inner_b),
        ],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };

    let mut provider = PolicyProvider::new();
    provider
        .add_policy_set(policy_set.clone())
        .expect("add_policy_set");
    provider.set_root(PolicySetEntry::PolicySet(policy_set));
    let config = Config::builder()
        .enable_protected_combining_algorithms()
        .build()
        .expect("valid config");
    let pdp = Pdp::new(config, provider).expect("Pdp::new");
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Deny);
}

/// `pdp_for_policy_with_config` is exercised so the helper stays
/// covered even though most tests use the default-config shortcut.
#[test]
fn custom_config_is_honored() {
    let rules = vec![unconditional_rule("r1", Effect::Permit)];
    let policy = policy_with_rules(
        "p",
        rules,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
    );
    let config = Config::builder()
        .max_variable_ref_depth(3)
        .build()
        .expect("valid config");
    let pdp = pdp_for_policy_with_config(policy, config);
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Permit);
}
