//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use xacml_pdp::config::Config;
use xacml_pdp::errors::PolicyError;
use xacml_pdp::expr::Expression;
use xacml_pdp::policy::{
    AttributeAssignment, Effect, ObligationExpression, Policy, PolicyRef, PolicySet,
    PolicySetEntry, PolicyVersion, Rule, Target,
};
use xacml_pdp::provider::PolicyProvider;
use xacml_pdp::request::Request;
use xacml_pdp::status::Decision;
use xacml_pdp::value::AttributeValue;
use xacml_pdp::Pdp;

fn unconditional_rule_with_obligation(id: &str, effect: Effect, obligation_id: &str) -> Rule {
    Rule {
        id: id.to_owned(),
        effect,
        target: Target::default(),
        condition: None,
        obligation_expressions: vec![ObligationExpression {
            id: obligation_id.to_owned(),
            fulfill_on: effect,
            assignments: vec![AttributeAssignment {
                attribute_id: "reason".to_owned(),
                value: Expression::Value(AttributeValue::String(obligation_id.to_owned())),
            }],
        }],
        advice_expressions: Vec::new(),
    }
}

/// A permit-overrides policy set with one Deny child (carrying an
/// obligation tagged to Deny) and one Permit child (carrying an
/// obligation tagged to Permit): since the combined decision is
/// Permit, only the Permit-tagged obligation surfaces.
#[test]
fn obligations_filtered_by_final_effect() {
    let deny_policy = Policy {
        id: "deny-policy".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables: Vec::new(),
        rules: vec![unconditional_rule_with_obligation(
            "r-deny",
            Effect::Deny,
            "log-denial",
        )],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let permit_policy = Policy {
        id: "permit-policy".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables: Vec::new(),
        rules: vec![unconditional_rule_with_obligation(
            "r-permit",
            Effect::Permit,
            "log-grant",
        )],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let policy_set = PolicySet {
        id: "ps".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:permit-overrides".to_owned(),
        entries: vec![
            PolicySetEntry::Policy(deny_policy),
            PolicySetEntry::Policy(permit_policy),
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

    let response = pdp.evaluate(&Request::new());
    assert_eq!(response.decision, Decision::Permit);
    assert_eq!(response.obligations.len(), 1);
    assert_eq!(response.obligations[0].id, "log-grant");
}

/// A `PolicySetIdReference` resolves to a registered policy set, and
/// its decision is folded into the referencing set exactly as if it
/// had been nested directly.
#[test]
fn policy_set_id_reference_resolves() {
    let leaf = PolicySet {
        id: "leaf".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::Policy(Policy {
            id: "leaf-policy".to_owned(),
            version: PolicyVersion(vec![1, 0]),
            target: Target::default(),
            rule_combining_algorithm:
                "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
            variables: Vec::new(),
            rules: vec![common::unconditional_rule("r", Effect::Permit)],
            obligation_expressions: Vec::new(),
            advice_expressions: Vec::new(),
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let root = PolicySet {
        id: "root".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::PolicySetIdReference(PolicyRef {
            id: "leaf".to_owned(),
            version: None,
            version_pattern: None,
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };

    let mut provider = PolicyProvider::new();
    provider.add_policy_set(leaf).expect("add_policy_set leaf");
    provider
        .add_policy_set(root.clone())
        .expect("add_policy_set root");
    provider.set_root(PolicySetEntry::PolicySet(root));
    let pdp = Pdp::new(Config::default(), provider).expect("Pdp::new");
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Permit);
}

/// Two policy sets that reference each other form a cycle; `Pdp::new`
/// fails fatally at construction time, naming the offending chain,
/// rather than surfacing the cycle as a per-request `Indeterminate`.
#[test]
fn cyclic_policy_set_reference_fails_at_load_time() {
    let one = PolicySet {
        id: "one".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::PolicySetIdReference(PolicyRef {
            id: "two".to_owned(),
            version: None,
            version_pattern: None,
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let two = PolicySet {
        id: "two".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::PolicySetIdReference(PolicyRef {
            id: "one".to_owned(),
            version: None,
            version_pattern: None,
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };

    let mut provider = PolicyProvider::new();
    provider.add_policy_set(one.clone()).expect("add one");
    provider.add_policy_set(two).expect("add two");
    provider.set_root(PolicySetEntry::PolicySet(one));

    let err = Pdp::new(Config::default(), provider).expect_err("cycle must be rejected");
    match err {
        PolicyError::ReferenceCycle(chain) => {
            assert!(chain.contains("one"));
            assert!(chain.contains("two"));
        }
        other => panic!("expected ReferenceCycle, got {other:?}"),
    }
}

/// A `PolicySetIdReference` chain longer than `max_policy_ref_depth`
/// is rejected, and the reported chain names every set along it,
/// including the root.
#[test]
fn reference_chain_deeper_than_limit_fails_at_load_time() {
    let c = PolicySet {
        id: "c".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::Policy(Policy {
            id: "c-policy".to_owned(),
            version: PolicyVersion(vec![1, 0]),
            target: Target::default(),
            rule_combining_algorithm:
                "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
            variables: Vec::new(),
            rules: vec![common::unconditional_rule("r", Effect::Permit)],
            obligation_expressions: Vec::new(),
            advice_expressions: Vec::new(),
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let b = PolicySet {
        id: "b".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::PolicySetIdReference(PolicyRef {
            id: "c".to_owned(),
            version: None,
            version_pattern: None,
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let a = PolicySet {
        id: "a".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::PolicySetIdReference(PolicyRef {
            id: "b".to_owned(),
            version: None,
            version_pattern: None,
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };

    let mut provider = PolicyProvider::new();
    provider.add_policy_set(a.clone()).expect("add a");
    provider.add_policy_set(b).expect("add b");
    provider.add_policy_set(c).expect("add c");
    provider.set_root(PolicySetEntry::PolicySet(a));

    let config = Config::builder()
        .max_policy_ref_depth(2)
        .build()
        .expect("valid config");
    let err = Pdp::new(config, provider).expect_err("chain deeper than the limit must be rejected");
    match err {
        PolicyError::ReferenceDepthExceeded(chain) => {
            assert!(chain.contains('a'));
            assert!(chain.contains('b'));
            assert!(chain.contains('c'));
        }
        other => panic!("expected ReferenceDepthExceeded, got {other:?}"),
    }
}

/// A dangling reference to a policy set that was never registered is
/// also rejected at load time.
#[test]
fn unresolved_policy_set_reference_fails_at_load_time() {
    let root = PolicySet {
        id: "root".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        policy_combining_algorithm:
            "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable".to_owned(),
        entries: vec![PolicySetEntry::PolicySetIdReference(PolicyRef {
            id: "does-not-exist".to_owned(),
            version: None,
            version_pattern: None,
        })],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };

    let mut provider = PolicyProvider::new();
    provider.add_policy_set(root.clone()).expect("add root");
    provider.set_root(PolicySetEntry::PolicySet(root));

    let err = Pdp::new(Config::default(), provider).expect_err("dangling reference must be rejected");
    assert!(matches!(err, PolicyError::UnresolvedReference(_)));
}
