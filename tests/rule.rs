//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use common::{pdp_for_policy, rule_matching_subject_string, single_rule_policy, unconditional_rule};
use xacml_pdp::policy::Effect;
use xacml_pdp::request::{Category, Request};
use xacml_pdp::status::Decision;
use xacml_pdp::value::{AttributeValue, Bag, Datatype};

/// A rule whose target matches the request yields its effect.
#[test]
fn matching_target_yields_deny() {
    let rule = rule_matching_subject_string("deny-contractors", Effect::Deny, "role", "contractor");
    let policy = single_rule_policy(
        "p",
        rule,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
    );
    let pdp = pdp_for_policy(policy);

    let mut req = Request::new();
    let mut role = Bag::empty(Datatype::String);
    role.push(AttributeValue::String("contractor".to_owned()));
    req.insert(Category::subject(), "role", role);

    let response = pdp.evaluate(&req);
    assert_eq!(response.decision, Decision::Deny);
}

/// A rule whose target does not match the request is NotApplicable.
#[test]
fn mismatching_target_is_not_applicable() {
    let rule = rule_matching_subject_string("deny-contractors", Effect::Deny, "role", "contractor");
    let policy = single_rule_policy(
        "p",
        rule,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
    );
    let pdp = pdp_for_policy(policy);

    let mut req = Request::new();
    let mut role = Bag::empty(Datatype::String);
    role.push(AttributeValue::String("employee".to_owned()));
    req.insert(Category::subject(), "role", role);

    let response = pdp.evaluate(&req);
    assert_eq!(response.decision, Decision::NotApplicable);
}

/// An unconditional rule applies regardless of request content.
#[test]
fn unconditional_rule_always_applies() {
    let rule = unconditional_rule("r1", Effect::Permit);
    let policy = single_rule_policy(
        "p",
        rule,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
    );
    let pdp = pdp_for_policy(policy);
    let response = pdp.evaluate(&Request::new());
    assert_eq!(response.decision, Decision::Permit);
}
