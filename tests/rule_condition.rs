//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use common::{pdp_for_policy, single_rule_policy};
use xacml_pdp::expr::{AttributeDesignator, Expression};
use xacml_pdp::policy::{Effect, Rule, Target};
use xacml_pdp::request::{Category, Request};
use xacml_pdp::status::{Decision, IndeterminateKind};
use xacml_pdp::value::{AttributeValue, Bag, Datatype};

fn age_designator(must_be_present: bool) -> Expression {
    Expression::Designator(AttributeDesignator {
        category: Category::subject(),
        attribute_id: "age".to_owned(),
        datatype: Datatype::Integer,
        issuer: None,
        must_be_present,
    })
}

/// A condition comparing a required integer attribute against a
/// threshold permits once the attribute clears it.
#[test]
fn integer_comparison_condition_permits() {
    let rule = Rule {
        id: "adult".to_owned(),
        effect: Effect::Permit,
        target: Target::default(),
        condition: Some(Expression::Apply(
            "urn:oasis:names:tc:xacml:1.0:function:integer-greater-than-or-equal".to_owned(),
            vec![age_designator(true), Expression::Value(AttributeValue::Integer(18))],
        )),
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let policy = single_rule_policy(
        "p",
        rule,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
    );
    let pdp = pdp_for_policy(policy);

    let mut req = Request::new();
    let mut age = Bag::empty(Datatype::Integer);
    age.push(AttributeValue::Integer(21));
    req.insert(Category::subject(), "age", age);

    let response = pdp.evaluate(&req);
    assert_eq!(response.decision, Decision::Permit);
}

/// The same rule evaluated against a request missing the required
/// attribute yields the rule's effect-typed Indeterminate, never a
/// panic or a silent `NotApplicable`.
#[test]
fn missing_required_attribute_is_indeterminate() {
    let rule = Rule {
        id: "adult".to_owned(),
        effect: Effect::Permit,
        target: Target::default(),
        condition: Some(Expression::Apply(
            "urn:oasis:names:tc:xacml:1.0:function:integer-greater-than-or-equal".to_owned(),
            vec![age_designator(true), Expression::Value(AttributeValue::Integer(18))],
        )),
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    let policy = single_rule_policy(
        "p",
        rule,
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
    );
    let pdp = pdp_for_policy(policy);

    let response = pdp.evaluate(&Request::new());
    assert_eq!(
        response.decision,
        Decision::Indeterminate(IndeterminateKind::P)
    );
    assert!(!response.status.is_empty());
}
