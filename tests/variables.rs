//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

mod common;

use common::pdp_for_policy_with_config;
use xacml_pdp::config::Config;
use xacml_pdp::context::VariableDef;
use xacml_pdp::expr::Expression;
use xacml_pdp::policy::{Effect, Policy, PolicyVersion, Rule, Target};
use xacml_pdp::request::Request;
use xacml_pdp::status::{Decision, IndeterminateKind};
use xacml_pdp::value::AttributeValue;

fn policy_with_variables(variables: Vec<VariableDef>, condition: Expression) -> Policy {
    Policy {
        id: "p".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables,
        rules: vec![Rule {
            id: "r".to_owned(),
            effect: Effect::Permit,
            target: Target::default(),
            condition: Some(condition),
            obligation_expressions: Vec::new(),
            advice_expressions: Vec::new(),
        }],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    }
}

/// A variable referenced twice is only evaluated once; both
/// references see the same memoized result.
#[test]
fn variable_reference_resolves_and_is_memoized() {
    let variables = vec![VariableDef {
        id: "is-weekend".to_owned(),
        expression: Expression::Value(AttributeValue::Boolean(true)),
    }];
    let condition = Expression::Apply(
        "urn:oasis:names:tc:xacml:1.0:function:and".to_owned(),
        vec![Expression::VarRef("is-weekend".to_owned()), Expression::VarRef("is-weekend".to_owned())],
    );
    let policy = policy_with_variables(variables, condition);
    let pdp = pdp_for_policy_with_config(policy, Config::default());
    assert_eq!(pdp.evaluate(&Request::new()).decision, Decision::Permit);
}

/// A variable that references itself is rejected rather than
/// recursing forever.
#[test]
fn self_referential_variable_is_indeterminate() {
    let variables = vec![VariableDef {
        id: "loopy".to_owned(),
        expression: Expression::VarRef("loopy".to_owned()),
    }];
    let condition = Expression::VarRef("loopy".to_owned());
    let policy = policy_with_variables(variables, condition);
    let pdp = pdp_for_policy_with_config(policy, Config::default());
    let response = pdp.evaluate(&Request::new());
    assert_eq!(
        response.decision,
        Decision::Indeterminate(IndeterminateKind::P)
    );
}

/// A chain of variable references longer than
/// `max_variable_ref_depth` is rejected.
#[test]
fn variable_reference_depth_is_bounded() {
    let variables = vec![
        VariableDef {
            id: "a".to_owned(),
            expression: Expression::VarRef("b".to_owned()),
        },
        VariableDef {
            id: "b".to_owned(),
            expression: Expression::VarRef("c".to_owned()),
        },
        VariableDef {
            id: "c".to_owned(),
            expression: Expression::Value(AttributeValue::Boolean(true)),
        },
    ];
    let condition = Expression::VarRef("a".to_owned());
    let policy = policy_with_variables(variables, condition);
    let config = Config::builder()
        .max_variable_ref_depth(2)
        .build()
        .expect("valid config");
    let pdp = pdp_for_policy_with_config(policy, config);
    let response = pdp.evaluate(&Request::new());
    assert_eq!(
        response.decision,
        Decision::Indeterminate(IndeterminateKind::P)
    );
}
