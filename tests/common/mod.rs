//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

use xacml_pdp::config::Config;
use xacml_pdp::policy::{
    AllOf, AnyOf, Effect, Match, Policy, PolicySetEntry, PolicyVersion, Rule, Target,
};
use xacml_pdp::provider::PolicyProvider;
use xacml_pdp::request::Category;
use xacml_pdp::Pdp;

/// A single-rule policy applying a given rule-combining algorithm,
/// rooted directly (no enclosing `PolicySet`).
#[allow(dead_code)]
pub fn single_rule_policy(id: &str, rule: Rule, rule_combining_algorithm: &str) -> Policy {
    policy_with_rules(id, vec![rule], rule_combining_algorithm)
}

/// A policy with an arbitrary ordered list of rules, applying a given
/// rule-combining algorithm.
#[allow(dead_code)]
pub fn policy_with_rules(id: &str, rules: Vec<Rule>, rule_combining_algorithm: &str) -> Policy {
    Policy {
        id: id.to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm: rule_combining_algorithm.to_owned(),
        variables: Vec::new(),
        rules,
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    }
}

/// A rule that always matches (empty target) and always applies its
/// effect (no condition).
#[allow(dead_code)]
pub fn unconditional_rule(id: &str, effect: Effect) -> Rule {
    Rule {
        id: id.to_owned(),
        effect,
        target: Target::default(),
        condition: None,
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    }
}

/// A rule matching on a single string-equal subject attribute.
#[allow(dead_code)]
pub fn rule_matching_subject_string(
    id: &str,
    effect: Effect,
    attribute_id: &str,
    expected: &str,
) -> Rule {
    Rule {
        id: id.to_owned(),
        effect,
        target: Target(vec![AnyOf(vec![AllOf(vec![Match {
            category: Category::subject(),
            attribute_id: attribute_id.to_owned(),
            value: xacml_pdp::value::AttributeValue::String(expected.to_owned()),
            match_function: "urn:oasis:names:tc:xacml:1.0:function:string-equal".to_owned(),
        }])])]),
        condition: None,
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    }
}

/// Build a `Pdp` rooted at a single policy, using default configuration.
///
/// # Panics
/// Panics if the provider/config combination is rejected (a test bug,
/// not a recoverable evaluation outcome).
#[allow(dead_code)]
pub fn pdp_for_policy(policy: Policy) -> Pdp {
    pdp_for_policy_with_config(policy, Config::default())
}

#[allow(dead_code)]
pub fn pdp_for_policy_with_config(policy: Policy, config: Config) -> Pdp {
    let mut provider = PolicyProvider::new();
    provider.add_policy(policy.clone()).expect("add_policy");
    provider.set_root(PolicySetEntry::Policy(policy));
    Pdp::new(config, provider).expect("Pdp::new")
}
