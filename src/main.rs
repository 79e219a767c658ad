//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! Demonstration CLI: builds a small in-memory policy and evaluates a
//! fixed request against it, printing the resulting decision.
//!
//! This binary exists to illustrate the library end-to-end; it is not
//! a production front-end. Loading real policy documents from disk
//! requires a caller-supplied parser (see
//! [`xacml_pdp::provider::PolicyProvider::load_dir`]), since parsing
//! XACML XML/JSON is outside this crate's scope.
use clap::Parser;
use log::{info, warn};
use std::process::ExitCode;
use xacml_pdp::args::CliArgs;
use xacml_pdp::config::Config;
use xacml_pdp::policy::{
    AllOf, AnyOf, Effect, Match, Policy, PolicyVersion, Rule, Target,
};
use xacml_pdp::provider::PolicyProvider;
use xacml_pdp::request::{Category, Request};
use xacml_pdp::value::{AttributeValue, Bag, Datatype};
use xacml_pdp::Pdp;

/// Build a single-rule demonstration policy: permit when the subject's
/// `role` attribute equals `"admin"`.
fn demo_policy() -> Policy {
    let admin_match = Match {
        category: Category::subject(),
        attribute_id: "role".to_owned(),
        value: AttributeValue::String("admin".to_owned()),
        match_function: "urn:oasis:names:tc:xacml:1.0:function:string-equal".to_owned(),
    };
    let rule = Rule {
        id: "permit-admins".to_owned(),
        effect: Effect::Permit,
        target: Target(vec![AnyOf(vec![AllOf(vec![admin_match])])]),
        condition: None,
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    };
    Policy {
        id: "urn:xacml-pdp:demo:admin-policy".to_owned(),
        version: PolicyVersion(vec![1, 0]),
        target: Target::default(),
        rule_combining_algorithm:
            "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides".to_owned(),
        variables: Vec::new(),
        rules: vec![rule],
        obligation_expressions: Vec::new(),
        advice_expressions: Vec::new(),
    }
}

fn demo_request() -> Request {
    let mut req = Request::new();
    let mut role_bag = Bag::empty(Datatype::String);
    role_bag.push(AttributeValue::String("admin".to_owned()));
    req.insert(Category::subject(), "role", role_bag);
    req
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    if args.policy_dir.is_some() {
        warn!(
            "--input is accepted for forward compatibility with a caller-supplied loader, \
             but this binary does not parse policy documents from disk; running the built-in demo instead"
        );
    }

    let mut config_builder = Config::builder()
        .max_policy_ref_depth(args.max_policy_ref_depth)
        .max_variable_ref_depth(args.max_variable_ref_depth)
        .ignore_old_policy_versions(args.ignore_old_policy_versions)
        .strict_attribute_issuer_match(args.strict_attribute_issuer_match);
    if args.enable_protected_combining_algorithms {
        config_builder = config_builder.enable_protected_combining_algorithms();
    }
    let config = match config_builder.build() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut provider = PolicyProvider::new();
    let policy = demo_policy();
    if let Err(e) = provider.add_policy(policy.clone()) {
        eprintln!("failed to register demo policy: {e}");
        return ExitCode::FAILURE;
    }
    provider.set_root(xacml_pdp::policy::PolicySetEntry::Policy(policy));

    let pdp = match Pdp::new(config, provider) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("failed to construct PDP: {e}");
            return ExitCode::FAILURE;
        }
    };

    let request = demo_request();
    info!("evaluating demonstration request");
    let response = pdp.evaluate(&request);
    println!("decision: {}", response.decision);
    for status in &response.status {
        println!("status: {status}");
    }
    for obligation in &response.obligations {
        println!("obligation: {}", obligation.id);
    }

    ExitCode::SUCCESS
}
