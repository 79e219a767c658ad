//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! The top-level policy decision point: wires a [`Config`], a
//! [`PolicyProvider`], and incoming [`Request`]s together into
//! decisions.
use crate::config::Config;
use crate::context::EvaluationContext;
use crate::errors::PolicyError;
use crate::policy::{evaluate_policy, evaluate_policy_set, Advice, Obligation, PolicySetEntry};
use crate::provider::PolicyProvider;
use crate::request::Request;
use crate::status::{Decision, Status};
use log::info;

/// The result of a full PDP evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub decision: Decision,
    pub obligations: Vec<Obligation>,
    pub advice: Vec<Advice>,
    pub status: Vec<Status>,
}

/// A policy decision point: an immutable, `Send + Sync` policy graph
/// and configuration, evaluated against any number of concurrent
/// requests. Each request gets its own [`EvaluationContext`]; no
/// mutable state is shared across requests.
#[derive(Debug, Clone)]
pub struct Pdp {
    config: Config,
    provider: PolicyProvider,
}

impl Pdp {
    /// # Errors
    /// Returns [`PolicyError::EmptyProvider`] if `provider` has no
    /// configured root policy/policy-set, or propagates a
    /// [`PolicyError::ReferenceCycle`]/[`PolicyError::ReferenceDepthExceeded`]/
    /// [`PolicyError::UnresolvedReference`] found while statically
    /// validating every `PolicySetIdReference` chain in `provider`
    /// (see [`PolicyProvider::validate_references`]).
    pub fn new(config: Config, provider: PolicyProvider) -> Result<Self, PolicyError> {
        provider.root()?;
        provider.validate_references(&config)?;
        Ok(Pdp { config, provider })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluate `request` against the root policy/policy-set,
    /// returning a full [`Response`]. This never panics and never
    /// returns `Err` for a failure that XACML defines as recoverable;
    /// such failures show up as `Decision::Indeterminate` with
    /// diagnostic `Status` entries instead.
    #[must_use]
    pub fn evaluate(&self, request: &Request) -> Response {
        info!("evaluating request");
        let mut ctx = EvaluationContext::new(&self.config, request);
        let root = self
            .provider
            .root()
            .expect("Pdp::new guarantees a root is configured");
        let outcome = match root {
            PolicySetEntry::Policy(p) => evaluate_policy(p, &mut ctx),
            PolicySetEntry::PolicySet(ps) => evaluate_policy_set(ps, &mut ctx, &self.provider),
            PolicySetEntry::PolicyIdReference(_) | PolicySetEntry::PolicySetIdReference(_) => {
                unreachable!("a root entry is never itself a reference")
            }
        };
        info!("decision: {}", outcome.decision);
        Response {
            decision: outcome.decision,
            obligations: outcome.obligations,
            advice: outcome.advice,
            status: ctx.status_trail(),
        }
    }
}
