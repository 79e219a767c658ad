//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! The policy tree: `Target`/`Match`, `Rule`, `Policy`, `PolicySet`,
//! and the recursive evaluation algorithm for each level.
use crate::context::{EvaluationContext, VariableDef};
use crate::expr::{eval, Expression};
use crate::request::Category;
use crate::status::{Decision, IndeterminateKind, Status};
use crate::value::AttributeValue;
use log::{debug, trace};
use std::fmt;

/// The effect a rule produces when it applies and its condition (if
/// any) holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Permit,
    Deny,
}

impl fmt::Display for Effect {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Effect::Permit => write!(f, "Permit"),
            Effect::Deny => write!(f, "Deny"),
        }
    }
}

impl From<Effect> for Decision {
    fn from(e: Effect) -> Decision {
        match e {
            Effect::Permit => Decision::Permit,
            Effect::Deny => Decision::Deny,
        }
    }
}

impl Effect {
    fn indeterminate(self) -> IndeterminateKind {
        match self {
            Effect::Permit => IndeterminateKind::P,
            Effect::Deny => IndeterminateKind::D,
        }
    }
}

/// A dotted numeric policy version, e.g. `1.2.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolicyVersion(pub Vec<u32>);

impl fmt::Display for PolicyVersion {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.iter().map(ToString::to_string).collect::<Vec<_>>().join(".")
        )
    }
}

/// One component of a [`PolicyVersionPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionComponent {
    Exact(u32),
    /// `*`: matches any single component.
    Any,
    /// `+`: matches this component and anchors the match, every
    /// subsequent component is unconstrained.
    AtLeast(u32),
}

/// A version-matching pattern used by policy references, e.g.
/// `1.*` or `2.1+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyVersionPattern(pub Vec<VersionComponent>);

impl PolicyVersionPattern {
    #[must_use]
    pub fn matches(&self, version: &PolicyVersion) -> bool {
        for (i, component) in self.0.iter().enumerate() {
            match component {
                VersionComponent::Exact(n) => {
                    if version.0.get(i) != Some(n) {
                        return false;
                    }
                }
                VersionComponent::Any => {
                    if version.0.get(i).is_none() {
                        return false;
                    }
                }
                VersionComponent::AtLeast(n) => {
                    return version.0.get(i).is_some_and(|v| v >= n);
                }
            }
        }
        true
    }
}

/// A single attribute-value match test inside a `Target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub category: Category,
    pub attribute_id: String,
    pub value: AttributeValue,
    /// The comparison function URI, e.g. `...:string-equal`.
    pub match_function: String,
}

/// A conjunction of `Match`es, all of which must succeed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllOf(pub Vec<Match>);

/// A disjunction of `AllOf`s; at least one must succeed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnyOf(pub Vec<AllOf>);

/// A target: a conjunction of `AnyOf`s. An empty target always
/// matches (the "Any" target).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Target(pub Vec<AnyOf>);

fn eval_match(m: &Match, ctx: &EvaluationContext) -> Result<bool, Status> {
    let apply = Expression::Apply(
        m.match_function.clone(),
        vec![
            Expression::Value(m.value.clone()),
            Expression::Designator(crate::expr::AttributeDesignator {
                category: m.category.clone(),
                attribute_id: m.attribute_id.clone(),
                datatype: m.value.datatype(),
                issuer: None,
                must_be_present: false,
            }),
        ],
    );
    let result = eval(&apply, ctx)?;
    result
        .as_bool()
        .ok_or_else(|| Status::processing_error("match function did not return boolean".to_owned()))
}

fn eval_all_of(all_of: &AllOf, ctx: &EvaluationContext) -> Result<bool, Status> {
    for m in &all_of.0 {
        if !eval_match(m, ctx)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn eval_any_of(any_of: &AnyOf, ctx: &EvaluationContext) -> Result<bool, Status> {
    for all_of in &any_of.0 {
        if eval_all_of(all_of, ctx)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Whether `target` matches the request in `ctx`. An `Err` means the
/// match could not be determined (e.g. a required attribute was
/// missing) and the caller must turn this into an `Indeterminate`.
pub fn eval_target(target: &Target, ctx: &EvaluationContext) -> Result<bool, Status> {
    for any_of in &target.0 {
        if !eval_any_of(any_of, ctx)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// An obligation or advice expression, carried by a rule/policy/
/// policy-set and surfaced to the caller when its `fulfill_on` effect
/// matches the final decision.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeAssignment {
    pub attribute_id: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObligationExpression {
    pub id: String,
    pub fulfill_on: Effect,
    pub assignments: Vec<AttributeAssignment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdviceExpression {
    pub id: String,
    pub apply_on: Effect,
    pub assignments: Vec<AttributeAssignment>,
}

/// A resolved obligation/advice, with its assignment expressions
/// already evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Obligation {
    pub id: String,
    pub assignments: Vec<(String, AttributeValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub id: String,
    pub assignments: Vec<(String, AttributeValue)>,
}

fn resolve_assignments(
    assignments: &[AttributeAssignment],
    ctx: &EvaluationContext,
) -> Vec<(String, AttributeValue)> {
    assignments
        .iter()
        .filter_map(|a| {
            eval(&a.value, ctx)
                .ok()
                .and_then(|v| v.as_scalar().cloned())
                .map(|v| (a.attribute_id.clone(), v))
        })
        .collect()
}

/// A single rule within a policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub id: String,
    pub effect: Effect,
    pub target: Target,
    pub condition: Option<Expression>,
    pub obligation_expressions: Vec<ObligationExpression>,
    pub advice_expressions: Vec<AdviceExpression>,
}

/// The outcome of evaluating a rule, policy, or policy set: a decision
/// plus whatever obligations/advice apply to it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalOutcome {
    pub decision: Decision,
    pub obligations: Vec<Obligation>,
    pub advice: Vec<Advice>,
}

impl EvalOutcome {
    fn not_applicable() -> Self {
        EvalOutcome {
            decision: Decision::NotApplicable,
            obligations: Vec::new(),
            advice: Vec::new(),
        }
    }

    fn indeterminate(kind: IndeterminateKind) -> Self {
        EvalOutcome {
            decision: Decision::Indeterminate(kind),
            obligations: Vec::new(),
            advice: Vec::new(),
        }
    }
}

/// Evaluate a single rule per §4.5: target mismatch is NotApplicable;
/// a matching target with no condition (or a true condition) yields
/// the rule's effect; a false condition is NotApplicable; an error
/// evaluating target or condition yields the effect-typed
/// Indeterminate.
#[must_use]
pub fn evaluate_rule(rule: &Rule, ctx: &EvaluationContext) -> EvalOutcome {
    trace!("evaluating rule {}", rule.id);
    match eval_target(&rule.target, ctx) {
        Ok(false) => return EvalOutcome::not_applicable(),
        Err(status) => {
            ctx.record_status(status);
            return EvalOutcome::indeterminate(rule.effect.indeterminate());
        }
        Ok(true) => {}
    }
    if let Some(cond) = &rule.condition {
        match eval(cond, ctx) {
            Ok(v) => match v.as_bool() {
                Some(true) => {}
                Some(false) => return EvalOutcome::not_applicable(),
                None => {
                    ctx.record_status(Status::processing_error(
                        "condition did not evaluate to boolean".to_owned(),
                    ));
                    return EvalOutcome::indeterminate(rule.effect.indeterminate());
                }
            },
            Err(status) => {
                ctx.record_status(status);
                return EvalOutcome::indeterminate(rule.effect.indeterminate());
            }
        }
    }
    EvalOutcome {
        decision: rule.effect.into(),
        obligations: rule
            .obligation_expressions
            .iter()
            .filter(|o| o.fulfill_on == rule.effect)
            .map(|o| Obligation {
                id: o.id.clone(),
                assignments: resolve_assignments(&o.assignments, ctx),
            })
            .collect(),
        advice: rule
            .advice_expressions
            .iter()
            .filter(|a| a.apply_on == rule.effect)
            .map(|a| Advice {
                id: a.id.clone(),
                assignments: resolve_assignments(&a.assignments, ctx),
            })
            .collect(),
    }
}

/// A policy: an ordered list of rules combined by a single algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    pub id: String,
    pub version: PolicyVersion,
    pub target: Target,
    pub rule_combining_algorithm: String,
    pub variables: Vec<VariableDef>,
    pub rules: Vec<Rule>,
    pub obligation_expressions: Vec<ObligationExpression>,
    pub advice_expressions: Vec<AdviceExpression>,
}

/// A policy set: an ordered list of entries (policies, nested policy
/// sets, or references to either) combined by a single algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySet {
    pub id: String,
    pub version: PolicyVersion,
    pub target: Target,
    pub policy_combining_algorithm: String,
    pub entries: Vec<PolicySetEntry>,
    pub obligation_expressions: Vec<ObligationExpression>,
    pub advice_expressions: Vec<AdviceExpression>,
}

/// A reference to a policy or policy set defined elsewhere, resolved
/// at evaluation time through a [`crate::provider::PolicyProvider`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRef {
    pub id: String,
    pub version: Option<PolicyVersion>,
    pub version_pattern: Option<PolicyVersionPattern>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PolicySetEntry {
    Policy(Policy),
    PolicySet(PolicySet),
    PolicyIdReference(PolicyRef),
    PolicySetIdReference(PolicyRef),
}

fn attach_obligations_advice(
    mut outcome: EvalOutcome,
    effect: Effect,
    obligation_expressions: &[ObligationExpression],
    advice_expressions: &[AdviceExpression],
    ctx: &EvaluationContext,
) -> EvalOutcome {
    outcome.obligations.extend(
        obligation_expressions
            .iter()
            .filter(|o| o.fulfill_on == effect)
            .map(|o| Obligation {
                id: o.id.clone(),
                assignments: resolve_assignments(&o.assignments, ctx),
            }),
    );
    outcome.advice.extend(
        advice_expressions
            .iter()
            .filter(|a| a.apply_on == effect)
            .map(|a| Advice {
                id: a.id.clone(),
                assignments: resolve_assignments(&a.assignments, ctx),
            }),
    );
    outcome
}

/// Evaluate a policy per §4.5: a target mismatch is NotApplicable and
/// short-circuits rule evaluation entirely; otherwise child rule
/// decisions are folded via `rule_combining_algorithm` and the
/// policy's own obligations/advice are attached when the combined
/// result settles on a concrete effect.
#[must_use]
pub fn evaluate_policy(policy: &Policy, ctx: &mut EvaluationContext) -> EvalOutcome {
    debug!("evaluating policy {} v{}", policy.id, policy.version);
    match eval_target(&policy.target, ctx) {
        Ok(false) => return EvalOutcome::not_applicable(),
        Err(status) => {
            ctx.record_status(status);
            return EvalOutcome::indeterminate(IndeterminateKind::DP);
        }
        Ok(true) => {}
    }
    ctx.enter_policy_scope(policy.variables.clone());
    let Some(alg) = ctx.config().rule_combining_algorithms.get(&policy.rule_combining_algorithm)
    else {
        ctx.record_status(Status::processing_error(format!(
            "unknown rule combining algorithm: {}",
            policy.rule_combining_algorithm
        )));
        return EvalOutcome::indeterminate(IndeterminateKind::DP);
    };
    let combine = alg.combine;
    let mut evaluated: Vec<EvalOutcome> = Vec::new();
    let mut rules = policy.rules.iter();
    let combined = {
        let evaluated = &mut evaluated;
        let mut decisions = std::iter::from_fn(|| {
            rules.next().map(|r| {
                let outcome = evaluate_rule(r, ctx);
                let decision = outcome.decision.clone();
                evaluated.push(outcome);
                decision
            })
        });
        combine(&mut decisions)
    };
    let mut outcome = EvalOutcome {
        decision: combined.clone(),
        obligations: Vec::new(),
        advice: Vec::new(),
    };
    for o in evaluated {
        if decision_effect(&combined) == decision_effect(&o.decision) {
            outcome.obligations.extend(o.obligations);
            outcome.advice.extend(o.advice);
        }
    }
    match combined {
        Decision::Permit => {
            attach_obligations_advice(outcome, Effect::Permit, &policy.obligation_expressions, &policy.advice_expressions, ctx)
        }
        Decision::Deny => {
            attach_obligations_advice(outcome, Effect::Deny, &policy.obligation_expressions, &policy.advice_expressions, ctx)
        }
        _ => outcome,
    }
}

fn decision_effect(d: &Decision) -> Option<Effect> {
    match d {
        Decision::Permit => Some(Effect::Permit),
        Decision::Deny => Some(Effect::Deny),
        _ => None,
    }
}

/// Evaluate a policy set per §4.5: symmetric to [`evaluate_policy`],
/// combining child policy/policy-set/reference outcomes via
/// `policy_combining_algorithm`.
#[must_use]
pub fn evaluate_policy_set(
    policy_set: &PolicySet,
    ctx: &mut EvaluationContext,
    provider: &crate::provider::PolicyProvider,
) -> EvalOutcome {
    debug!("evaluating policy set {} v{}", policy_set.id, policy_set.version);
    match eval_target(&policy_set.target, ctx) {
        Ok(false) => return EvalOutcome::not_applicable(),
        Err(status) => {
            ctx.record_status(status);
            return EvalOutcome::indeterminate(IndeterminateKind::DP);
        }
        Ok(true) => {}
    }
    let Some(alg) = ctx
        .config()
        .policy_combining_algorithms
        .get(&policy_set.policy_combining_algorithm)
    else {
        ctx.record_status(Status::processing_error(format!(
            "unknown policy combining algorithm: {}",
            policy_set.policy_combining_algorithm
        )));
        return EvalOutcome::indeterminate(IndeterminateKind::DP);
    };
    let combine = alg.combine;
    let mut evaluated: Vec<EvalOutcome> = Vec::new();
    let mut entries = policy_set.entries.iter();
    let combined = {
        let evaluated = &mut evaluated;
        let mut decisions = std::iter::from_fn(|| {
            entries.next().map(|e| {
                let outcome = evaluate_entry(e, ctx, provider);
                let decision = outcome.decision.clone();
                evaluated.push(outcome);
                decision
            })
        });
        combine(&mut decisions)
    };
    let mut outcome = EvalOutcome {
        decision: combined.clone(),
        obligations: Vec::new(),
        advice: Vec::new(),
    };
    for o in evaluated {
        if decision_effect(&combined) == decision_effect(&o.decision) {
            outcome.obligations.extend(o.obligations);
            outcome.advice.extend(o.advice);
        }
    }
    match combined {
        Decision::Permit => attach_obligations_advice(
            outcome,
            Effect::Permit,
            &policy_set.obligation_expressions,
            &policy_set.advice_expressions,
            ctx,
        ),
        Decision::Deny => attach_obligations_advice(
            outcome,
            Effect::Deny,
            &policy_set.obligation_expressions,
            &policy_set.advice_expressions,
            ctx,
        ),
        _ => outcome,
    }
}

fn evaluate_entry(
    entry: &PolicySetEntry,
    ctx: &mut EvaluationContext,
    provider: &crate::provider::PolicyProvider,
) -> EvalOutcome {
    match entry {
        PolicySetEntry::Policy(p) => evaluate_policy(p, ctx),
        PolicySetEntry::PolicySet(ps) => evaluate_policy_set(ps, ctx, provider),
        PolicySetEntry::PolicyIdReference(r) => {
            evaluate_reference(r, ctx, provider, ReferenceKind::Policy)
        }
        PolicySetEntry::PolicySetIdReference(r) => {
            evaluate_reference(r, ctx, provider, ReferenceKind::PolicySet)
        }
    }
}

enum ReferenceKind {
    Policy,
    PolicySet,
}

fn evaluate_reference(
    r: &PolicyRef,
    ctx: &mut EvaluationContext,
    provider: &crate::provider::PolicyProvider,
    kind: ReferenceKind,
) -> EvalOutcome {
    let resolved = match kind {
        ReferenceKind::Policy => provider.resolve_policy(r, ctx.config()),
        ReferenceKind::PolicySet => provider.resolve_policy_set(r, ctx.config()),
    };
    let (id, version, entry) = match resolved {
        Ok(found) => found,
        Err(status) => {
            ctx.record_status(status);
            return EvalOutcome::indeterminate(IndeterminateKind::DP);
        }
    };
    if let Err(status) = ctx.enter_policy_ref(&id, version) {
        ctx.record_status(status);
        return EvalOutcome::indeterminate(IndeterminateKind::DP);
    }
    let outcome = match entry {
        PolicySetEntry::Policy(p) => evaluate_policy(&p, ctx),
        PolicySetEntry::PolicySet(ps) => evaluate_policy_set(&ps, ctx, provider),
        _ => unreachable!("provider never resolves a reference to another reference"),
    };
    ctx.leave_policy_ref();
    outcome
}
