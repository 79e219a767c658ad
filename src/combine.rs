//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! Rule- and policy-combining algorithms, keyed by URI.
use crate::status::{Decision, IndeterminateKind};
use std::collections::HashMap;
use std::fmt;

/// A combining algorithm, keyed by URI, folding an ordered sequence of
/// child decisions into one.
///
/// Children are presented as a lazily-pulled iterator rather than a
/// slice so that an algorithm which has already determined its final
/// decision (a `Deny` found by `deny-overrides`, say) can stop calling
/// `next()` and leave any remaining children unevaluated entirely.
/// This is what lets §4.4's short-circuit requirement fall out of the
/// ordinary `for`-loop-with-early-`return` control flow below, rather
/// than needing a bespoke evaluator per algorithm.
#[derive(Clone)]
pub struct CombiningAlgorithm {
    pub uri: String,
    pub combine: fn(&mut dyn Iterator<Item = Decision>) -> Decision,
}

impl fmt::Debug for CombiningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CombiningAlgorithm({})", self.uri)
    }
}

/// A registry of combining algorithms, keyed by URI. Rule-combining
/// and policy-combining algorithms use distinct registries since
/// `only-one-applicable` is defined only for policy-combining.
#[derive(Debug, Clone, Default)]
pub struct CombiningAlgorithmRegistry {
    by_uri: HashMap<String, CombiningAlgorithm>,
}

impl CombiningAlgorithmRegistry {
    #[must_use]
    pub fn new() -> Self {
        CombiningAlgorithmRegistry::default()
    }

    pub fn register(&mut self, alg: CombiningAlgorithm) {
        self.by_uri.insert(alg.uri.clone(), alg);
    }

    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&CombiningAlgorithm> {
        self.by_uri.get(uri)
    }

    pub fn merge(&mut self, other: CombiningAlgorithmRegistry) {
        self.by_uri.extend(other.by_uri);
    }
}

fn deny_overrides(children: &mut dyn Iterator<Item = Decision>) -> Decision {
    let mut saw_permit = false;
    let mut saw_indeterminate_d = false;
    let mut saw_indeterminate_p = false;
    let mut saw_indeterminate_dp = false;
    for d in children {
        match d {
            Decision::Deny => return Decision::Deny,
            Decision::Permit => saw_permit = true,
            Decision::Indeterminate(IndeterminateKind::D) => saw_indeterminate_d = true,
            Decision::Indeterminate(IndeterminateKind::P) => saw_indeterminate_p = true,
            Decision::Indeterminate(IndeterminateKind::DP) => saw_indeterminate_dp = true,
            Decision::NotApplicable => {}
        }
    }
    if saw_indeterminate_dp || (saw_indeterminate_d && (saw_permit || saw_indeterminate_p)) {
        return Decision::Indeterminate(IndeterminateKind::DP);
    }
    if saw_indeterminate_d {
        return Decision::Indeterminate(IndeterminateKind::D);
    }
    if saw_permit {
        return Decision::Permit;
    }
    if saw_indeterminate_p {
        return Decision::Indeterminate(IndeterminateKind::P);
    }
    Decision::NotApplicable
}

fn permit_overrides(children: &mut dyn Iterator<Item = Decision>) -> Decision {
    let mut saw_deny = false;
    let mut saw_indeterminate_p = false;
    let mut saw_indeterminate_d = false;
    let mut saw_indeterminate_dp = false;
    for d in children {
        match d {
            Decision::Permit => return Decision::Permit,
            Decision::Deny => saw_deny = true,
            Decision::Indeterminate(IndeterminateKind::P) => saw_indeterminate_p = true,
            Decision::Indeterminate(IndeterminateKind::D) => saw_indeterminate_d = true,
            Decision::Indeterminate(IndeterminateKind::DP) => saw_indeterminate_dp = true,
            Decision::NotApplicable => {}
        }
    }
    if saw_indeterminate_dp || (saw_indeterminate_p && (saw_deny || saw_indeterminate_d)) {
        return Decision::Indeterminate(IndeterminateKind::DP);
    }
    if saw_indeterminate_p {
        return Decision::Indeterminate(IndeterminateKind::P);
    }
    if saw_deny {
        return Decision::Deny;
    }
    if saw_indeterminate_d {
        return Decision::Indeterminate(IndeterminateKind::D);
    }
    Decision::NotApplicable
}

fn first_applicable(children: &mut dyn Iterator<Item = Decision>) -> Decision {
    for d in children {
        if d.is_applicable() {
            return d;
        }
    }
    Decision::NotApplicable
}

fn only_one_applicable(children: &mut dyn Iterator<Item = Decision>) -> Decision {
    let mut found: Option<Decision> = None;
    for d in children {
        if !d.is_applicable() {
            continue;
        }
        if found.is_some() {
            return Decision::Indeterminate(IndeterminateKind::DP);
        }
        found = Some(d);
    }
    found.unwrap_or(Decision::NotApplicable)
}

fn deny_unless_permit(children: &mut dyn Iterator<Item = Decision>) -> Decision {
    if children.any(|d| d == Decision::Permit) {
        Decision::Permit
    } else {
        Decision::Deny
    }
}

fn permit_unless_deny(children: &mut dyn Iterator<Item = Decision>) -> Decision {
    if children.any(|d| d == Decision::Deny) {
        Decision::Deny
    } else {
        Decision::Permit
    }
}

/// `on-permit-apply-second`: a non-standard policy-combining algorithm
/// from the XACML 3.0 combining-algorithms profile. The combined
/// result is the second child's decision if the first child is
/// Permit; otherwise the first child's decision. Included only in the
/// protected registry, selectable by explicit opt-in.
fn on_permit_apply_second(children: &mut dyn Iterator<Item = Decision>) -> Decision {
    match children.next() {
        Some(Decision::Permit) => children.next().unwrap_or(Decision::NotApplicable),
        Some(first) => first,
        None => Decision::NotApplicable,
    }
}

fn reg(id: &str, combine: fn(&mut dyn Iterator<Item = Decision>) -> Decision) -> CombiningAlgorithm {
    CombiningAlgorithm {
        uri: id.to_owned(),
        combine,
    }
}

/// Build the standard rule-combining algorithm registry (no
/// `only-one-applicable`, which is policy-combining only).
#[must_use]
pub fn standard_rule_combining_algorithms() -> CombiningAlgorithmRegistry {
    let mut r = CombiningAlgorithmRegistry::new();
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-overrides",
        deny_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:ordered-deny-overrides",
        deny_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:permit-overrides",
        permit_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:ordered-permit-overrides",
        permit_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:1.0:rule-combining-algorithm:first-applicable",
        first_applicable,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:deny-unless-permit",
        deny_unless_permit,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:rule-combining-algorithm:permit-unless-deny",
        permit_unless_deny,
    ));
    r
}

/// Build the standard policy-combining algorithm registry.
#[must_use]
pub fn standard_policy_combining_algorithms() -> CombiningAlgorithmRegistry {
    let mut r = CombiningAlgorithmRegistry::new();
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:deny-overrides",
        deny_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:ordered-deny-overrides",
        deny_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:permit-overrides",
        permit_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:ordered-permit-overrides",
        permit_overrides,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:first-applicable",
        first_applicable,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:1.0:policy-combining-algorithm:only-one-applicable",
        only_one_applicable,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:deny-unless-permit",
        deny_unless_permit,
    ));
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:permit-unless-deny",
        permit_unless_deny,
    ));
    r
}

/// The non-standard `on-permit-apply-second` algorithm, kept separate
/// from the default registry and merged in only when a caller opts in
/// (see [`crate::config::Config::enable_protected_combining_algorithms`]).
#[must_use]
pub fn protected_policy_combining_algorithms() -> CombiningAlgorithmRegistry {
    let mut r = CombiningAlgorithmRegistry::new();
    r.register(reg(
        "urn:oasis:names:tc:xacml:3.0:policy-combining-algorithm:on-permit-apply-second",
        on_permit_apply_second,
    ));
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_overrides_short_circuits_on_first_deny() {
        let mut pulled = 0;
        let mut children = [Decision::Deny, Decision::Permit].into_iter().inspect(|_| pulled += 1);
        assert_eq!(deny_overrides(&mut children), Decision::Deny);
        assert_eq!(pulled, 1);
    }

    #[test]
    fn deny_overrides_indeterminate_dp_beats_everything() {
        let mut children = [
            Decision::Indeterminate(IndeterminateKind::DP),
            Decision::Permit,
        ]
        .into_iter();
        assert_eq!(
            deny_overrides(&mut children),
            Decision::Indeterminate(IndeterminateKind::DP)
        );
    }

    #[test]
    fn only_one_applicable_is_indeterminate_when_two_apply() {
        let mut children = [Decision::Permit, Decision::Deny].into_iter();
        assert_eq!(
            only_one_applicable(&mut children),
            Decision::Indeterminate(IndeterminateKind::DP)
        );
    }

    #[test]
    fn first_applicable_skips_not_applicable_children() {
        let mut children = [Decision::NotApplicable, Decision::Deny].into_iter();
        assert_eq!(first_applicable(&mut children), Decision::Deny);
    }

    #[test]
    fn on_permit_apply_second_falls_through_non_permit_first_child() {
        let mut children = [Decision::Deny, Decision::Permit].into_iter();
        assert_eq!(on_permit_apply_second(&mut children), Decision::Deny);
    }
}
