//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! The policy provider: holds the policy graph and resolves
//! `PolicyIdReference`/`PolicySetIdReference` with version
//! constraints, plus directory-based loading of already-constructed
//! policy objects.
use crate::config::Config;
use crate::errors::PolicyError;
use crate::policy::{Policy, PolicyRef, PolicySet, PolicySetEntry, PolicyVersion};
use crate::status::Status;
use log::{info, warn};
use std::path::Path;
use walkdir::WalkDir;

fn describe_chain(chain: &[(String, PolicyVersion)], id: &str, version: &PolicyVersion) -> String {
    chain
        .iter()
        .map(|(i, v)| format!("{i} v{v}"))
        .chain(std::iter::once(format!("{id} v{version}")))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// The root of the policy graph plus every policy/policy-set reachable
/// by reference, keyed by id and version.
#[derive(Debug, Clone, Default)]
pub struct PolicyProvider {
    policies: Vec<(String, PolicyVersion, Policy)>,
    policy_sets: Vec<(String, PolicyVersion, PolicySet)>,
    root: Option<PolicySetEntry>,
}

impl PolicyProvider {
    #[must_use]
    pub fn new() -> Self {
        PolicyProvider::default()
    }

    /// Register a policy under the provider, available for reference
    /// resolution (and as a root candidate).
    ///
    /// # Errors
    /// Returns [`PolicyError::DuplicateId`] if the same id+version was
    /// already registered.
    pub fn add_policy(&mut self, policy: Policy) -> Result<(), PolicyError> {
        if self
            .policies
            .iter()
            .any(|(id, v, _)| *id == policy.id && *v == policy.version)
        {
            return Err(PolicyError::DuplicateId(format!(
                "{} v{}",
                policy.id, policy.version
            )));
        }
        self.policies
            .push((policy.id.clone(), policy.version.clone(), policy));
        Ok(())
    }

    /// # Errors
    /// Returns [`PolicyError::DuplicateId`] if the same id+version was
    /// already registered.
    pub fn add_policy_set(&mut self, policy_set: PolicySet) -> Result<(), PolicyError> {
        if self
            .policy_sets
            .iter()
            .any(|(id, v, _)| *id == policy_set.id && *v == policy_set.version)
        {
            return Err(PolicyError::DuplicateId(format!(
                "{} v{}",
                policy_set.id, policy_set.version
            )));
        }
        self.policy_sets
            .push((policy_set.id.clone(), policy_set.version.clone(), policy_set));
        Ok(())
    }

    /// Set the entry point evaluated by [`crate::pdp::Pdp::evaluate`].
    pub fn set_root(&mut self, root: PolicySetEntry) {
        self.root = Some(root);
    }

    /// # Errors
    /// Returns [`PolicyError::EmptyProvider`] if no root was configured
    /// and nothing was loaded, or [`PolicyError::AmbiguousRoot`] if no
    /// root was configured and more than one top-level object exists.
    pub fn root(&self) -> Result<&PolicySetEntry, PolicyError> {
        if let Some(r) = &self.root {
            return Ok(r);
        }
        Err(PolicyError::EmptyProvider)
    }

    /// Load a directory of caller-constructed policy/policy-set
    /// objects, one per file matching `suffix` under `dir`, via
    /// `loader`. This is the analogue of a `file://DIR/*SUFFIX`
    /// loading convention: this crate does not parse policy documents
    /// itself, so `loader` is responsible for turning file content
    /// into an already-typed [`PolicySetEntry`].
    ///
    /// If no root is configured after loading and exactly one
    /// top-level entry was loaded, that entry becomes the root;
    /// otherwise root selection is left to the caller via
    /// [`Self::set_root`].
    ///
    /// # Errors
    /// Returns [`PolicyError::DirectoryIoError`] if the directory
    /// cannot be walked, or propagates a [`PolicyError`] from `loader`
    /// or from duplicate id+version registration.
    pub fn load_dir(
        &mut self,
        dir: &Path,
        suffix: &str,
        loader: impl Fn(&Path) -> Result<PolicySetEntry, PolicyError>,
    ) -> Result<(), PolicyError> {
        let mut loaded = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| PolicyError::DirectoryIoError(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !name.ends_with(suffix) {
                continue;
            }
            info!("loading policy file {}", entry.path().display());
            let parsed = loader(entry.path())?;
            match &parsed {
                PolicySetEntry::Policy(p) => self.add_policy(p.clone())?,
                PolicySetEntry::PolicySet(ps) => self.add_policy_set(ps.clone())?,
                _ => {
                    return Err(PolicyError::Malformed(
                        "a loaded top-level file must be a Policy or PolicySet, not a reference"
                            .to_owned(),
                    ))
                }
            }
            loaded.push(parsed);
        }
        if self.root.is_none() {
            match loaded.len() {
                1 => self.root = loaded.into_iter().next(),
                0 => warn!("no policy files matching {suffix} found under {}", dir.display()),
                _ => return Err(PolicyError::AmbiguousRoot),
            }
        }
        Ok(())
    }

    /// Validate, at load time, that every `PolicySetIdReference` chain
    /// reachable from any loaded policy set (or policy reference)
    /// resolves, is acyclic, and stays within
    /// `config.max_policy_ref_depth`. This is the static
    /// policy-reference resolver's load-time contract (§4.6): a chain
    /// violation is fatal here rather than surfacing as a per-request
    /// `Indeterminate` later. [`EvaluationContext`](crate::context::EvaluationContext)'s
    /// own visiting stack remains as a second, per-request guard for
    /// any reference structure this static pass cannot see (e.g. one
    /// introduced by a caller-supplied root set after validation).
    ///
    /// # Errors
    /// Returns [`PolicyError::UnresolvedReference`] if a reference
    /// names a policy/policy-set that cannot be found,
    /// [`PolicyError::ReferenceCycle`] if a `PolicySetIdReference`
    /// chain revisits an id+version already on the chain, or
    /// [`PolicyError::ReferenceDepthExceeded`] if a chain's length
    /// exceeds `config.max_policy_ref_depth`.
    pub fn validate_references(&self, config: &Config) -> Result<(), PolicyError> {
        for (id, version, policy_set) in &self.policy_sets {
            let mut chain = vec![(id.clone(), version.clone())];
            self.validate_policy_set_refs(policy_set, config, &mut chain)?;
        }
        if let Some(PolicySetEntry::PolicySet(policy_set)) = &self.root {
            let mut chain = vec![(policy_set.id.clone(), policy_set.version.clone())];
            self.validate_policy_set_refs(policy_set, config, &mut chain)?;
        }
        Ok(())
    }

    fn validate_policy_set_refs(
        &self,
        policy_set: &PolicySet,
        config: &Config,
        chain: &mut Vec<(String, PolicyVersion)>,
    ) -> Result<(), PolicyError> {
        for entry in &policy_set.entries {
            match entry {
                PolicySetEntry::Policy(_) => {}
                PolicySetEntry::PolicyIdReference(r) => {
                    Self::select_version(&self.policies, r, config).map_err(|_| {
                        PolicyError::UnresolvedReference(format!("PolicyIdReference {}", r.id))
                    })?;
                }
                PolicySetEntry::PolicySet(child) => {
                    self.validate_policy_set_refs(child, config, chain)?;
                }
                PolicySetEntry::PolicySetIdReference(r) => {
                    let (id, version, resolved) =
                        Self::select_version(&self.policy_sets, r, config).map_err(|_| {
                            PolicyError::UnresolvedReference(format!(
                                "PolicySetIdReference {}",
                                r.id
                            ))
                        })?;
                    if chain.iter().any(|(i, v)| *i == id && *v == version) {
                        return Err(PolicyError::ReferenceCycle(describe_chain(chain, &id, &version)));
                    }
                    if chain.len() as u32 + 1 > config.max_policy_ref_depth {
                        return Err(PolicyError::ReferenceDepthExceeded(format!(
                            "{} (limit {})",
                            describe_chain(chain, &id, &version),
                            config.max_policy_ref_depth
                        )));
                    }
                    chain.push((id, version));
                    let result = self.validate_policy_set_refs(&resolved, config, chain);
                    chain.pop();
                    result?;
                }
            }
        }
        Ok(())
    }

    fn select_version<'v, V: Clone>(
        candidates: &'v [(String, PolicyVersion, V)],
        r: &PolicyRef,
        config: &Config,
    ) -> Result<(String, PolicyVersion, V), Status> {
        let mut matches: Vec<&(String, PolicyVersion, V)> =
            candidates.iter().filter(|(id, _, _)| *id == r.id).collect();
        if config.ignore_old_policy_versions {
            if let Some(max) = matches.iter().map(|(_, v, _)| v.clone()).max() {
                matches.retain(|(_, v, _)| *v == max);
            }
        }
        if let Some(exact) = &r.version {
            matches.retain(|(_, v, _)| v == exact);
        } else {
            // No exact version: a `PolicyVersionPattern` narrows the
            // candidates, and (with or without a pattern) the reference
            // resolves to the latest remaining version, never an
            // arbitrary one among several matches.
            if let Some(pattern) = &r.version_pattern {
                matches.retain(|(_, v, _)| pattern.matches(v));
            }
            if let Some(max) = matches.iter().map(|(_, v, _)| v.clone()).max() {
                matches.retain(|(_, v, _)| *v == max);
            }
        }
        match matches.len() {
            0 => Err(Status::processing_error(format!(
                "no policy/policy-set found matching reference {}",
                r.id
            ))),
            1 => {
                let (id, v, val) = matches[0];
                Ok((id.clone(), v.clone(), val.clone()))
            }
            _ => Err(Status::processing_error(format!(
                "reference to {} is ambiguous: multiple matching versions",
                r.id
            ))),
        }
    }

    /// # Errors
    /// Returns a [`Status`] if zero or more than one policy matches
    /// the reference's id/version constraint.
    pub fn resolve_policy(
        &self,
        r: &PolicyRef,
        config: &Config,
    ) -> Result<(String, PolicyVersion, PolicySetEntry), Status> {
        let (id, version, policy) = Self::select_version(&self.policies, r, config)?;
        Ok((id, version, PolicySetEntry::Policy(policy)))
    }

    /// # Errors
    /// Returns a [`Status`] if zero or more than one policy set
    /// matches the reference's id/version constraint.
    pub fn resolve_policy_set(
        &self,
        r: &PolicyRef,
        config: &Config,
    ) -> Result<(String, PolicyVersion, PolicySetEntry), Status> {
        let (id, version, policy_set) = Self::select_version(&self.policy_sets, r, config)?;
        Ok((id, version, PolicySetEntry::PolicySet(policy_set)))
    }
}
