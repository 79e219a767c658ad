//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration knobs governing PDP construction and evaluation.
use crate::combine::{
    protected_policy_combining_algorithms, standard_policy_combining_algorithms,
    standard_rule_combining_algorithms, CombiningAlgorithmRegistry,
};
use crate::errors::PolicyError;
use crate::function::{standard_functions, FunctionRegistry};

/// Configuration for a [`crate::pdp::Pdp`].
///
/// Mirrors the configuration/state split familiar from a conversion
/// context: a validated, immutable bundle built once and shared across
/// every request the PDP subsequently evaluates.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bound on variable-reference resolution depth, guarding against
    /// runaway or mutually-recursive variable definitions.
    pub max_variable_ref_depth: u32,
    /// Bound on policy-reference resolution depth, independent of
    /// cycle detection (an acyclic but very deep graph is still
    /// rejected once this bound is exceeded).
    pub max_policy_ref_depth: u32,
    /// When true, a policy reference with no explicit version always
    /// resolves to the single latest version on record, never
    /// considering older versions as candidates at all.
    pub ignore_old_policy_versions: bool,
    /// When true, an issuer-qualified attribute designator only
    /// matches request attributes asserted by the same issuer. When
    /// false (the XACML default), a failed issuer-qualified lookup
    /// falls back to an issuer-less lookup of the same attribute.
    pub strict_attribute_issuer_match: bool,
    pub standard_functions: FunctionRegistry,
    pub rule_combining_algorithms: CombiningAlgorithmRegistry,
    pub policy_combining_algorithms: CombiningAlgorithmRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_variable_ref_depth: 10,
            max_policy_ref_depth: 10,
            ignore_old_policy_versions: false,
            strict_attribute_issuer_match: false,
            standard_functions: standard_functions(),
            rule_combining_algorithms: standard_rule_combining_algorithms(),
            policy_combining_algorithms: standard_policy_combining_algorithms(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.max_variable_ref_depth == 0 {
            return Err(PolicyError::InvalidConfig(
                "max_variable_ref_depth must be at least 1".to_owned(),
            ));
        }
        if self.max_policy_ref_depth == 0 {
            return Err(PolicyError::InvalidConfig(
                "max_policy_ref_depth must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`Config`], mirroring the fluent construction style used
/// elsewhere in this crate's CLI argument handling.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: OptionalConfig,
}

#[derive(Debug, Clone, Default)]
struct OptionalConfig {
    max_variable_ref_depth: Option<u32>,
    max_policy_ref_depth: Option<u32>,
    ignore_old_policy_versions: Option<bool>,
    strict_attribute_issuer_match: Option<bool>,
    enable_protected_combining_algorithms: bool,
}

impl ConfigBuilder {
    #[must_use]
    pub fn max_variable_ref_depth(mut self, v: u32) -> Self {
        self.config.max_variable_ref_depth = Some(v);
        self
    }

    #[must_use]
    pub fn max_policy_ref_depth(mut self, v: u32) -> Self {
        self.config.max_policy_ref_depth = Some(v);
        self
    }

    #[must_use]
    pub fn ignore_old_policy_versions(mut self, v: bool) -> Self {
        self.config.ignore_old_policy_versions = Some(v);
        self
    }

    #[must_use]
    pub fn strict_attribute_issuer_match(mut self, v: bool) -> Self {
        self.config.strict_attribute_issuer_match = Some(v);
        self
    }

    /// Enable the non-standard `on-permit-apply-second` policy
    /// combining algorithm alongside the standard catalogue.
    #[must_use]
    pub fn enable_protected_combining_algorithms(mut self) -> Self {
        self.config.enable_protected_combining_algorithms = true;
        self
    }

    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfig`] if any numeric knob is
    /// set to an invalid value (e.g. a zero depth bound).
    pub fn build(self) -> Result<Config, PolicyError> {
        let default = Config::default();
        let mut policy_combining_algorithms = default.policy_combining_algorithms;
        if self.config.enable_protected_combining_algorithms {
            policy_combining_algorithms.merge(protected_policy_combining_algorithms());
        }
        let config = Config {
            max_variable_ref_depth: self
                .config
                .max_variable_ref_depth
                .unwrap_or(default.max_variable_ref_depth),
            max_policy_ref_depth: self
                .config
                .max_policy_ref_depth
                .unwrap_or(default.max_policy_ref_depth),
            ignore_old_policy_versions: self
                .config
                .ignore_old_policy_versions
                .unwrap_or(default.ignore_old_policy_versions),
            strict_attribute_issuer_match: self
                .config
                .strict_attribute_issuer_match
                .unwrap_or(default.strict_attribute_issuer_match),
            standard_functions: default.standard_functions,
            rule_combining_algorithms: default.rule_combining_algorithms,
            policy_combining_algorithms,
        };
        config.validate()?;
        Ok(config)
    }
}
