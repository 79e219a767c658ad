//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line arguments for the demonstration PDP binary.
use clap::Parser;

/// Evaluate a XACML request against a directory of policies.
///
/// This binary is a thin illustration of the library: it does not
/// parse XACML policy or request documents from XML/JSON. `--input` is
/// accepted for forward compatibility with a caller-supplied loader
/// (see [`xacml_pdp::provider::PolicyProvider::load_dir`]); today the
/// binary always evaluates its own built-in in-memory demonstration
/// policy instead of reading from `--input`.
#[derive(Parser, Debug)]
#[command(about, author, version, arg_required_else_help = true)]
pub struct CliArgs {
    /// Directory containing policy definitions to load.
    #[arg(short = 'i', long = "input")]
    pub policy_dir: Option<String>,

    /// Suffix used to recognize policy files under `--input`.
    #[arg(long = "suffix", default_value = ".policy")]
    pub suffix: String,

    /// Maximum policy reference resolution depth.
    #[arg(long = "max-policy-ref-depth", default_value_t = 10)]
    pub max_policy_ref_depth: u32,

    /// Maximum variable reference resolution depth.
    #[arg(long = "max-variable-ref-depth", default_value_t = 10)]
    pub max_variable_ref_depth: u32,

    /// Only ever consider the latest version of a referenced policy.
    #[arg(long = "ignore-old-policy-versions")]
    pub ignore_old_policy_versions: bool,

    /// Require an exact issuer match for issuer-qualified designators.
    #[arg(long = "strict-attribute-issuer-match")]
    pub strict_attribute_issuer_match: bool,

    /// Enable the non-standard on-permit-apply-second combining algorithm.
    #[arg(long = "enable-protected-combining-algorithms")]
    pub enable_protected_combining_algorithms: bool,
}
