//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! The decision lattice: `Decision`, the extended `Indeterminate`
//! kinds, and the `Status` diagnostic attached to them.
use std::fmt;

/// Which effect(s) an `Indeterminate` result could have produced, had
/// evaluation not failed. This is XACML 3.0's "extended indeterminate",
/// and combining algorithms depend on it to decide whether a failure
/// can still be overridden by a sibling's definite result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndeterminateKind {
    /// Would have been Permit, had it not errored.
    P,
    /// Would have been Deny, had it not errored.
    D,
    /// Could have been either Permit or Deny.
    DP,
}

impl fmt::Display for IndeterminateKind {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IndeterminateKind::P => write!(f, "Indeterminate{{P}}"),
            IndeterminateKind::D => write!(f, "Indeterminate{{D}}"),
            IndeterminateKind::DP => write!(f, "Indeterminate{{DP}}"),
        }
    }
}

/// A machine-checkable status code, carried on every `Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    MissingAttribute,
    SyntaxError,
    ProcessingError,
}

/// Diagnostic detail attached to a `Decision`, particularly useful
/// when the decision is `Indeterminate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub code: StatusCode,
    pub message: Option<String>,
}

impl Status {
    #[must_use]
    pub fn ok() -> Self {
        Status {
            code: StatusCode::Ok,
            message: None,
        }
    }

    #[must_use]
    pub fn missing_attribute(message: impl Into<String>) -> Self {
        Status {
            code: StatusCode::MissingAttribute,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn processing_error(message: impl Into<String>) -> Self {
        Status {
            code: StatusCode::ProcessingError,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Status {
            code: StatusCode::SyntaxError,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for Status {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.message {
            Some(m) => write!(f, "{:?}: {m}", self.code),
            None => write!(f, "{:?}", self.code),
        }
    }
}

/// The outcome of evaluating a rule, policy, policy set, or an entire
/// request.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Permit,
    Deny,
    NotApplicable,
    Indeterminate(IndeterminateKind),
}

impl Decision {
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Decision::NotApplicable)
    }
}

impl fmt::Display for Decision {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Decision::Permit => write!(f, "Permit"),
            Decision::Deny => write!(f, "Deny"),
            Decision::NotApplicable => write!(f, "NotApplicable"),
            Decision::Indeterminate(k) => write!(f, "{k}"),
        }
    }
}

/// A fallible evaluation result: either a concrete `ExprValue`, or a
/// `Status` describing why evaluation could not produce one.
///
/// This is the value-level counterpart of `Indeterminate`: expression
/// evaluation never panics or raises an exception for a condition that
/// XACML defines as recoverable; it always produces a `Status` that the
/// caller folds into the surrounding `Decision`.
pub type EvalResult<T> = Result<T, Status>;
