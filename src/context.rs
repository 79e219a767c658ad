//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! Per-request mutable state needed during evaluation: the request's
//! attribute bags, variable bindings and their memoized values, the
//! policy-reference visiting stack, and the accumulated status trail.
use crate::config::Config;
use crate::expr::{eval, Expression, ExprValue};
use crate::policy::PolicyVersion;
use crate::request::Request;
use crate::status::{EvalResult, Status};
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;

/// A variable definition visible to conditions/targets within the
/// policy currently being evaluated.
#[derive(Debug, Clone)]
pub struct VariableDef {
    pub id: String,
    pub expression: Expression,
}

#[derive(Debug, Default)]
struct Memo {
    /// Variables in scope for the policy currently being evaluated,
    /// and their memoized (possibly still-unevaluated) results.
    variables: HashMap<String, Expression>,
    cache: RefCell<HashMap<String, EvalResult<ExprValue>>>,
    /// Names currently being resolved, used to reject self-referential
    /// variable definitions rather than recursing forever.
    resolving: RefCell<Vec<String>>,
}

/// Per-request evaluation state.
pub struct EvaluationContext<'a> {
    config: &'a Config,
    request: &'a Request,
    memo: Memo,
    policy_ref_stack: RefCell<Vec<(String, PolicyVersion)>>,
    status_trail: RefCell<Vec<Status>>,
}

impl<'a> EvaluationContext<'a> {
    #[must_use]
    pub fn new(config: &'a Config, request: &'a Request) -> Self {
        EvaluationContext {
            config,
            request,
            memo: Memo::default(),
            policy_ref_stack: RefCell::new(Vec::new()),
            status_trail: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        self.request
    }

    pub fn record_status(&self, status: Status) {
        self.status_trail.borrow_mut().push(status);
    }

    #[must_use]
    pub fn status_trail(&self) -> Vec<Status> {
        self.status_trail.borrow().clone()
    }

    /// Replace the variable scope visible to [`Self::resolve_variable`]
    /// for the duration of evaluating one policy. Clears memoized
    /// values from any previously-scoped policy.
    pub fn enter_policy_scope(&mut self, variables: Vec<VariableDef>) {
        self.memo.variables = variables.into_iter().map(|v| (v.id, v.expression)).collect();
        self.memo.cache.borrow_mut().clear();
    }

    /// Resolve a variable by name, memoizing its evaluated value and
    /// rejecting self-referential definitions. Depth of the reference
    /// chain is bounded by `config.max_variable_ref_depth`.
    pub fn resolve_variable(&self, name: &str) -> EvalResult<ExprValue> {
        if let Some(cached) = self.memo.cache.borrow().get(name) {
            return cached.clone();
        }
        {
            let mut resolving = self.memo.resolving.borrow_mut();
            if resolving.contains(&name.to_owned()) {
                return Err(Status::processing_error(format!(
                    "cyclic variable reference involving {name}"
                )));
            }
            if resolving.len() as u32 >= self.config.max_variable_ref_depth {
                return Err(Status::processing_error(format!(
                    "variable reference depth exceeded resolving {name}"
                )));
            }
            resolving.push(name.to_owned());
        }
        let expr = self
            .memo
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| Status::processing_error(format!("undefined variable: {name}")));
        let result = expr.and_then(|e| eval(&e, self));
        self.memo.resolving.borrow_mut().pop();
        self.memo
            .cache
            .borrow_mut()
            .insert(name.to_owned(), result.clone());
        result
    }

    /// Push a policy reference onto the visiting stack, failing if it
    /// would create a cycle or exceed `max_policy_ref_depth`.
    pub fn enter_policy_ref(&self, id: &str, version: PolicyVersion) -> EvalResult<()> {
        let mut stack = self.policy_ref_stack.borrow_mut();
        if stack.iter().any(|(i, v)| i == id && *v == version) {
            return Err(Status::processing_error(format!(
                "cyclic policy reference detected: {id} v{version}"
            )));
        }
        if stack.len() as u32 >= self.config.max_policy_ref_depth {
            return Err(Status::processing_error(format!(
                "policy reference depth exceeded at {id} v{version}"
            )));
        }
        debug!("entering policy reference {id} v{version}, depth {}", stack.len() + 1);
        stack.push((id.to_owned(), version));
        Ok(())
    }

    pub fn leave_policy_ref(&self) {
        self.policy_ref_stack.borrow_mut().pop();
    }
}
