//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! The expression tree and its evaluator.
use crate::context::EvaluationContext;
use crate::request::Category;
use crate::status::{EvalResult, Status};
use crate::value::{AttributeValue, Bag, Datatype};
use log::trace;

/// An attribute designator: a direct lookup of a categorized,
/// optionally issuer-qualified attribute by id.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDesignator {
    pub category: Category,
    pub attribute_id: String,
    pub datatype: Datatype,
    pub issuer: Option<String>,
    pub must_be_present: bool,
}

/// An attribute selector: a content-addressed lookup inside a
/// structured attribute value. Full XPath evaluation is not
/// implemented; a selector only resolves via delegation to another
/// designator named by `context_selector_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub category: Category,
    pub context_selector_id: Option<String>,
    pub datatype: Datatype,
    pub must_be_present: bool,
}

/// A node in the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Value(AttributeValue),
    Designator(AttributeDesignator),
    Selector(AttributeSelector),
    VarRef(String),
    Apply(String, Vec<Expression>),
}

/// The result of evaluating an [`Expression`]: either a scalar value
/// or a bag.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Scalar(AttributeValue),
    Bag(Bag),
}

impl ExprValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExprValue::Scalar(v) => v.as_bool(),
            ExprValue::Bag(_) => None,
        }
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<&AttributeValue> {
        match self {
            ExprValue::Scalar(v) => Some(v),
            ExprValue::Bag(_) => None,
        }
    }

    #[must_use]
    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            ExprValue::Bag(b) => Some(b),
            ExprValue::Scalar(_) => None,
        }
    }

    #[must_use]
    pub fn datatype(&self) -> Datatype {
        match self {
            ExprValue::Scalar(v) => v.datatype(),
            ExprValue::Bag(b) => b.datatype,
        }
    }
}

/// Evaluate an expression tree against a request/context, yielding
/// either a value or a `Status` describing the recoverable failure.
pub fn eval(expr: &Expression, ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    match expr {
        Expression::Value(v) => Ok(ExprValue::Scalar(v.clone())),
        Expression::Designator(d) => eval_designator(d, ctx),
        Expression::Selector(s) => eval_selector(s, ctx),
        Expression::VarRef(name) => ctx.resolve_variable(name),
        Expression::Apply(fn_uri, args) => eval_apply(fn_uri, args, ctx),
    }
}

fn eval_designator(d: &AttributeDesignator, ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    trace!("evaluating designator {}/{}", d.category, d.attribute_id);
    match ctx
        .request()
        .lookup(
            &d.category,
            &d.attribute_id,
            d.issuer.as_deref(),
            ctx.config().strict_attribute_issuer_match,
        ) {
        Some(bag) => Ok(ExprValue::Bag(bag.clone())),
        None if d.must_be_present => Err(Status::missing_attribute(format!(
            "required attribute {}/{} not present in request",
            d.category, d.attribute_id
        ))),
        None => Ok(ExprValue::Bag(Bag::empty(d.datatype))),
    }
}

fn eval_selector(s: &AttributeSelector, ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    // Full XPath-addressed content selection is out of scope; a
    // selector only resolves by delegating to the designator named by
    // `context_selector_id`, which must itself resolve to a bag of the
    // selector's datatype.
    match &s.context_selector_id {
        Some(attribute_id) => eval_designator(
            &AttributeDesignator {
                category: s.category.clone(),
                attribute_id: attribute_id.clone(),
                datatype: s.datatype,
                issuer: None,
                must_be_present: s.must_be_present,
            },
            ctx,
        ),
        None if s.must_be_present => Err(Status::missing_attribute(
            "selector has no context-selector-id and no XPath engine is configured".to_owned(),
        )),
        None => Ok(ExprValue::Bag(Bag::empty(s.datatype))),
    }
}

fn eval_apply(
    fn_uri: &str,
    args: &[Expression],
    ctx: &EvaluationContext,
) -> EvalResult<ExprValue> {
    let function = ctx
        .config()
        .standard_functions
        .get(fn_uri)
        .ok_or_else(|| Status::processing_error(format!("unknown function: {fn_uri}")))?;
    (function.eval)(args, ctx)
}
