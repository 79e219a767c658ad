//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! The function registry: the catalogue of standard XACML functions,
//! keyed by URI, each with a typed signature and an evaluator.
use crate::context::EvaluationContext;
use crate::expr::{eval, ExprValue, Expression};
use crate::status::{EvalResult, Status};
use crate::value::{AttributeValue, Bag, DayTimeDuration, Datatype, YearMonthDuration};
use chrono::Months;
use std::collections::HashMap;
use std::fmt;

/// Whether an argument position expects a scalar of a given datatype,
/// a bag of a given datatype, or any number of remaining scalar
/// arguments (the variadic tail used by `string-concatenate`, `or`,
/// `and`, and `n-of`).
#[derive(Debug, Clone, PartialEq)]
pub enum ArgType {
    Scalar(Datatype),
    Bag(Datatype),
    /// A function id, used by the higher-order functions.
    Function,
    /// Any number of remaining scalar arguments of the given datatype.
    Variadic(Datatype),
}

/// A function's typed signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub id: String,
    pub arg_types: Vec<ArgType>,
    pub returns: ArgType,
}

/// A registry entry: a signature plus the closure implementing it.
///
/// The evaluator receives unevaluated argument expressions (not
/// already-evaluated values) so that short-circuiting functions
/// (`and`, `or`) and the higher-order functions (`map`, `any-of`, ...)
/// can control evaluation order and recurse back into [`crate::expr::eval`]
/// themselves.
#[derive(Clone)]
pub struct Function {
    pub signature: FunctionSignature,
    pub eval: fn(&[Expression], &EvaluationContext) -> EvalResult<ExprValue>,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Function({})", self.signature.id)
    }
}

/// The registry of available functions, keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    by_uri: HashMap<String, Function>,
}

impl FunctionRegistry {
    #[must_use]
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    pub fn register(&mut self, f: Function) {
        self.by_uri.insert(f.signature.id.clone(), f);
    }

    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&Function> {
        self.by_uri.get(uri)
    }

    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.by_uri.contains_key(uri)
    }
}

fn mk_fn(
    id: &str,
    arg_types: Vec<ArgType>,
    returns: ArgType,
    eval: fn(&[Expression], &EvaluationContext) -> EvalResult<ExprValue>,
) -> Function {
    Function {
        signature: FunctionSignature {
            id: id.to_owned(),
            arg_types,
            returns,
        },
        eval,
    }
}

fn arg_scalar(args: &[Expression], ctx: &EvaluationContext, i: usize) -> EvalResult<AttributeValue> {
    let v = eval(
        args.get(i)
            .ok_or_else(|| Status::processing_error("missing argument".to_owned()))?,
        ctx,
    )?;
    v.as_scalar()
        .cloned()
        .ok_or_else(|| Status::processing_error("expected scalar, got bag".to_owned()))
}

fn arg_bag(args: &[Expression], ctx: &EvaluationContext, i: usize) -> EvalResult<Bag> {
    let v = eval(
        args.get(i)
            .ok_or_else(|| Status::processing_error("missing argument".to_owned()))?,
        ctx,
    )?;
    v.as_bag()
        .cloned()
        .ok_or_else(|| Status::processing_error("expected bag, got scalar".to_owned()))
}

macro_rules! equal_fn {
    ($name:ident, $variant:ident) => {
        fn $name(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
            let a = arg_scalar(args, ctx, 0)?;
            let b = arg_scalar(args, ctx, 1)?;
            match (a, b) {
                (AttributeValue::$variant(x), AttributeValue::$variant(y)) => {
                    Ok(ExprValue::Scalar(AttributeValue::Boolean(x == y)))
                }
                _ => Err(Status::processing_error("type mismatch in -equal".to_owned())),
            }
        }
    };
}

equal_fn!(string_equal, String);
equal_fn!(boolean_equal, Boolean);
equal_fn!(integer_equal, Integer);
equal_fn!(anyuri_equal, AnyUri);
equal_fn!(date_equal, Date);
equal_fn!(time_equal, Time);
equal_fn!(datetime_equal, DateTime);

fn double_equal(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?;
    let b = arg_scalar(args, ctx, 1)?;
    match (a, b) {
        (AttributeValue::Double(x), AttributeValue::Double(y)) => {
            Ok(ExprValue::Scalar(AttributeValue::Boolean(x == y)))
        }
        _ => Err(Status::processing_error("type mismatch in double-equal".to_owned())),
    }
}

macro_rules! integer_arith {
    ($name:ident, $op:tt) => {
        fn $name(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
            let a = arg_scalar(args, ctx, 0)?.as_integer().ok_or_else(|| {
                Status::processing_error("expected integer".to_owned())
            })?;
            let b = arg_scalar(args, ctx, 1)?.as_integer().ok_or_else(|| {
                Status::processing_error("expected integer".to_owned())
            })?;
            Ok(ExprValue::Scalar(AttributeValue::Integer(a $op b)))
        }
    };
}

integer_arith!(integer_add, +);
integer_arith!(integer_subtract, -);
integer_arith!(integer_multiply, *);

fn integer_divide(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer".to_owned()))?;
    let b = arg_scalar(args, ctx, 1)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer".to_owned()))?;
    if b == 0 {
        return Err(Status::processing_error("integer division by zero".to_owned()));
    }
    Ok(ExprValue::Scalar(AttributeValue::Integer(a / b)))
}

fn integer_mod(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer".to_owned()))?;
    let b = arg_scalar(args, ctx, 1)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer".to_owned()))?;
    if b == 0 {
        return Err(Status::processing_error("integer mod by zero".to_owned()));
    }
    Ok(ExprValue::Scalar(AttributeValue::Integer(a % b)))
}

fn integer_abs(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::Integer(a.abs())))
}

macro_rules! double_arith {
    ($name:ident, $op:tt) => {
        fn $name(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
            let a = arg_scalar(args, ctx, 0)?.as_double().ok_or_else(|| {
                Status::processing_error("expected double".to_owned())
            })?;
            let b = arg_scalar(args, ctx, 1)?.as_double().ok_or_else(|| {
                Status::processing_error("expected double".to_owned())
            })?;
            Ok(ExprValue::Scalar(AttributeValue::Double(a $op b)))
        }
    };
}

double_arith!(double_add, +);
double_arith!(double_subtract, -);
double_arith!(double_multiply, *);
double_arith!(double_divide, /);

fn double_abs(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_double()
        .ok_or_else(|| Status::processing_error("expected double".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::Double(a.abs())))
}

fn double_round(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_double()
        .ok_or_else(|| Status::processing_error("expected double".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::Double(a.round())))
}

fn double_floor(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_double()
        .ok_or_else(|| Status::processing_error("expected double".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::Double(a.floor())))
}

fn double_to_integer(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_double()
        .ok_or_else(|| Status::processing_error("expected double".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::Integer(a as i64)))
}

fn integer_to_double(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::Double(a as f64)))
}

fn string_concatenate(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let mut out = String::new();
    for a in args {
        let v = eval(a, ctx)?;
        let s = v
            .as_scalar()
            .and_then(AttributeValue::as_str)
            .ok_or_else(|| Status::processing_error("expected string".to_owned()))?;
        out.push_str(s);
    }
    Ok(ExprValue::Scalar(AttributeValue::String(out)))
}

fn string_starts_with(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let prefix = arg_scalar(args, ctx, 0)?;
    let s = arg_scalar(args, ctx, 1)?;
    let (p, s) = (
        prefix.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        s.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    Ok(ExprValue::Scalar(AttributeValue::Boolean(s.starts_with(p))))
}

fn string_ends_with(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let suffix = arg_scalar(args, ctx, 0)?;
    let s = arg_scalar(args, ctx, 1)?;
    let (suf, s) = (
        suffix.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        s.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    Ok(ExprValue::Scalar(AttributeValue::Boolean(s.ends_with(suf))))
}

fn string_contains(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let needle = arg_scalar(args, ctx, 0)?;
    let s = arg_scalar(args, ctx, 1)?;
    let (n, s) = (
        needle.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        s.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    Ok(ExprValue::Scalar(AttributeValue::Boolean(s.contains(n))))
}

fn string_normalize_space(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let s = arg_scalar(args, ctx, 0)?;
    let s = s.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::String(s.trim().to_owned())))
}

fn string_normalize_to_lower_case(
    args: &[Expression],
    ctx: &EvaluationContext,
) -> EvalResult<ExprValue> {
    let s = arg_scalar(args, ctx, 0)?;
    let s = s.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::String(s.to_lowercase())))
}

/// XACML 3.0 `string-substring(string, begin, end)`: `end` of `-1`
/// means "to the end of the string". Indexed by character, not byte,
/// since XACML strings are `xs:string` text rather than raw bytes.
fn string_substring(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let s = arg_scalar(args, ctx, 0)?;
    let s = s.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?;
    let begin = arg_scalar(args, ctx, 1)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer begin index".to_owned()))?;
    let end = arg_scalar(args, ctx, 2)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("expected integer end index".to_owned()))?;
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len() as i64;
    if begin < 0 || begin > len {
        return Err(Status::processing_error("substring begin index out of range".to_owned()));
    }
    let end = if end == -1 { len } else { end };
    if end < begin || end > len {
        return Err(Status::processing_error("substring end index out of range".to_owned()));
    }
    let out: String = chars[begin as usize..end as usize].iter().collect();
    Ok(ExprValue::Scalar(AttributeValue::String(out)))
}

/// `and` short-circuits on the first `false`; a sibling `Indeterminate`
/// is deferred and only surfaces if no `false` is found.
fn logical_and(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let mut deferred: Option<Status> = None;
    for a in args {
        match eval(a, ctx).and_then(|v| {
            v.as_bool().ok_or_else(|| Status::processing_error("expected boolean".to_owned()))
        }) {
            Ok(false) => return Ok(ExprValue::Scalar(AttributeValue::Boolean(false))),
            Ok(true) => {}
            Err(status) => deferred.get_or_insert(status),
        };
    }
    match deferred {
        Some(status) => Err(status),
        None => Ok(ExprValue::Scalar(AttributeValue::Boolean(true))),
    }
}

/// `or` short-circuits on the first `true`; a sibling `Indeterminate`
/// is deferred and only surfaces if no `true` is found.
fn logical_or(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let mut deferred: Option<Status> = None;
    for a in args {
        match eval(a, ctx).and_then(|v| {
            v.as_bool().ok_or_else(|| Status::processing_error("expected boolean".to_owned()))
        }) {
            Ok(true) => return Ok(ExprValue::Scalar(AttributeValue::Boolean(true))),
            Ok(false) => {}
            Err(status) => deferred.get_or_insert(status),
        };
    }
    match deferred {
        Some(status) => Err(status),
        None => Ok(ExprValue::Scalar(AttributeValue::Boolean(false))),
    }
}

fn logical_not(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let b = arg_scalar(args, ctx, 0)?
        .as_bool()
        .ok_or_else(|| Status::processing_error("expected boolean".to_owned()))?;
    Ok(ExprValue::Scalar(AttributeValue::Boolean(!b)))
}

/// `n-of` short-circuits once `n` true arguments are found; a sibling
/// `Indeterminate` is deferred and only surfaces if the threshold is
/// never reached.
fn n_of(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let n = arg_scalar(args, ctx, 0)?
        .as_integer()
        .ok_or_else(|| Status::processing_error("n-of requires an integer first argument".to_owned()))?;
    let mut count = 0i64;
    let mut deferred: Option<Status> = None;
    for a in &args[1..] {
        match eval(a, ctx).and_then(|v| {
            v.as_bool().ok_or_else(|| Status::processing_error("expected boolean".to_owned()))
        }) {
            Ok(true) => {
                count += 1;
                if count >= n {
                    return Ok(ExprValue::Scalar(AttributeValue::Boolean(true)));
                }
            }
            Ok(false) => {}
            Err(status) => deferred.get_or_insert(status),
        };
    }
    match deferred {
        Some(status) => Err(status),
        None => Ok(ExprValue::Scalar(AttributeValue::Boolean(count >= n))),
    }
}

macro_rules! order_cmp {
    ($name:ident, $accessor:ident, $op:tt) => {
        fn $name(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
            let a = arg_scalar(args, ctx, 0)?.$accessor().ok_or_else(|| {
                Status::processing_error("type mismatch in ordering comparison".to_owned())
            })?;
            let b = arg_scalar(args, ctx, 1)?.$accessor().ok_or_else(|| {
                Status::processing_error("type mismatch in ordering comparison".to_owned())
            })?;
            Ok(ExprValue::Scalar(AttributeValue::Boolean(a $op b)))
        }
    };
}

order_cmp!(integer_greater_than, as_integer, >);
order_cmp!(integer_greater_than_or_equal, as_integer, >=);
order_cmp!(integer_less_than, as_integer, <);
order_cmp!(integer_less_than_or_equal, as_integer, <=);
order_cmp!(double_greater_than, as_double, >);
order_cmp!(double_greater_than_or_equal, as_double, >=);
order_cmp!(double_less_than, as_double, <);
order_cmp!(double_less_than_or_equal, as_double, <=);

order_cmp!(date_greater_than, as_date, >);
order_cmp!(date_greater_than_or_equal, as_date, >=);
order_cmp!(date_less_than, as_date, <);
order_cmp!(date_less_than_or_equal, as_date, <=);
order_cmp!(time_greater_than, as_time, >);
order_cmp!(time_greater_than_or_equal, as_time, >=);
order_cmp!(time_less_than, as_time, <);
order_cmp!(time_less_than_or_equal, as_time, <=);
order_cmp!(datetime_greater_than, as_date_time, >);
order_cmp!(datetime_greater_than_or_equal, as_date_time, >=);
order_cmp!(datetime_less_than, as_date_time, <);
order_cmp!(datetime_less_than_or_equal, as_date_time, <=);

/// `yearMonthDuration` as a signed `chrono::Months` delta.
fn signed_months(d: YearMonthDuration) -> i64 {
    if d.negative {
        -d.months
    } else {
        d.months
    }
}

/// `dayTimeDuration` as a signed `chrono::Duration`.
fn signed_seconds_duration(d: DayTimeDuration) -> chrono::Duration {
    let dur = chrono::Duration::seconds(d.seconds);
    if d.negative {
        -dur
    } else {
        dur
    }
}

fn add_months_to_date(date: chrono::NaiveDate, months: i64) -> EvalResult<chrono::NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new((-months) as u32))
    }
    .ok_or_else(|| Status::processing_error("date arithmetic overflowed".to_owned()))
}

fn add_months_to_datetime(
    dt: chrono::NaiveDateTime,
    months: i64,
) -> EvalResult<chrono::NaiveDateTime> {
    if months >= 0 {
        dt.checked_add_months(Months::new(months as u32))
    } else {
        dt.checked_sub_months(Months::new((-months) as u32))
    }
    .ok_or_else(|| Status::processing_error("dateTime arithmetic overflowed".to_owned()))
}

macro_rules! date_duration_arith {
    ($name:ident, $sign:expr) => {
        fn $name(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
            let date = arg_scalar(args, ctx, 0)?
                .as_date()
                .ok_or_else(|| Status::processing_error("expected date".to_owned()))?;
            let duration = arg_scalar(args, ctx, 1)?
                .as_year_month_duration()
                .ok_or_else(|| Status::processing_error("expected yearMonthDuration".to_owned()))?;
            let months = $sign * signed_months(duration);
            Ok(ExprValue::Scalar(AttributeValue::Date(add_months_to_date(date, months)?)))
        }
    };
}

date_duration_arith!(date_add_year_month_duration, 1);
date_duration_arith!(date_subtract_year_month_duration, -1);

macro_rules! datetime_year_month_arith {
    ($name:ident, $sign:expr) => {
        fn $name(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
            let dt = arg_scalar(args, ctx, 0)?
                .as_date_time()
                .ok_or_else(|| Status::processing_error("expected dateTime".to_owned()))?;
            let duration = arg_scalar(args, ctx, 1)?
                .as_year_month_duration()
                .ok_or_else(|| Status::processing_error("expected yearMonthDuration".to_owned()))?;
            let months = $sign * signed_months(duration);
            Ok(ExprValue::Scalar(AttributeValue::DateTime(add_months_to_datetime(dt, months)?)))
        }
    };
}

datetime_year_month_arith!(datetime_add_year_month_duration, 1);
datetime_year_month_arith!(datetime_subtract_year_month_duration, -1);

macro_rules! datetime_day_time_arith {
    ($name:ident, $sign:expr) => {
        fn $name(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
            let dt = arg_scalar(args, ctx, 0)?
                .as_date_time()
                .ok_or_else(|| Status::processing_error("expected dateTime".to_owned()))?;
            let duration = arg_scalar(args, ctx, 1)?
                .as_day_time_duration()
                .ok_or_else(|| Status::processing_error("expected dayTimeDuration".to_owned()))?;
            let delta = signed_seconds_duration(duration);
            let delta = if $sign > 0 { delta } else { -delta };
            Ok(ExprValue::Scalar(AttributeValue::DateTime(dt + delta)))
        }
    };
}

datetime_day_time_arith!(datetime_add_day_time_duration, 1);
datetime_day_time_arith!(datetime_subtract_day_time_duration, -1);

fn string_greater_than(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?;
    let b = arg_scalar(args, ctx, 1)?;
    let (a, b) = (
        a.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        b.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    Ok(ExprValue::Scalar(AttributeValue::Boolean(a > b)))
}

fn string_less_than(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let a = arg_scalar(args, ctx, 0)?;
    let b = arg_scalar(args, ctx, 1)?;
    let (a, b) = (
        a.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        b.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    Ok(ExprValue::Scalar(AttributeValue::Boolean(a < b)))
}

/// Generic per-datatype bag functions: `-bag`, `-bag-size`,
/// `-one-and-only`, `-is-in`. Rather than generating one closure per
/// datatype (as the teacher does for the ALFA function catalogue),
/// these operate directly on the datatype carried by the bag itself,
/// since a `Bag`'s values are already homogeneous.
fn bag_of_args(args: &[Expression], ctx: &EvaluationContext, datatype: Datatype) -> EvalResult<ExprValue> {
    let mut bag = Bag::empty(datatype);
    for a in args {
        let v = arg_scalar_expr(a, ctx)?;
        bag.push(v);
    }
    Ok(ExprValue::Bag(bag))
}

fn arg_scalar_expr(expr: &Expression, ctx: &EvaluationContext) -> EvalResult<AttributeValue> {
    eval(expr, ctx)?
        .as_scalar()
        .cloned()
        .ok_or_else(|| Status::processing_error("expected scalar, got bag".to_owned()))
}

fn string_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::String)
}
fn integer_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::Integer)
}
fn boolean_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::Boolean)
}
fn double_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::Double)
}
fn anyuri_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::AnyUri)
}
fn date_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::Date)
}
fn time_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::Time)
}
fn datetime_bag(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    bag_of_args(args, ctx, Datatype::DateTime)
}

fn bag_size(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let b = arg_bag(args, ctx, 0)?;
    Ok(ExprValue::Scalar(AttributeValue::Integer(b.len() as i64)))
}

fn bag_one_and_only(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let b = arg_bag(args, ctx, 0)?;
    b.one_and_only()
        .cloned()
        .map(ExprValue::Scalar)
        .ok_or_else(|| Status::processing_error("bag does not contain exactly one value".to_owned()))
}

fn bag_is_in(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let needle = arg_scalar(args, ctx, 0)?;
    let b = arg_bag(args, ctx, 1)?;
    Ok(ExprValue::Scalar(AttributeValue::Boolean(b.contains(&needle))))
}

/// `any-of(fn, bag1, scalar...)`: true iff `fn` applied to some
/// combination of one element from each bag argument (with scalar
/// arguments passed through unchanged) returns true. This crate
/// implements the two-argument form (`fn`, bag) used by the common
/// XACML profile idiom of testing predicate membership.
fn any_of(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    higher_order(args, ctx, false)
}

/// `all-of(fn, bag1, scalar...)`: true iff `fn` holds for every
/// element of the bag argument.
fn all_of(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    higher_order(args, ctx, true)
}

fn higher_order(args: &[Expression], ctx: &EvaluationContext, require_all: bool) -> EvalResult<ExprValue> {
    let fn_uri = match args.first() {
        Some(Expression::Value(AttributeValue::AnyUri(u))) => u.clone(),
        Some(Expression::Value(AttributeValue::String(u))) => u.clone(),
        _ => {
            return Err(Status::processing_error(
                "first argument to a higher-order function must name a function".to_owned(),
            ))
        }
    };
    let bag = arg_bag(args, ctx, 1)?;
    let rest: Vec<Expression> = args[2..].to_vec();
    // `any-of`/`all-of` short-circuit on the first truth value that
    // decides the result; an `Indeterminate` from one bag element is
    // deferred and only surfaces if no such value is found among the
    // others.
    let mut deferred: Option<Status> = None;
    for v in bag.iter() {
        let mut call_args = vec![Expression::Value(v.clone())];
        call_args.extend(rest.clone());
        let outcome = crate::expr::eval(&Expression::Apply(fn_uri.clone(), call_args), ctx).and_then(|result| {
            result.as_bool().ok_or_else(|| {
                Status::processing_error("higher-order predicate did not return boolean".to_owned())
            })
        });
        match outcome {
            Ok(true) if !require_all => return Ok(ExprValue::Scalar(AttributeValue::Boolean(true))),
            Ok(false) if require_all => return Ok(ExprValue::Scalar(AttributeValue::Boolean(false))),
            Ok(_) => {}
            Err(status) => deferred.get_or_insert(status),
        };
    }
    match deferred {
        Some(status) => Err(status),
        None => Ok(ExprValue::Scalar(AttributeValue::Boolean(require_all))),
    }
}

/// `map(fn, bag)`: apply `fn` to every element of `bag`, returning a
/// bag of the results.
fn map_fn(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let fn_uri = match args.first() {
        Some(Expression::Value(AttributeValue::AnyUri(u))) => u.clone(),
        Some(Expression::Value(AttributeValue::String(u))) => u.clone(),
        _ => {
            return Err(Status::processing_error(
                "first argument to map must name a function".to_owned(),
            ))
        }
    };
    let bag = arg_bag(args, ctx, 1)?;
    let mut out: Option<Bag> = None;
    for v in bag.iter() {
        let call_args = vec![Expression::Value(v.clone())];
        let result = crate::expr::eval(&Expression::Apply(fn_uri.clone(), call_args), ctx)?;
        let scalar = result
            .as_scalar()
            .cloned()
            .ok_or_else(|| Status::processing_error("map function must return a scalar".to_owned()))?;
        out.get_or_insert_with(|| Bag::empty(scalar.datatype())).push(scalar);
    }
    Ok(ExprValue::Bag(out.unwrap_or_else(|| Bag::empty(bag.datatype))))
}

/// `any-of-any(fn, bag1, bag2)`: true iff `fn` holds for at least one
/// pairing drawn from `bag1` x `bag2`.
fn any_of_any(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    two_bag_higher_order(args, ctx, Quantifier::AnyAny)
}

/// `all-of-any(fn, bag1, bag2)`: true iff every element of `bag1` is
/// matched by at least one element of `bag2`.
fn all_of_any(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    two_bag_higher_order(args, ctx, Quantifier::AllAny)
}

/// `any-of-all(fn, bag1, bag2)`: true iff at least one element of
/// `bag1` is matched by every element of `bag2`.
fn any_of_all(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    two_bag_higher_order(args, ctx, Quantifier::AnyAll)
}

/// `all-of-all(fn, bag1, bag2)`: true iff every element of `bag1` is
/// matched by every element of `bag2`.
fn all_of_all(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    two_bag_higher_order(args, ctx, Quantifier::AllAll)
}

#[derive(Clone, Copy)]
enum Quantifier {
    AnyAny,
    AllAny,
    AnyAll,
    AllAll,
}

fn two_bag_higher_order(
    args: &[Expression],
    ctx: &EvaluationContext,
    quantifier: Quantifier,
) -> EvalResult<ExprValue> {
    let fn_uri = match args.first() {
        Some(Expression::Value(AttributeValue::AnyUri(u) | AttributeValue::String(u))) => u.clone(),
        _ => {
            return Err(Status::processing_error(
                "first argument to a higher-order function must name a function".to_owned(),
            ))
        }
    };
    let bag1 = arg_bag(args, ctx, 1)?;
    let bag2 = arg_bag(args, ctx, 2)?;
    let call = |a: &AttributeValue, b: &AttributeValue| -> EvalResult<bool> {
        let call_args = vec![Expression::Value(a.clone()), Expression::Value(b.clone())];
        eval(&Expression::Apply(fn_uri.clone(), call_args), ctx)?
            .as_bool()
            .ok_or_else(|| Status::processing_error("higher-order predicate did not return boolean".to_owned()))
    };
    let result = match quantifier {
        Quantifier::AnyAny => {
            let mut any = false;
            for a in bag1.iter() {
                for b in bag2.iter() {
                    if call(a, b)? {
                        any = true;
                    }
                }
            }
            any
        }
        Quantifier::AllAny => {
            let mut all = true;
            for a in bag1.iter() {
                let mut matched = false;
                for b in bag2.iter() {
                    if call(a, b)? {
                        matched = true;
                    }
                }
                all &= matched;
            }
            all
        }
        Quantifier::AnyAll => {
            let mut any = false;
            for a in bag1.iter() {
                let mut all_for_a = true;
                for b in bag2.iter() {
                    all_for_a &= call(a, b)?;
                }
                any |= all_for_a && bag2.len() > 0;
            }
            any
        }
        Quantifier::AllAll => {
            let mut all = true;
            for a in bag1.iter() {
                for b in bag2.iter() {
                    all &= call(a, b)?;
                }
            }
            all
        }
    };
    Ok(ExprValue::Scalar(AttributeValue::Boolean(result)))
}

fn rfc822_name_match(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let pattern = arg_scalar(args, ctx, 0)?;
    let name = arg_scalar(args, ctx, 1)?;
    let (pattern, name) = (
        pattern.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        name.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    Ok(ExprValue::Scalar(AttributeValue::Boolean(rfc822_match(pattern, name))))
}

/// XACML 1.0 `rfc822Name-match`: a pattern with no `@` names a domain
/// suffix (`.example.com` matches any subdomain; `example.com` must
/// equal the domain exactly); a pattern with `@` must equal the full
/// address, case-insensitively.
fn rfc822_match(pattern: &str, name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();
    if pattern.contains('@') {
        return pattern == name;
    }
    let domain = name.split('@').nth(1).unwrap_or("");
    match pattern.strip_prefix('.') {
        Some(suffix) => domain.ends_with(suffix),
        None => domain == pattern,
    }
}

fn x500_name_match(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let pattern = arg_scalar(args, ctx, 0)?;
    let name = arg_scalar(args, ctx, 1)?;
    let (pattern, name) = (
        pattern.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        name.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    Ok(ExprValue::Scalar(AttributeValue::Boolean(x500_match(pattern, name))))
}

/// XACML 1.0 `x500Name-match`: `pattern` matches `name` iff `pattern`'s
/// RDN sequence is a trailing subsequence of `name`'s, comparing from
/// the root (rightmost, least-specific RDN) inward.
fn x500_match(pattern: &str, name: &str) -> bool {
    let mut p: Vec<&str> = pattern.split(',').map(str::trim).collect();
    let mut n: Vec<&str> = name.split(',').map(str::trim).collect();
    p.reverse();
    n.reverse();
    if p.len() > n.len() {
        return false;
    }
    p.iter().zip(n.iter()).all(|(a, b)| a.eq_ignore_ascii_case(b))
}

fn string_regexp_match(args: &[Expression], ctx: &EvaluationContext) -> EvalResult<ExprValue> {
    let pattern = arg_scalar(args, ctx, 0)?;
    let s = arg_scalar(args, ctx, 1)?;
    let (pattern, s) = (
        pattern.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
        s.as_str().ok_or_else(|| Status::processing_error("expected string".to_owned()))?,
    );
    let re = regex::Regex::new(pattern)
        .map_err(|e| Status::syntax_error(format!("invalid regexp pattern: {e}")))?;
    Ok(ExprValue::Scalar(AttributeValue::Boolean(re.is_match(s))))
}

/// Build the full standard XACML 3.0 function catalogue.
#[must_use]
pub fn standard_functions() -> FunctionRegistry {
    let mut r = FunctionRegistry::new();
    let b = |dt: Datatype| ArgType::Scalar(dt);
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-equal",
        vec![b(Datatype::String), b(Datatype::String)],
        b(Datatype::Boolean),
        string_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:boolean-equal",
        vec![b(Datatype::Boolean), b(Datatype::Boolean)],
        b(Datatype::Boolean),
        boolean_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-equal",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Boolean),
        integer_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-equal",
        vec![b(Datatype::Double), b(Datatype::Double)],
        b(Datatype::Boolean),
        double_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:anyURI-equal",
        vec![b(Datatype::AnyUri), b(Datatype::AnyUri)],
        b(Datatype::Boolean),
        anyuri_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:date-equal",
        vec![b(Datatype::Date), b(Datatype::Date)],
        b(Datatype::Boolean),
        date_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:time-equal",
        vec![b(Datatype::Time), b(Datatype::Time)],
        b(Datatype::Boolean),
        time_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:dateTime-equal",
        vec![b(Datatype::DateTime), b(Datatype::DateTime)],
        b(Datatype::Boolean),
        datetime_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-add",
        vec![ArgType::Variadic(Datatype::Integer)],
        b(Datatype::Integer),
        integer_add,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-subtract",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Integer),
        integer_subtract,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-multiply",
        vec![ArgType::Variadic(Datatype::Integer)],
        b(Datatype::Integer),
        integer_multiply,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-divide",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Integer),
        integer_divide,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-mod",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Integer),
        integer_mod,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-abs",
        vec![b(Datatype::Integer)],
        b(Datatype::Integer),
        integer_abs,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-add",
        vec![ArgType::Variadic(Datatype::Double)],
        b(Datatype::Double),
        double_add,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-subtract",
        vec![b(Datatype::Double), b(Datatype::Double)],
        b(Datatype::Double),
        double_subtract,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-multiply",
        vec![ArgType::Variadic(Datatype::Double)],
        b(Datatype::Double),
        double_multiply,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-divide",
        vec![b(Datatype::Double), b(Datatype::Double)],
        b(Datatype::Double),
        double_divide,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-abs",
        vec![b(Datatype::Double)],
        b(Datatype::Double),
        double_abs,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:round",
        vec![b(Datatype::Double)],
        b(Datatype::Double),
        double_round,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:floor",
        vec![b(Datatype::Double)],
        b(Datatype::Double),
        double_floor,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-to-integer",
        vec![b(Datatype::Double)],
        b(Datatype::Integer),
        double_to_integer,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-to-double",
        vec![b(Datatype::Integer)],
        b(Datatype::Double),
        integer_to_double,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-concatenate",
        vec![ArgType::Variadic(Datatype::String)],
        b(Datatype::String),
        string_concatenate,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:string-starts-with",
        vec![b(Datatype::String), b(Datatype::String)],
        b(Datatype::Boolean),
        string_starts_with,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:string-ends-with",
        vec![b(Datatype::String), b(Datatype::String)],
        b(Datatype::Boolean),
        string_ends_with,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:string-contains",
        vec![b(Datatype::String), b(Datatype::String)],
        b(Datatype::Boolean),
        string_contains,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:string-substring",
        vec![b(Datatype::String), b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::String),
        string_substring,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-normalize-space",
        vec![b(Datatype::String)],
        b(Datatype::String),
        string_normalize_space,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-normalize-to-lower-case",
        vec![b(Datatype::String)],
        b(Datatype::String),
        string_normalize_to_lower_case,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:or",
        vec![ArgType::Variadic(Datatype::Boolean)],
        b(Datatype::Boolean),
        logical_or,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:and",
        vec![ArgType::Variadic(Datatype::Boolean)],
        b(Datatype::Boolean),
        logical_and,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:not",
        vec![b(Datatype::Boolean)],
        b(Datatype::Boolean),
        logical_not,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:n-of",
        vec![b(Datatype::Integer), ArgType::Variadic(Datatype::Boolean)],
        b(Datatype::Boolean),
        n_of,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-greater-than",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Boolean),
        integer_greater_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-greater-than-or-equal",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Boolean),
        integer_greater_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-less-than",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Boolean),
        integer_less_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-less-than-or-equal",
        vec![b(Datatype::Integer), b(Datatype::Integer)],
        b(Datatype::Boolean),
        integer_less_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-greater-than",
        vec![b(Datatype::Double), b(Datatype::Double)],
        b(Datatype::Boolean),
        double_greater_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-greater-than-or-equal",
        vec![b(Datatype::Double), b(Datatype::Double)],
        b(Datatype::Boolean),
        double_greater_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-less-than",
        vec![b(Datatype::Double), b(Datatype::Double)],
        b(Datatype::Boolean),
        double_less_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-less-than-or-equal",
        vec![b(Datatype::Double), b(Datatype::Double)],
        b(Datatype::Boolean),
        double_less_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-greater-than",
        vec![b(Datatype::String), b(Datatype::String)],
        b(Datatype::Boolean),
        string_greater_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-less-than",
        vec![b(Datatype::String), b(Datatype::String)],
        b(Datatype::Boolean),
        string_less_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:date-greater-than",
        vec![b(Datatype::Date), b(Datatype::Date)],
        b(Datatype::Boolean),
        date_greater_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:date-greater-than-or-equal",
        vec![b(Datatype::Date), b(Datatype::Date)],
        b(Datatype::Boolean),
        date_greater_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:date-less-than",
        vec![b(Datatype::Date), b(Datatype::Date)],
        b(Datatype::Boolean),
        date_less_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:date-less-than-or-equal",
        vec![b(Datatype::Date), b(Datatype::Date)],
        b(Datatype::Boolean),
        date_less_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:time-greater-than",
        vec![b(Datatype::Time), b(Datatype::Time)],
        b(Datatype::Boolean),
        time_greater_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:time-greater-than-or-equal",
        vec![b(Datatype::Time), b(Datatype::Time)],
        b(Datatype::Boolean),
        time_greater_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:time-less-than",
        vec![b(Datatype::Time), b(Datatype::Time)],
        b(Datatype::Boolean),
        time_less_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:time-less-than-or-equal",
        vec![b(Datatype::Time), b(Datatype::Time)],
        b(Datatype::Boolean),
        time_less_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:dateTime-greater-than",
        vec![b(Datatype::DateTime), b(Datatype::DateTime)],
        b(Datatype::Boolean),
        datetime_greater_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:dateTime-greater-than-or-equal",
        vec![b(Datatype::DateTime), b(Datatype::DateTime)],
        b(Datatype::Boolean),
        datetime_greater_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:dateTime-less-than",
        vec![b(Datatype::DateTime), b(Datatype::DateTime)],
        b(Datatype::Boolean),
        datetime_less_than,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:dateTime-less-than-or-equal",
        vec![b(Datatype::DateTime), b(Datatype::DateTime)],
        b(Datatype::Boolean),
        datetime_less_than_or_equal,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:date-add-yearMonthDuration",
        vec![b(Datatype::Date), b(Datatype::YearMonthDuration)],
        b(Datatype::Date),
        date_add_year_month_duration,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:date-subtract-yearMonthDuration",
        vec![b(Datatype::Date), b(Datatype::YearMonthDuration)],
        b(Datatype::Date),
        date_subtract_year_month_duration,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:dateTime-add-yearMonthDuration",
        vec![b(Datatype::DateTime), b(Datatype::YearMonthDuration)],
        b(Datatype::DateTime),
        datetime_add_year_month_duration,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:dateTime-subtract-yearMonthDuration",
        vec![b(Datatype::DateTime), b(Datatype::YearMonthDuration)],
        b(Datatype::DateTime),
        datetime_subtract_year_month_duration,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:dateTime-add-dayTimeDuration",
        vec![b(Datatype::DateTime), b(Datatype::DayTimeDuration)],
        b(Datatype::DateTime),
        datetime_add_day_time_duration,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:dateTime-subtract-dayTimeDuration",
        vec![b(Datatype::DateTime), b(Datatype::DayTimeDuration)],
        b(Datatype::DateTime),
        datetime_subtract_day_time_duration,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-bag",
        vec![ArgType::Variadic(Datatype::String)],
        ArgType::Bag(Datatype::String),
        string_bag,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:integer-bag",
        vec![ArgType::Variadic(Datatype::Integer)],
        ArgType::Bag(Datatype::Integer),
        integer_bag,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:boolean-bag",
        vec![ArgType::Variadic(Datatype::Boolean)],
        ArgType::Bag(Datatype::Boolean),
        boolean_bag,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:double-bag",
        vec![ArgType::Variadic(Datatype::Double)],
        ArgType::Bag(Datatype::Double),
        double_bag,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:anyURI-bag",
        vec![ArgType::Variadic(Datatype::AnyUri)],
        ArgType::Bag(Datatype::AnyUri),
        anyuri_bag,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:date-bag",
        vec![ArgType::Variadic(Datatype::Date)],
        ArgType::Bag(Datatype::Date),
        date_bag,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:time-bag",
        vec![ArgType::Variadic(Datatype::Time)],
        ArgType::Bag(Datatype::Time),
        time_bag,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:dateTime-bag",
        vec![ArgType::Variadic(Datatype::DateTime)],
        ArgType::Bag(Datatype::DateTime),
        datetime_bag,
    ));
    for (uri_prefix, datatype) in [
        ("string", Datatype::String),
        ("integer", Datatype::Integer),
        ("boolean", Datatype::Boolean),
        ("double", Datatype::Double),
        ("anyURI", Datatype::AnyUri),
        ("date", Datatype::Date),
        ("time", Datatype::Time),
        ("dateTime", Datatype::DateTime),
    ] {
        r.register(mk_fn(
            &format!("urn:oasis:names:tc:xacml:1.0:function:{uri_prefix}-bag-size"),
            vec![ArgType::Bag(datatype)],
            b(Datatype::Integer),
            bag_size,
        ));
        r.register(mk_fn(
            &format!("urn:oasis:names:tc:xacml:1.0:function:{uri_prefix}-one-and-only"),
            vec![ArgType::Bag(datatype)],
            b(datatype),
            bag_one_and_only,
        ));
        r.register(mk_fn(
            &format!("urn:oasis:names:tc:xacml:1.0:function:{uri_prefix}-is-in"),
            vec![b(datatype), ArgType::Bag(datatype)],
            b(Datatype::Boolean),
            bag_is_in,
        ));
    }
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:any-of",
        vec![ArgType::Function, ArgType::Bag(Datatype::String)],
        b(Datatype::Boolean),
        any_of,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:all-of",
        vec![ArgType::Function, ArgType::Bag(Datatype::String)],
        b(Datatype::Boolean),
        all_of,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:map",
        vec![ArgType::Function, ArgType::Bag(Datatype::String)],
        ArgType::Bag(Datatype::String),
        map_fn,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:any-of-any",
        vec![ArgType::Function, ArgType::Bag(Datatype::String), ArgType::Bag(Datatype::String)],
        b(Datatype::Boolean),
        any_of_any,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:all-of-any",
        vec![ArgType::Function, ArgType::Bag(Datatype::String), ArgType::Bag(Datatype::String)],
        b(Datatype::Boolean),
        all_of_any,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:any-of-all",
        vec![ArgType::Function, ArgType::Bag(Datatype::String), ArgType::Bag(Datatype::String)],
        b(Datatype::Boolean),
        any_of_all,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:3.0:function:all-of-all",
        vec![ArgType::Function, ArgType::Bag(Datatype::String), ArgType::Bag(Datatype::String)],
        b(Datatype::Boolean),
        all_of_all,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:rfc822Name-match",
        vec![b(Datatype::String), b(Datatype::Rfc822Name)],
        b(Datatype::Boolean),
        rfc822_name_match,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:x500Name-match",
        vec![b(Datatype::X500Name), b(Datatype::X500Name)],
        b(Datatype::Boolean),
        x500_name_match,
    ));
    r.register(mk_fn(
        "urn:oasis:names:tc:xacml:1.0:function:string-regexp-match",
        vec![b(Datatype::String), b(Datatype::String)],
        b(Datatype::Boolean),
        string_regexp_match,
    ));
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc822_match_accepts_exact_and_subdomain_patterns() {
        assert!(rfc822_match("anderson@sun.com", "Anderson@sun.com"));
        assert!(rfc822_match(".sun.com", "anderson@east.sun.com"));
        assert!(rfc822_match("sun.com", "anderson@sun.com"));
        assert!(!rfc822_match("sun.com", "anderson@east.sun.com"));
    }

    #[test]
    fn x500_match_compares_from_the_root_rdn_inward() {
        assert!(x500_match("o=Sun,c=US", "cn=Alice,o=Sun,c=US"));
        assert!(!x500_match("cn=Alice", "cn=Alice,o=Sun,c=US"));
        assert!(!x500_match("o=Sun,c=US,cn=Alice", "cn=Alice,o=Sun,c=US"));
    }
}
