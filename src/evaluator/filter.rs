use std::{borrow::Cow, cmp::Ordering};

use rust_decimal::{Decimal, prelude::FromPrimitive};

use crate::{
    ast::{BinaryOperator, Expression, ExpressionType, Token},
    evaluator::{EvalContext, EvalError, resolve_query},
    functions::FilterValue,
    value::Value,
};

/// Evaluate a filter expression against the context's current node.
pub(crate) fn evaluate<'v>(
    expression: &Expression,
    context: &EvalContext<'v, '_>,
) -> Result<FilterValue<'v>, EvalError> {
    match expression {
        Expression::Null { .. } => Ok(FilterValue::owned(Value::Null)),
        Expression::Boolean { value, .. } => Ok(FilterValue::owned(Value::Boolean(*value))),
        Expression::Integer { value, .. } => Ok(FilterValue::owned(Value::Integer(*value))),
        Expression::Float { value, .. } => Ok(FilterValue::owned(Value::Float(*value))),
        Expression::String { value, .. } => Ok(FilterValue::owned(Value::String(value.clone()))),

        Expression::LogicalNot { expression, .. } => {
            let operand = evaluate(expression, context)?;
            Ok(FilterValue::logical(!operand.is_truthy()))
        }

        Expression::Infix {
            left, op, right, ..
        } => {
            // Both sides are always evaluated so function extensions see
            // every call.
            let left = evaluate(left, context)?;
            let right = evaluate(right, context)?;
            let result = match op {
                BinaryOperator::And => left.is_truthy() && right.is_truthy(),
                BinaryOperator::Or => left.is_truthy() || right.is_truthy(),
                op => compare(left, *op, right),
            };
            Ok(FilterValue::logical(result))
        }

        Expression::RelativeQuery { query, .. } => Ok(FilterValue::Nodes(resolve_query(
            query,
            context.current,
            context,
        )?)),

        Expression::RootQuery { query, .. } => Ok(FilterValue::Nodes(resolve_query(
            query,
            context.root,
            context,
        )?)),

        Expression::FunctionCall { token, name, args } => {
            call_function(token, name, args, context)
        }
    }
}

fn call_function<'v>(
    token: &Token,
    name: &str,
    args: &[Expression],
    context: &EvalContext<'v, '_>,
) -> Result<FilterValue<'v>, EvalError> {
    let function = context
        .functions
        .get(name)
        .ok_or_else(|| EvalError::UndefinedFunction {
            name: name.to_string(),
            token: token.clone(),
        })?;

    let arg_types = function.arg_types();
    let mut values = Vec::with_capacity(args.len());
    for (position, arg) in args.iter().enumerate() {
        let value = evaluate(arg, context)?;
        let value = match arg_types.get(position) {
            Some(ExpressionType::Nodes) => value,
            Some(ExpressionType::Logical) => match value {
                FilterValue::Nodes(nodes) => FilterValue::logical(!nodes.is_empty()),
                other => other,
            },
            _ => unwrap_nodes(value),
        };
        values.push(value);
    }

    let result = function.call(values);
    if function.return_type() == ExpressionType::Nodes && !matches!(result, FilterValue::Nodes(_))
    {
        return Err(EvalError::Type {
            message: format!("{}() must return a node list", name),
            token: token.clone(),
        });
    }
    Ok(result)
}

/// Replace a node list with its single value. Empty and multi-node lists
/// become Nothing.
fn unwrap_nodes(value: FilterValue<'_>) -> FilterValue<'_> {
    match value {
        FilterValue::Nodes(nodes) => match nodes.singular_value() {
            Some(value) => FilterValue::Value(Cow::Borrowed(value)),
            None => FilterValue::Nothing,
        },
        other => other,
    }
}

/// Like [`unwrap_nodes`], but a list of two or more nodes stays a list so
/// that it compares unequal to everything.
fn unwrap_singular(value: FilterValue<'_>) -> FilterValue<'_> {
    match value {
        FilterValue::Nodes(nodes) if nodes.len() <= 1 => match nodes.singular_value() {
            Some(value) => FilterValue::Value(Cow::Borrowed(value)),
            None => FilterValue::Nothing,
        },
        other => other,
    }
}

fn compare(left: FilterValue<'_>, op: BinaryOperator, right: FilterValue<'_>) -> bool {
    let left = unwrap_singular(left);
    let right = unwrap_singular(right);

    match op {
        BinaryOperator::Equal => equals(&left, &right),
        BinaryOperator::NotEqual => !equals(&left, &right),
        BinaryOperator::LessThan => less_than(&left, &right),
        BinaryOperator::GreaterThan => less_than(&right, &left),
        BinaryOperator::LessEqual => less_than(&left, &right) || equals(&left, &right),
        BinaryOperator::GreaterEqual => less_than(&right, &left) || equals(&left, &right),
        BinaryOperator::And | BinaryOperator::Or => false,
    }
}

fn equals(left: &FilterValue<'_>, right: &FilterValue<'_>) -> bool {
    match (left, right) {
        (FilterValue::Nothing, FilterValue::Nothing) => true,
        (FilterValue::Value(a), FilterValue::Value(b)) => values_equal(a, b),
        _ => false,
    }
}

fn less_than(left: &FilterValue<'_>, right: &FilterValue<'_>) -> bool {
    let (FilterValue::Value(a), FilterValue::Value(b)) = (left, right) else {
        return false;
    };
    match (a.as_ref(), b.as_ref()) {
        (Value::String(a), Value::String(b)) => a < b,
        (a, b) => compare_numbers(a, b) == Some(Ordering::Less),
    }
}

/// Deep JSON equality. Integers and floats compare by numeric value and
/// object member order is ignored.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        (a, b) => compare_numbers(a, b) == Some(Ordering::Equal),
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Integer(a), Value::Float(b)) => compare_mixed(*a, *b),
        (Value::Float(a), Value::Integer(b)) => compare_mixed(*b, *a).map(Ordering::reverse),
        _ => None,
    }
}

/// Compare an integer with a float without losing precision on large
/// integers.
fn compare_mixed(int: i64, float: f64) -> Option<Ordering> {
    match (Decimal::from_i64(int), Decimal::from_f64(float)) {
        (Some(int), Some(float)) => Some(int.cmp(&float)),
        _ => (int as f64).partial_cmp(&float),
    }
}
