use crate::{
    ast::ExpressionType,
    functions::{FilterFunction, FilterValue},
    value::Value,
};

/// `length(value)` - characters in a string, elements in an array, members
/// in an object. Nothing for anything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length;

impl FilterFunction for Length {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Value]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Value
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        let length = match args.first().and_then(FilterValue::as_value) {
            Some(Value::String(s)) => s.chars().count(),
            Some(Value::Array(arr)) => arr.len(),
            Some(Value::Object(obj)) => obj.len(),
            _ => return FilterValue::Nothing,
        };
        FilterValue::owned(Value::Integer(length as i64))
    }
}
