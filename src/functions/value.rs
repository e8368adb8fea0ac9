use std::borrow::Cow;

use crate::{
    ast::ExpressionType,
    functions::{FilterFunction, FilterValue},
};

/// `value(nodes)` - the value of a single-node list, Nothing otherwise.
///
/// Named `ValueOf` to keep clear of [`crate::Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueOf;

impl FilterFunction for ValueOf {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Nodes]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Value
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        match args.first() {
            Some(FilterValue::Nodes(nodes)) => match nodes.singular_value() {
                Some(value) => FilterValue::Value(Cow::Borrowed(value)),
                None => FilterValue::Nothing,
            },
            _ => FilterValue::Nothing,
        }
    }
}
