use crate::{
    ast::ExpressionType,
    functions::{FilterFunction, FilterValue},
    value::Value,
};

/// `count(nodes)` - the number of nodes in a node list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl FilterFunction for Count {
    fn arg_types(&self) -> &[ExpressionType] {
        &[ExpressionType::Nodes]
    }

    fn return_type(&self) -> ExpressionType {
        ExpressionType::Value
    }

    fn call<'v>(&self, args: Vec<FilterValue<'v>>) -> FilterValue<'v> {
        match args.first() {
            Some(FilterValue::Nodes(nodes)) => FilterValue::owned(Value::Integer(nodes.len() as i64)),
            _ => FilterValue::Nothing,
        }
    }
}
