// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;

use crate::expression::{
    CallExpression, ConstantExpression, ExprRef, InputReferenceExpression, RowExpression,
};

/// Per-variant callbacks over a row expression.
///
/// `accept` does the dispatch. Implementations decide for themselves whether
/// and in which order to descend into call arguments.
pub trait RowExpressionVisitor<C> {
    type Error;

    fn visit_call(
        &mut self,
        node: &ExprRef,
        call: &CallExpression,
        context: &mut C,
    ) -> core::result::Result<(), Self::Error>;

    fn visit_input_reference(
        &mut self,
        node: &ExprRef,
        input: &InputReferenceExpression,
        context: &mut C,
    ) -> core::result::Result<(), Self::Error>;

    fn visit_constant(
        &mut self,
        node: &ExprRef,
        constant: &ConstantExpression,
        context: &mut C,
    ) -> core::result::Result<(), Self::Error>;
}

pub fn accept<C, V>(
    expr: &ExprRef,
    visitor: &mut V,
    context: &mut C,
) -> core::result::Result<(), V::Error>
where
    V: RowExpressionVisitor<C> + ?Sized,
{
    match expr.as_ref() {
        RowExpression::Call(call) => visitor.visit_call(expr, call, context),
        RowExpression::InputReference(input) => visitor.visit_input_reference(expr, input, context),
        RowExpression::Constant(constant) => visitor.visit_constant(expr, constant, context),
    }
}

/// Pre-order walk. Children of a node are skipped when `f` returns `false`.
pub fn traverse(expr: &ExprRef, f: &mut dyn FnMut(&ExprRef) -> Result<bool>) -> Result<()> {
    if !f(expr)? {
        return Ok(());
    }

    match expr.as_ref() {
        RowExpression::Constant(_) | RowExpression::InputReference(_) => (),
        RowExpression::Call(call) => {
            for arg in &call.arguments {
                traverse(arg, f)?;
            }
        }
    }

    Ok(())
}
