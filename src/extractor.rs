// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, trace};

use crate::error::{ExtractError, Result};
use crate::expression::{
    CallExpression, ConstantExpression, ExprRef, InputReferenceExpression, RowExpression,
};
use crate::visitor::{accept, RowExpressionVisitor};

/// State threaded alongside every node during extraction.
///
/// Empty for now. Per-node facts such as the depth of enclosing `TRY` markers
/// belong here so they can be added without changing the traversal signature.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Context;

/// Returns the argument of every `TRY` call in `expression`, in post-order.
///
/// A marker's argument is recorded only after its own subtree has been
/// walked, so payloads of nested markers come before the payload of the
/// marker enclosing them, and sibling markers come out left to right. The
/// returned handles point into `expression`; nothing is copied.
///
/// Fails on the first `TRY` that does not wrap exactly one call expression.
/// No partial result is returned in that case.
pub fn extract_try_expressions(expression: &ExprRef) -> Result<Vec<ExprRef>> {
    let mut try_expressions = vec![];
    collect_try_expressions(expression, &mut Context, &mut try_expressions)?;
    debug!("extracted {} try expressions", try_expressions.len());
    Ok(try_expressions)
}

/// Same output as [`extract_try_expressions`], using an explicit stack instead
/// of recursion. Meant for generated trees deep enough to exhaust the thread
/// stack.
pub fn extract_try_expressions_iterative(expression: &ExprRef) -> Result<Vec<ExprRef>> {
    enum Step {
        Enter(ExprRef, Context),
        Record(ExprRef),
    }

    let mut try_expressions = vec![];
    let mut stack = vec![Step::Enter(expression.clone(), Context)];

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node, context) => {
                let RowExpression::Call(call) = node.as_ref() else {
                    continue;
                };
                let is_try = check_try_shape(&node, call)?;
                if let (true, Some(payload)) = (is_try, call.arguments.first()) {
                    stack.push(Step::Record(payload.clone()));
                }
                for arg in call.arguments.iter().rev() {
                    stack.push(Step::Enter(arg.clone(), context));
                }
            }
            Step::Record(payload) => {
                trace!("try expression: {}", payload.summary());
                try_expressions.push(payload);
            }
        }
    }

    debug!("extracted {} try expressions", try_expressions.len());
    Ok(try_expressions)
}

/// Appends the `TRY` payloads under `expression` to `try_expressions`.
///
/// On error the accumulator may hold payloads found before the violation.
pub(crate) fn collect_try_expressions(
    expression: &ExprRef,
    context: &mut Context,
    try_expressions: &mut Vec<ExprRef>,
) -> Result<()> {
    accept(expression, &mut TryCollector { try_expressions }, context)
}

struct TryCollector<'a> {
    try_expressions: &'a mut Vec<ExprRef>,
}

impl RowExpressionVisitor<Context> for TryCollector<'_> {
    type Error = ExtractError;

    fn visit_call(
        &mut self,
        node: &ExprRef,
        call: &CallExpression,
        context: &mut Context,
    ) -> Result<()> {
        let is_try = check_try_shape(node, call)?;

        for arg in &call.arguments {
            accept(arg, self, context)?;
        }

        if let (true, Some(payload)) = (is_try, call.arguments.first()) {
            trace!("try expression: {}", payload.summary());
            self.try_expressions.push(payload.clone());
        }

        Ok(())
    }

    fn visit_input_reference(
        &mut self,
        _node: &ExprRef,
        _input: &InputReferenceExpression,
        _context: &mut Context,
    ) -> Result<()> {
        // Which input fields a payload reads is not tracked here.
        Ok(())
    }

    fn visit_constant(
        &mut self,
        _node: &ExprRef,
        _constant: &ConstantExpression,
        _context: &mut Context,
    ) -> Result<()> {
        Ok(())
    }
}

/// Returns whether `call` is a `TRY` marker, failing if it is one with the
/// wrong shape. A well-formed marker has exactly one argument, and that
/// argument is a call. Errors carry a bounded summary of the offending node.
fn check_try_shape(node: &ExprRef, call: &CallExpression) -> Result<bool> {
    if !call.signature.is_try() {
        return Ok(false);
    }

    match call.arguments.as_slice() {
        [argument] if argument.is_call() => Ok(true),
        [argument] => {
            debug!("try wraps a {}: {}", argument.kind(), node.summary());
            Err(ExtractError::TryArgumentNotCall {
                kind: argument.kind(),
                argument: argument.summary().to_string(),
            })
        }
        arguments => {
            debug!("try has {} arguments: {}", arguments.len(), node.summary());
            Err(ExtractError::TryArity {
                count: arguments.len(),
                expr: node.summary().to_string(),
            })
        }
    }
}
