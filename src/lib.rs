// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

mod error;
mod expression;
mod extractor;
mod signature;
mod visitor;

#[cfg(feature = "arc")]
use alloc::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
use alloc::rc::Rc;

pub use error::{ExtractError, Result};
pub use expression::{
    CallExpression, ConstantExpression, ExprRef, InputReferenceExpression, NodeRef, Ref,
    RowExpression, Summary,
};
pub use extractor::{extract_try_expressions, extract_try_expressions_iterative, Context};
pub use signature::{Signature, Type, TRY};
pub use visitor::{accept, traverse, RowExpressionVisitor};

#[cfg(test)]
mod tests;
