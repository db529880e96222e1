// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::string::String;

/// Shape violations found on `TRY` markers.
///
/// These are never user errors: they mean the stage that produced the `TRY`
/// calls and the extractor disagree about the tree shape. Both variants are
/// reported as internal errors so a compilation pipeline can keep them apart
/// from query syntax and semantic errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("internal: try call expressions must have a single argument, found {count} in `{expr}`")]
    TryArity { count: usize, expr: String },

    #[error("internal: try call expression argument must be a call expression, found {kind} `{argument}`")]
    TryArgumentNotCall {
        kind: &'static str,
        argument: String,
    },
}

impl ExtractError {
    pub fn is_internal(&self) -> bool {
        match self {
            ExtractError::TryArity { .. } | ExtractError::TryArgumentNotCall { .. } => true,
        }
    }
}

pub type Result<T> = ::core::result::Result<T, ExtractError>;
