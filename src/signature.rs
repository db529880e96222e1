// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use serde::Deserialize;

/// Name the function registry gives to the fallible-with-fallback marker call.
pub const TRY: &str = "TRY";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Boolean,
    Bigint,
    Integer,
    Double,
    Varchar,
    Date,
    Timestamp,
    #[default]
    Unknown,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Boolean => "boolean",
            Type::Bigint => "bigint",
            Type::Integer => "integer",
            Type::Double => "double",
            Type::Varchar => "varchar",
            Type::Date => "date",
            Type::Timestamp => "timestamp",
            Type::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Resolved function signature attached to a call expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct Signature {
    pub name: String,
    #[serde(default)]
    pub return_type: Type,
    #[serde(default)]
    pub argument_types: Vec<Type>,
}

impl Signature {
    pub fn new(name: impl Into<String>, return_type: Type, argument_types: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            return_type,
            argument_types,
        }
    }

    /// Signature of a `TRY` wrapping an expression of type `return_type`.
    pub fn try_signature(return_type: Type) -> Self {
        Self::new(TRY, return_type, vec![return_type])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_try(&self) -> bool {
        self.name == TRY
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, ty) in self.argument_types.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        write!(f, "):{}", self.return_type)
    }
}
