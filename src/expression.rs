// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::signature::{Signature, Type};
use crate::Rc;

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::{cmp, fmt, hash, ops::Deref};

use serde::{Deserialize, Deserializer};

/// Shared handle to an IR node.
///
/// Equality and hashing are by node identity, not structure: two
/// handles are equal only if they point at the same node of the same tree.
pub struct NodeRef<T> {
    r: Rc<T>,
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        Self { r: self.r.clone() }
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.r.as_ref(), f)
    }
}

impl<T: fmt::Display> fmt::Display for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.r.as_ref(), f)
    }
}

impl<T> cmp::PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.r).eq(&Rc::as_ptr(&other.r))
    }
}

impl<T> cmp::Eq for NodeRef<T> {}

impl<T> hash::Hash for NodeRef<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        hash::Hash::hash(&Rc::as_ptr(&self.r), state)
    }
}

impl<T> Deref for NodeRef<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.r
    }
}

impl<T> AsRef<T> for NodeRef<T> {
    fn as_ref(&self) -> &T {
        self.deref()
    }
}

impl<T> NodeRef<T> {
    pub fn new(t: T) -> Self {
        Self { r: Rc::new(t) }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for NodeRef<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(NodeRef::new)
    }
}

#[cfg(feature = "ast")]
impl<T: serde::Serialize> serde::Serialize for NodeRef<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(self.r.as_ref(), serializer)
    }
}

pub type Ref<T> = NodeRef<T>;
pub type ExprRef = Ref<RowExpression>;

/// Literal value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct ConstantExpression {
    pub value: serde_json::Value,
    #[serde(default)]
    pub ty: Type,
}

/// Positional reference into the input row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct InputReferenceExpression {
    pub field: usize,
    #[serde(default)]
    pub ty: Type,
}

/// Function call. `TRY` markers are calls too, told apart by signature name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub struct CallExpression {
    #[serde(flatten)]
    pub signature: Signature,
    #[serde(default)]
    pub arguments: Vec<ExprRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RowExpression {
    Constant(ConstantExpression),
    #[serde(rename = "input")]
    InputReference(InputReferenceExpression),
    Call(CallExpression),
}

impl RowExpression {
    pub fn constant(value: impl Into<serde_json::Value>, ty: Type) -> ExprRef {
        Ref::new(RowExpression::Constant(ConstantExpression {
            value: value.into(),
            ty,
        }))
    }

    pub fn input(field: usize, ty: Type) -> ExprRef {
        Ref::new(RowExpression::InputReference(InputReferenceExpression {
            field,
            ty,
        }))
    }

    pub fn call(signature: Signature, arguments: Vec<ExprRef>) -> ExprRef {
        Ref::new(RowExpression::Call(CallExpression {
            signature,
            arguments,
        }))
    }

    /// Wraps `argument` in a `TRY` marker typed after the argument.
    pub fn try_call(argument: ExprRef) -> ExprRef {
        let signature = Signature::try_signature(argument.ty());
        Self::call(signature, vec![argument])
    }

    pub fn ty(&self) -> Type {
        match self {
            RowExpression::Constant(c) => c.ty,
            RowExpression::InputReference(i) => i.ty,
            RowExpression::Call(c) => c.signature.return_type,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpression> {
        match self {
            RowExpression::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, RowExpression::Call(_))
    }

    /// Child expressions; empty for leaves.
    pub fn arguments(&self) -> &[ExprRef] {
        match self {
            RowExpression::Call(call) => &call.arguments,
            _ => &[],
        }
    }

    /// Rendering with bounded depth and width, for diagnostics. Unlike
    /// `Display`, its cost does not grow with the size of the subtree.
    pub fn summary(&self) -> Summary<'_> {
        Summary {
            expr: self,
            depth: SUMMARY_DEPTH,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RowExpression::Constant(_) => "constant",
            RowExpression::InputReference(_) => "input reference",
            RowExpression::Call(_) => "call",
        }
    }
}

impl fmt::Display for RowExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowExpression::Constant(c) => write!(f, "{}", c.value),
            RowExpression::InputReference(i) => write!(f, "#{}", i.field),
            RowExpression::Call(c) => {
                write!(f, "{}(", c.signature.name)?;
                for (idx, arg) in c.arguments.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

const SUMMARY_DEPTH: usize = 3;
const SUMMARY_ARGUMENTS: usize = 4;
const SUMMARY_CONSTANT_CHARS: usize = 32;

/// See [`RowExpression::summary`].
///
/// Calls below the depth limit render as `name(..)`, only the first few
/// arguments of a call are listed, and long constants are cut short.
pub struct Summary<'a> {
    expr: &'a RowExpression,
    depth: usize,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expr {
            RowExpression::Call(c) => {
                let name = c.signature.name();
                if c.arguments.is_empty() {
                    return write!(f, "{name}()");
                }
                if self.depth == 0 {
                    return write!(f, "{name}(..)");
                }

                write!(f, "{name}(")?;
                for (idx, arg) in c.arguments.iter().take(SUMMARY_ARGUMENTS).enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    let arg = Summary {
                        expr: arg.as_ref(),
                        depth: self.depth - 1,
                    };
                    write!(f, "{arg}")?;
                }
                let hidden = c.arguments.len().saturating_sub(SUMMARY_ARGUMENTS);
                if hidden > 0 {
                    write!(f, ", ..{hidden} more")?;
                }
                f.write_str(")")
            }
            RowExpression::Constant(c) => {
                let text = c.value.to_string();
                match text.char_indices().nth(SUMMARY_CONSTANT_CHARS) {
                    Some((end, _)) => write!(f, "{}..", text.get(..end).unwrap_or_default()),
                    None => f.write_str(&text),
                }
            }
            RowExpression::InputReference(i) => write!(f, "#{}", i.field),
        }
    }
}
