//! Operator → metamethod mapping.
//!
//! The mapping is a fixed table; operators outside it are omitted from the
//! plan with an info diagnostic, never an error. `!=`, assignment, address-of
//! and arrow have no metamethod counterpart in the target runtime.

use serde::{Deserialize, Serialize};

use crate::core::ExportItem;

/// Metamethod identifiers of the target runtime's registration API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metamethod {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    EqualTo,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Index,
    Call,
}

impl Metamethod {
    /// Identifier as spelled in the registration API.
    pub fn id(&self) -> &'static str {
        match self {
            Metamethod::Addition => "addition",
            Metamethod::Subtraction => "subtraction",
            Metamethod::Multiplication => "multiplication",
            Metamethod::Division => "division",
            Metamethod::EqualTo => "equal_to",
            Metamethod::LessThan => "less_than",
            Metamethod::LessOrEqual => "less_than_or_equal_to",
            Metamethod::GreaterThan => "greater_than",
            Metamethod::GreaterOrEqual => "greater_than_or_equal_to",
            Metamethod::Index => "index",
            Metamethod::Call => "call",
        }
    }
}

/// Map an operator item to its metamethod, or `None` for unsupported
/// operators.
///
/// `-` maps only in its binary form; a member operator with zero parameters
/// is unary negation, which the table does not cover.
pub fn map_operator(item: &ExportItem) -> Option<Metamethod> {
    match item.name.as_str() {
        "+" => Some(Metamethod::Addition),
        "-" if item.parameter_types.len() == 1 => Some(Metamethod::Subtraction),
        "*" => Some(Metamethod::Multiplication),
        "/" => Some(Metamethod::Division),
        "==" => Some(Metamethod::EqualTo),
        "<" => Some(Metamethod::LessThan),
        "<=" => Some(Metamethod::LessOrEqual),
        ">" => Some(Metamethod::GreaterThan),
        ">=" => Some(Metamethod::GreaterOrEqual),
        "[]" => Some(Metamethod::Index),
        "()" => Some(Metamethod::Call),
        _ => None,
    }
}
