//! Configuration records describing a state column.

use crate::StateKind;

/// A column's dtype together with the value new rows start with.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StateInit {
    Bool(bool),
    Float(f64),
    Cat(u16),
}

impl StateInit {
    pub fn kind(&self) -> StateKind {
        match self {
            StateInit::Bool(_) => StateKind::Bool,
            StateInit::Float(_) => StateKind::Float,
            StateInit::Cat(_) => StateKind::Cat,
        }
    }
}

/// A named state, as it appears in a disease configuration.
///
/// ```json
/// { "name": "hospitalised", "default": { "bool": false } }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateDef {
    pub name:    String,
    pub default: StateInit,
}

impl StateDef {
    pub fn bool(name: impl Into<String>, default: bool) -> Self {
        Self { name: name.into(), default: StateInit::Bool(default) }
    }

    pub fn float(name: impl Into<String>, default: f64) -> Self {
        Self { name: name.into(), default: StateInit::Float(default) }
    }

    pub fn cat(name: impl Into<String>, default: u16) -> Self {
        Self { name: name.into(), default: StateInit::Cat(default) }
    }

    pub fn kind(&self) -> StateKind {
        self.default.kind()
    }
}
