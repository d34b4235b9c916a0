use super::ClassId;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub id: NamespaceId,

    /// Empty for the global namespace
    pub name: String,

    /// `None` only for the global namespace
    pub parent: Option<NamespaceId>,

    /// Nested namespaces and classes, in declaration order
    pub defines: Vec<Decl>,
}

/// A declaration reachable through a namespace's `defines` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decl {
    Namespace(NamespaceId),
    Class(ClassId),
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NamespaceId(pub usize);

impl fmt::Debug for NamespaceId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "NamespaceId({})", self.0)
    }
}
