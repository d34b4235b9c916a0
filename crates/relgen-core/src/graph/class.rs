use super::{Location, MemberId, NamespaceId};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    /// Uniquely identifies the class within the unit
    pub id: ClassId,

    /// Unqualified name
    pub name: String,

    /// Enclosing namespace
    pub scope: NamespaceId,

    pub location: Location,

    pub kind: ClassKind,

    /// Direct bases in declaration order
    pub bases: Vec<Inherits>,

    /// Data members in declaration order. The order determines column order.
    pub members: Vec<MemberId>,

    pub is_abstract: bool,

    /// False when the unit only sees a forward declaration
    pub complete: bool,

    /// True if the class is default constructible
    pub default_ctor: bool,

    /// Object pointer type, e.g. `std::shared_ptr< ::Person >`. Defaults to
    /// a raw pointer.
    pub object_pointer: Option<String>,

    /// Explicit table name
    pub table: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassKind {
    /// Not persistent
    Plain,

    /// Persistent object with its own table and identity
    Object,

    /// Value type flattened into the columns of its owner
    Composite,

    /// Read-only projection over one or more objects
    View(ViewAttrs),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewAttrs {
    /// Constituent objects in join order
    pub objects: Vec<ViewObject>,

    /// Optional condition appended to the view statement
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewObject {
    pub class: ClassId,

    /// Alias used in the view statement. Required for self-joins.
    pub alias: Option<String>,

    /// Join condition for every object after the first
    pub join: Option<String>,
}

/// An `inherits` edge from a class to one of its direct bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inherits {
    pub base: ClassId,
    pub is_virtual: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub usize);

impl Class {
    pub fn is_object(&self) -> bool {
        matches!(self.kind, ClassKind::Object)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, ClassKind::Composite)
    }

    pub fn is_view(&self) -> bool {
        matches!(self.kind, ClassKind::View(_))
    }

    pub fn is_plain(&self) -> bool {
        matches!(self.kind, ClassKind::Plain)
    }

    /// Objects and composites contribute their members to derived classes;
    /// plain bases are transient.
    pub fn is_persistent_base(&self) -> bool {
        self.is_object() || self.is_composite()
    }

    pub fn view(&self) -> Option<&ViewAttrs> {
        match &self.kind {
            ClassKind::View(view) => Some(view),
            _ => None,
        }
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ClassId({})", self.0)
    }
}
