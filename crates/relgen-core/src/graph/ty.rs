use super::{ClassId, Unit};
use crate::{Error, Result};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Type {
    pub id: TypeId,

    /// Fully qualified spelling, e.g. `::std::vector< ::std::string >`
    pub name: String,

    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    /// A type bound to a single column
    Fundamental(Scalar),

    /// A class type. Persistent only when the class is a composite value.
    Class(ClassId),

    /// Pointer to a persistent object
    Pointer(ClassId),

    /// Smart wrapper such as `odb::nullable<T>`
    Wrapper { wrapped: TypeId, null: bool },

    Container(Container),
}

/// Scalar value categories that can be bound to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    String,
    Blob,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub kind: ContainerKind,

    pub value: TypeId,

    /// Index type, ordered containers only
    pub index: Option<TypeId>,

    /// Key type, map containers only
    pub key: Option<TypeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    Ordered,
    Set,
    Multiset,
    Map,
    Multimap,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub usize);

impl Scalar {
    /// True for values whose image buffer may need to grow after a read.
    pub fn is_variable_length(self) -> bool {
        matches!(self, Scalar::String | Scalar::Blob)
    }
}

impl Container {
    pub fn ordered(index: TypeId, value: TypeId) -> Container {
        Container {
            kind: ContainerKind::Ordered,
            value,
            index: Some(index),
            key: None,
        }
    }

    pub fn set(value: TypeId) -> Container {
        Container {
            kind: ContainerKind::Set,
            value,
            index: None,
            key: None,
        }
    }

    pub fn multiset(value: TypeId) -> Container {
        Container {
            kind: ContainerKind::Multiset,
            ..Container::set(value)
        }
    }

    pub fn map(key: TypeId, value: TypeId) -> Container {
        Container {
            kind: ContainerKind::Map,
            value,
            index: None,
            key: Some(key),
        }
    }

    pub fn multimap(key: TypeId, value: TypeId) -> Container {
        Container {
            kind: ContainerKind::Multimap,
            ..Container::map(key, value)
        }
    }
}

impl ContainerKind {
    pub fn is_map(self) -> bool {
        matches!(self, ContainerKind::Map | ContainerKind::Multimap)
    }
}

impl Type {
    pub fn container(&self) -> Option<&Container> {
        match &self.kind {
            TypeKind::Container(container) => Some(container),
            _ => None,
        }
    }

    pub(super) fn verify(&self, unit: &Unit) -> Result<()> {
        let in_range = |id: TypeId| {
            if id.0 < unit.types.len() {
                Ok(())
            } else {
                Err(Error::invariant_violation(format!(
                    "type `{}` refers to type id {} which is out of range",
                    self.name, id.0
                )))
            }
        };

        match &self.kind {
            TypeKind::Fundamental(_) => Ok(()),
            TypeKind::Class(class) | TypeKind::Pointer(class) => {
                if class.0 < unit.classes.len() {
                    Ok(())
                } else {
                    Err(Error::invariant_violation(format!(
                        "type `{}` refers to class id {} which is out of range",
                        self.name, class.0
                    )))
                }
            }
            TypeKind::Wrapper { wrapped, .. } => {
                in_range(*wrapped)?;
                if *wrapped == self.id {
                    return Err(Error::invariant_violation(format!(
                        "wrapper type `{}` wraps itself",
                        self.name
                    )));
                }
                Ok(())
            }
            TypeKind::Container(container) => {
                in_range(container.value)?;

                let shape_ok = match container.kind {
                    ContainerKind::Ordered => container.index.is_some() && container.key.is_none(),
                    ContainerKind::Map | ContainerKind::Multimap => {
                        container.key.is_some() && container.index.is_none()
                    }
                    ContainerKind::Set | ContainerKind::Multiset => {
                        container.index.is_none() && container.key.is_none()
                    }
                };

                if !shape_ok {
                    return Err(Error::invariant_violation(format!(
                        "container type `{}` has index/key types inconsistent with its {:?} kind",
                        self.name, container.kind
                    )));
                }

                if let Some(index) = container.index {
                    in_range(index)?;
                }
                if let Some(key) = container.key {
                    in_range(key)?;
                }

                Ok(())
            }
        }
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "TypeId({})", self.0)
    }
}
