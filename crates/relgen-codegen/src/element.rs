//! The index, key and value parts of container elements, as images see
//! them.

use relgen_core::graph::{ClassId, ContainerKind, Scalar};
use relgen_core::mapping::{Column, ContainerMapping, Element};
use relgen_core::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct Part {
    /// `index`, `key` or `value`
    pub(crate) name: &'static str,

    /// Image field prefix, e.g. `value_`
    pub(crate) var: String,

    pub(crate) kind: PartKind,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum PartKind {
    Simple(Scalar),

    /// Stored as the id of the pointed-to object
    Pointer { class: ClassId, scalar: Scalar },

    /// Stored through the composite's own image
    Composite { class: ClassId, columns: usize },
}

impl Part {
    /// Typedef naming the part in the container traits, e.g. `value_type`.
    pub(crate) fn ty(&self) -> String {
        format!("{}_type", self.name)
    }

    /// Number of columns the part binds.
    pub(crate) fn columns(&self) -> usize {
        match self.kind {
            PartKind::Composite { columns, .. } => columns,
            PartKind::Simple(_) | PartKind::Pointer { .. } => 1,
        }
    }
}

/// Parts of a data image, in column order.
pub(crate) fn data(container: &ContainerMapping) -> Result<Vec<Part>> {
    let mut parts = vec![];

    if let Some(index) = &container.index {
        parts.push(Part {
            name: "index",
            var: index.var.clone(),
            kind: PartKind::Simple(index.scalar),
        });
    }

    if let Some(key) = &container.desc.key {
        parts.push(part("key", key, &container.key)?);
    }

    parts.push(part("value", &container.desc.value, &container.value)?);
    Ok(parts)
}

/// The part a condition image keys on: the index of ordered containers,
/// the key of maps and the value of sets.
pub(crate) fn cond(container: &ContainerMapping) -> Result<Part> {
    let parts = data(container)?;

    let name = match container.desc.kind {
        ContainerKind::Ordered if container.index.is_some() => "index",
        ContainerKind::Map | ContainerKind::Multimap => "key",
        _ => "value",
    };

    parts
        .into_iter()
        .find(|part| part.name == name)
        .ok_or_else(|| Error::invariant_violation(format!("container has no {name} part")))
}

fn part(name: &'static str, element: &Element, columns: &[Column]) -> Result<Part> {
    let kind = match element {
        Element::Simple(simple) => PartKind::Simple(simple.scalar),
        Element::Pointer(pointer) => {
            let Some(column) = columns.first() else {
                return Err(Error::invariant_violation(format!(
                    "pointer {name} of container has no column"
                )));
            };
            PartKind::Pointer {
                class: pointer.class,
                scalar: column.scalar,
            }
        }
        Element::Composite(class) => PartKind::Composite {
            class: *class,
            columns: columns.len(),
        },
    };

    Ok(Part {
        name,
        var: format!("{name}_"),
        kind,
    })
}
