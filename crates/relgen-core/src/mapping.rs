//! Column layout of every persistent class in a unit.
//!
//! The mapping is computed once, before any output is generated, and passed
//! read-only to every emitter. Facts are keyed by class and member id; asking
//! for a fact that was never computed is an invariant violation rather than a
//! silent default.

mod build;

mod kind;
pub use kind::{classify, ContainerDesc, Element, MemberKind, Pointer, Simple};

use crate::graph::{ClassId, MemberId, Scalar, Unit};
use crate::{Error, Options, Result};

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    classes: IndexMap<ClassId, ClassMapping>,
    counts: IndexMap<MemberId, ContainerCounts>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMapping {
    pub class: ClassId,

    /// Table of a concrete object
    pub table: Option<String>,

    /// Every column of the class, persistent bases first, composites
    /// flattened and pointers stored as the pointee id
    pub columns: Vec<Column>,

    /// Columns bound by `INSERT`. Database assigned ids are excluded.
    pub in_column_count: usize,

    /// Columns bound by `SELECT`
    pub out_column_count: usize,

    pub id: Option<IdMapping>,

    /// Containers anywhere in the hierarchy, in member order
    pub containers: Vec<ContainerMapping>,

    /// True if any member, nested composite or container element is an
    /// object pointer
    pub has_pointers: bool,

    pub view: Option<ViewMapping>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, composite prefixes included
    pub name: String,

    /// Image field base name, e.g. `addr_street_`
    pub var: String,

    pub member: MemberId,

    pub scalar: Scalar,

    /// Explicit SQL type
    pub sql_type: Option<String>,

    pub nullable: bool,

    pub id: bool,

    pub auto: bool,

    /// Set for columns holding the id of another object
    pub references: Option<Reference>,
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub class: ClassId,
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdMapping {
    pub member: MemberId,

    /// Class declaring the id member. Derived objects reuse its id types.
    pub root: ClassId,

    pub column: String,

    pub var: String,

    pub scalar: Scalar,

    pub auto: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerCounts {
    /// Columns bound to identify rows of the container table
    pub cond: usize,

    /// Columns bound when inserting or loading a row
    pub data: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerMapping {
    pub member: MemberId,

    /// Members leading to the container, outermost first, the container
    /// itself last
    pub path: Vec<MemberId>,

    /// Prefix of the traits struct, e.g. `addr_tags` for `addr_tags_traits`
    pub name: String,

    /// Side table. Absent for containers of composite values, whose owner
    /// object supplies the table.
    pub table: Option<String>,

    pub desc: ContainerDesc,

    /// Column referencing the owning object
    pub object_id: Option<Column>,

    pub index: Option<Column>,

    pub key: Vec<Column>,

    pub value: Vec<Column>,

    pub counts: ContainerCounts,

    /// Present for inverse containers of objects
    pub inverse: Option<InverseMapping>,
}

/// Where an inverse container is loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseMapping {
    pub table: String,

    /// Column holding the ids of the container's elements
    pub id_column: String,

    /// Column compared against the owner's id
    pub ref_column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewMapping {
    pub objects: Vec<ViewObjectMapping>,

    /// Source of each view column, parallel to `ClassMapping::columns`
    pub sources: Vec<ColumnSource>,

    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewObjectMapping {
    pub class: ClassId,
    pub table: String,

    /// Name the object goes by in the view statement
    pub alias: String,

    /// True if `alias` differs from `table`
    pub aliased: bool,

    pub join: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSource {
    pub alias: String,
    pub column: String,
}

impl Mapping {
    /// Maps every class emitted for `unit` and the classes they depend on.
    pub fn build(unit: &Unit, options: &Options) -> Result<Mapping> {
        build::Build::new(unit, options).run()
    }

    pub fn class(&self, id: ClassId) -> Result<&ClassMapping> {
        self.classes.get(&id).ok_or_else(|| {
            Error::invariant_violation(format!("class {id:?} has no computed mapping"))
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassMapping> {
        self.classes.values()
    }

    /// Column counts of a container member.
    pub fn counts(&self, member: MemberId) -> Result<ContainerCounts> {
        self.counts.get(&member).copied().ok_or_else(|| {
            Error::invariant_violation(format!(
                "container member {member:?} has no computed column counts"
            ))
        })
    }

    pub(crate) fn contains(&self, id: ClassId) -> bool {
        self.classes.contains_key(&id)
    }

    /// Records a class mapping. Recording the same mapping twice is a no-op.
    pub(crate) fn insert_class(&mut self, mapping: ClassMapping) -> Result<()> {
        match self.classes.get(&mapping.class) {
            Some(existing) if *existing == mapping => Ok(()),
            Some(_) => Err(Error::invariant_violation(format!(
                "conflicting mappings computed for class {:?}",
                mapping.class
            ))),
            None => {
                self.classes.insert(mapping.class, mapping);
                Ok(())
            }
        }
    }

    pub(crate) fn insert_counts(&mut self, member: MemberId, counts: ContainerCounts) -> Result<()> {
        match self.counts.get(&member) {
            Some(existing) if *existing == counts => Ok(()),
            Some(existing) => Err(Error::invariant_violation(format!(
                "conflicting column counts for container member {member:?}: {existing:?} and {counts:?}"
            ))),
            None => {
                self.counts.insert(member, counts);
                Ok(())
            }
        }
    }
}

impl ClassMapping {
    pub fn id_column(&self) -> Option<&Column> {
        self.columns.iter().find(|column| column.id)
    }

    /// The column a simple or pointer member maps to.
    pub fn column(&self, member: MemberId) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.member == member)
            .ok_or_else(|| {
                Error::invariant_violation(format!(
                    "member {member:?} has no column in class {:?}",
                    self.class
                ))
            })
    }

    pub fn has_containers(&self) -> bool {
        !self.containers.is_empty()
    }

    /// True if the id is assigned by the database.
    pub fn auto_id(&self) -> bool {
        self.id.as_ref().is_some_and(|id| id.auto)
    }
}

impl ContainerMapping {
    /// Name of the container traits struct.
    pub fn traits_name(&self) -> String {
        format!("{}_traits", self.name)
    }

    /// Data columns other than the object id, in image order.
    pub fn data_columns(&self) -> impl Iterator<Item = &Column> {
        self.index
            .iter()
            .chain(self.key.iter())
            .chain(self.value.iter())
    }
}
