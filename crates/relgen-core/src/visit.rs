//! Traversals over the semantic graph.
//!
//! Each capability trait has default methods that delegate to the free
//! walker function of the same name, so an implementation only overrides the
//! nodes it cares about and calls back into the walker to keep descending.
//! Per-traversal state (e.g. "has a base been emitted yet") is never kept on
//! the visitor: walkers that need it create it fresh for every invocation.

#![allow(unused_variables)]

mod members;
pub use members::{walk_members, walk_members_in, Descend, MemberCx, MembersVisitor};

use crate::graph::{Class, DataMember, Decl, Inherits, Namespace, Unit};
use crate::Result;

/// Walks namespaces and the classes they define, in declaration order.
pub trait DeclVisitor {
    fn visit_namespace(&mut self, unit: &Unit, ns: &Namespace) -> Result<()> {
        visit_namespace(self, unit, ns)
    }

    fn visit_class(&mut self, unit: &Unit, class: &Class) -> Result<()> {
        Ok(())
    }
}

/// Walks the global namespace of `unit`.
pub fn visit_unit<V>(v: &mut V, unit: &Unit) -> Result<()>
where
    V: DeclVisitor + ?Sized,
{
    v.visit_namespace(unit, unit.root())
}

pub fn visit_namespace<V>(v: &mut V, unit: &Unit, ns: &Namespace) -> Result<()>
where
    V: DeclVisitor + ?Sized,
{
    for decl in &ns.defines {
        match decl {
            Decl::Namespace(id) => v.visit_namespace(unit, unit.namespace(*id))?,
            Decl::Class(id) => v.visit_class(unit, unit.class(*id))?,
        }
    }

    Ok(())
}

/// Visits the `inherits` edges of a single class.
pub trait InheritsVisitor {
    /// Fold state for one walk, e.g. whether the first base was seen.
    type State: Default;

    fn visit_base(
        &mut self,
        unit: &Unit,
        inherits: &Inherits,
        base: &Class,
        state: &mut Self::State,
    ) -> Result<()>;
}

/// Calls `v` once per direct base of `class`, in declaration order.
///
/// Every edge is visited, transient bases and repeated bases included.
/// Returns the fold state, which starts from `State::default()` on every
/// call.
pub fn inherits<V>(v: &mut V, unit: &Unit, class: &Class) -> Result<V::State>
where
    V: InheritsVisitor + ?Sized,
{
    let mut state = V::State::default();

    for edge in &class.bases {
        v.visit_base(unit, edge, unit.class(edge.base), &mut state)?;
    }

    Ok(state)
}

/// Visits the `names` edges from a class to its own data members.
pub trait MemberVisitor {
    fn visit_member(&mut self, unit: &Unit, member: &DataMember) -> Result<()>;
}

/// Calls `v` once per data member declared directly in `class`, transient
/// members included.
pub fn names<V>(v: &mut V, unit: &Unit, class: &Class) -> Result<()>
where
    V: MemberVisitor + ?Sized,
{
    for member in unit.members_of(class) {
        v.visit_member(unit, member)?;
    }

    Ok(())
}

/// Collects `: A, B` style base clauses of the persistent bases of a class.
///
/// `render` produces the text for one base; the first clause gets the `: `
/// separator and the rest get `, `.
pub struct BaseClauses<F> {
    render: F,
}

impl<F> BaseClauses<F>
where
    F: FnMut(&Unit, &Class) -> String,
{
    pub fn new(render: F) -> Self {
        Self { render }
    }
}

impl<F> InheritsVisitor for BaseClauses<F>
where
    F: FnMut(&Unit, &Class) -> String,
{
    type State = Vec<String>;

    fn visit_base(
        &mut self,
        unit: &Unit,
        inherits: &Inherits,
        base: &Class,
        clauses: &mut Vec<String>,
    ) -> Result<()> {
        if !base.is_persistent_base() {
            return Ok(());
        }

        let sep = if clauses.is_empty() { ": " } else { ", " };
        let virtual_ = if inherits.is_virtual { "virtual " } else { "" };
        clauses.push(format!("{sep}{virtual_}{}", (self.render)(unit, base)));
        Ok(())
    }
}
