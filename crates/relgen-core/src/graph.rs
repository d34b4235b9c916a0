//! Semantic graph of one translation unit.
//!
//! The graph is produced by an external front end (or deserialized from
//! JSON) and is read-only for the rest of the generator. Nodes live in
//! arenas on [`Unit`] and reference each other through copyable ids.

mod builder;
pub use builder::{Builder, ClassBuilder, MemberBuilder};

mod class;
pub use class::{Class, ClassId, ClassKind, Inherits, ViewAttrs, ViewObject};

mod location;
pub use location::Location;

mod member;
pub use member::{DataMember, MemberId};

mod namespace;
pub use namespace::{Decl, Namespace, NamespaceId};

mod ty;
pub use ty::{Container, ContainerKind, Scalar, Type, TypeId, TypeKind};

use crate::{Error, Result};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Path of the primary file. Only classes declared in this file are
    /// emitted.
    pub file: String,

    pub namespaces: Vec<Namespace>,

    pub classes: Vec<Class>,

    pub members: Vec<DataMember>,

    pub types: Vec<Type>,
}

impl Unit {
    pub fn builder(file: impl Into<String>) -> Builder {
        Builder::new(file.into())
    }

    /// The global namespace
    pub fn root(&self) -> &Namespace {
        &self.namespaces[0]
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0]
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0]
    }

    pub fn member(&self, id: MemberId) -> &DataMember {
        &self.members[id.0]
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.0]
    }

    /// Direct data members of `class` in declaration order.
    pub fn members_of<'a>(
        &'a self,
        class: &'a Class,
    ) -> impl Iterator<Item = &'a DataMember> + 'a {
        class.members.iter().map(|id| self.member(*id))
    }

    /// Direct bases of `class` in declaration order, transient ones included.
    pub fn bases_of<'a>(&'a self, class: &'a Class) -> impl Iterator<Item = &'a Class> + 'a {
        class.bases.iter().map(|inherits| self.class(inherits.base))
    }

    /// Direct persistent (object or composite) bases of `class`.
    pub fn persistent_bases_of<'a>(
        &'a self,
        class: &'a Class,
    ) -> impl Iterator<Item = &'a Class> + 'a {
        self.bases_of(class).filter(|base| base.is_persistent_base())
    }

    /// Returns true if the class is declared in the unit's primary file.
    pub fn own_file(&self, class: &Class) -> bool {
        class.location.file == self.file
    }

    /// Returns true if code is generated for the class in this unit.
    pub fn is_emitted(&self, class: &Class) -> bool {
        self.own_file(class) && class.complete && !class.is_plain()
    }

    /// Fully qualified name of a class, e.g. `::accounting::Person`.
    pub fn fq_name(&self, class: &Class) -> String {
        let mut scopes = vec![];
        let mut scope = Some(class.scope);

        while let Some(id) = scope {
            let ns = self.namespace(id);
            if ns.parent.is_some() {
                scopes.push(ns.name.as_str());
            }
            scope = ns.parent;
        }

        let mut name = String::new();
        for ns in scopes.iter().rev() {
            name.push_str("::");
            name.push_str(ns);
        }
        name.push_str("::");
        name.push_str(&class.name);
        name
    }

    /// Strips wrapper types. Returns the wrapped type and whether any wrapper
    /// along the way makes the value nullable.
    pub fn unwrap(&self, id: TypeId) -> (&Type, bool) {
        let mut ty = self.ty(id);
        let mut null = false;

        while let TypeKind::Wrapper {
            wrapped,
            null: wrapper_null,
        } = &ty.kind
        {
            null |= *wrapper_null;
            ty = self.ty(*wrapped);
        }

        (ty, null)
    }

    /// Finds the id member of an object, searching persistent bases
    /// depth-first in declaration order.
    pub fn id_member<'a>(&'a self, class: &'a Class) -> Option<&'a DataMember> {
        if let Some(id) = self.members_of(class).find(|m| m.is_id && !m.transient) {
            return Some(id);
        }

        self.persistent_bases_of(class)
            .find_map(|base| self.id_member(base))
    }

    /// Finds a persistent data member by name, searching persistent bases.
    pub fn find_member<'a>(&'a self, class: &'a Class, name: &str) -> Option<&'a DataMember> {
        if let Some(member) = self
            .members_of(class)
            .find(|m| m.name == name && !m.transient)
        {
            return Some(member);
        }

        self.persistent_bases_of(class)
            .find_map(|base| self.find_member(base, name))
    }

    /// Returns true if `class` is `ancestor` or derives from it.
    pub fn derives_from(&self, class: &Class, ancestor: ClassId) -> bool {
        class.id == ancestor
            || self
                .bases_of(class)
                .any(|base| self.derives_from(base, ancestor))
    }

    /// Checks that every id stored in the graph refers to an existing node.
    ///
    /// Units built with [`Builder`] always pass; units deserialized from an
    /// external front end may not.
    pub fn verify(&self) -> Result<()> {
        fn check<T>(arena: &[T], index: usize, what: &str) -> Result<()> {
            if index < arena.len() {
                Ok(())
            } else {
                Err(Error::invariant_violation(format!(
                    "{what} id {index} is out of range"
                )))
            }
        }

        if self.namespaces.is_empty() || self.namespaces[0].parent.is_some() {
            return Err(Error::invariant_violation(
                "unit has no global namespace",
            ));
        }

        for ns in &self.namespaces {
            if let Some(parent) = ns.parent {
                check(&self.namespaces, parent.0, "namespace")?;
            }
            for decl in &ns.defines {
                match decl {
                    Decl::Namespace(id) => check(&self.namespaces, id.0, "namespace")?,
                    Decl::Class(id) => check(&self.classes, id.0, "class")?,
                }
            }
        }

        for class in &self.classes {
            check(&self.namespaces, class.scope.0, "namespace")?;
            for inherits in &class.bases {
                check(&self.classes, inherits.base.0, "class")?;
            }
            for member in &class.members {
                check(&self.members, member.0, "member")?;
                if self.member(*member).scope != class.id {
                    return Err(Error::invariant_violation(format!(
                        "member `{}` is listed by `{}` but scoped elsewhere",
                        self.member(*member).name,
                        class.name
                    )));
                }
            }
            if let ClassKind::View(view) = &class.kind {
                for object in &view.objects {
                    check(&self.classes, object.class.0, "class")?;
                }
            }
        }

        for member in &self.members {
            check(&self.classes, member.scope.0, "class")?;
            check(&self.types, member.ty.0, "type")?;
        }

        for ty in &self.types {
            ty.verify(self)?;
        }

        // Traversals recurse through bases and wrappers, so both must be
        // acyclic.
        for class in &self.classes {
            let mut stack = vec![(class.id, 0)];
            while let Some((id, depth)) = stack.pop() {
                if depth > self.classes.len() {
                    return Err(Error::invariant_violation(format!(
                        "class `{}` inherits from itself",
                        class.name
                    )));
                }
                for inherits in &self.class(id).bases {
                    stack.push((inherits.base, depth + 1));
                }
            }
        }

        for ty in &self.types {
            let mut current = ty;
            let mut depth = 0;
            while let TypeKind::Wrapper { wrapped, .. } = &current.kind {
                depth += 1;
                if depth > self.types.len() {
                    return Err(Error::invariant_violation(format!(
                        "wrapper type `{}` wraps itself",
                        ty.name
                    )));
                }
                current = self.ty(*wrapped);
            }
        }

        Ok(())
    }
}
