use super::{
    Class, ClassId, ClassKind, Container, DataMember, Decl, Inherits, Location, MemberId,
    Namespace, NamespaceId, Scalar, Type, TypeId, TypeKind, Unit, ViewAttrs, ViewObject,
};
use crate::Result;

/// Incrementally builds a [`Unit`].
///
/// Declarations are registered in the order the builder methods are called,
/// which becomes the declaration order seen by every traversal. Each
/// declaration is assigned the next line of the unit's primary file unless a
/// different file is given.
#[derive(Debug)]
pub struct Builder {
    unit: Unit,

    /// Next line number handed out to a declaration
    line: usize,
}

#[must_use]
pub struct ClassBuilder<'a> {
    builder: &'a mut Builder,
    class: Class,
}

pub struct MemberBuilder<'a> {
    member: &'a mut DataMember,
}

impl Builder {
    pub(super) fn new(file: String) -> Builder {
        Builder {
            unit: Unit {
                file,
                namespaces: vec![Namespace {
                    id: NamespaceId(0),
                    name: String::new(),
                    parent: None,
                    defines: vec![],
                }],
                classes: vec![],
                members: vec![],
                types: vec![],
            },
            line: 1,
        }
    }

    /// Declares a namespace in the global namespace.
    pub fn namespace(&mut self, name: &str) -> NamespaceId {
        self.nested_namespace(NamespaceId(0), name)
    }

    pub fn nested_namespace(&mut self, parent: NamespaceId, name: &str) -> NamespaceId {
        let id = NamespaceId(self.unit.namespaces.len());

        self.unit.namespaces.push(Namespace {
            id,
            name: name.to_string(),
            parent: Some(parent),
            defines: vec![],
        });
        self.unit.namespaces[parent.0]
            .defines
            .push(Decl::Namespace(id));

        id
    }

    pub fn fundamental(&mut self, name: &str, scalar: Scalar) -> TypeId {
        self.push_type(name.to_string(), TypeKind::Fundamental(scalar))
    }

    /// The type of a class, used for composite members and elements.
    pub fn class_type(&mut self, class: ClassId) -> TypeId {
        let name = self.unit.fq_name(self.unit.class(class));
        self.push_type(name, TypeKind::Class(class))
    }

    /// A raw pointer to an object.
    pub fn pointer(&mut self, class: ClassId) -> TypeId {
        let name = format!("{}*", self.unit.fq_name(self.unit.class(class)));
        self.push_type(name, TypeKind::Pointer(class))
    }

    /// A pointer to an object spelled as `name`, e.g. a smart pointer.
    pub fn pointer_named(&mut self, name: &str, class: ClassId) -> TypeId {
        self.push_type(name.to_string(), TypeKind::Pointer(class))
    }

    pub fn wrapper(&mut self, name: &str, wrapped: TypeId, null: bool) -> TypeId {
        self.push_type(name.to_string(), TypeKind::Wrapper { wrapped, null })
    }

    pub fn container(&mut self, name: &str, container: Container) -> TypeId {
        self.push_type(name.to_string(), TypeKind::Container(container))
    }

    pub fn object(&mut self, name: &str) -> ClassBuilder<'_> {
        self.class(name, ClassKind::Object)
    }

    pub fn composite(&mut self, name: &str) -> ClassBuilder<'_> {
        self.class(name, ClassKind::Composite)
    }

    pub fn view(&mut self, name: &str) -> ClassBuilder<'_> {
        self.class(
            name,
            ClassKind::View(ViewAttrs {
                objects: vec![],
                query: None,
            }),
        )
    }

    pub fn plain(&mut self, name: &str) -> ClassBuilder<'_> {
        self.class(name, ClassKind::Plain)
    }

    /// Adds a data member to `class`, after all previously added members.
    pub fn member(&mut self, class: ClassId, name: &str, ty: TypeId) -> MemberBuilder<'_> {
        let id = MemberId(self.unit.members.len());
        let location = Location::new(
            self.unit.class(class).location.file.clone(),
            self.next_line(),
            3,
        );

        self.unit.members.push(DataMember {
            id,
            name: name.to_string(),
            scope: class,
            location,
            ty,
            type_hint: None,
            is_id: false,
            auto: false,
            transient: false,
            inverse: None,
            unordered: false,
            column: None,
            column_type: None,
            var: None,
        });
        self.unit.classes[class.0].members.push(id);

        MemberBuilder {
            member: &mut self.unit.members[id.0],
        }
    }

    /// Finishes the unit, checking that it is well formed.
    pub fn build(self) -> Result<Unit> {
        self.unit.verify()?;
        Ok(self.unit)
    }

    fn class(&mut self, name: &str, kind: ClassKind) -> ClassBuilder<'_> {
        let location = Location::new(self.unit.file.clone(), self.next_line(), 1);

        ClassBuilder {
            class: Class {
                id: ClassId(self.unit.classes.len()),
                name: name.to_string(),
                scope: NamespaceId(0),
                location,
                kind,
                bases: vec![],
                members: vec![],
                is_abstract: false,
                complete: true,
                default_ctor: true,
                object_pointer: None,
                table: None,
            },
            builder: self,
        }
    }

    fn push_type(&mut self, name: String, kind: TypeKind) -> TypeId {
        let id = TypeId(self.unit.types.len());
        self.unit.types.push(Type { id, name, kind });
        id
    }

    fn next_line(&mut self) -> usize {
        let line = self.line;
        self.line += 1;
        line
    }
}

impl ClassBuilder<'_> {
    pub fn namespace(mut self, ns: NamespaceId) -> Self {
        self.class.scope = ns;
        self
    }

    pub fn base(mut self, base: ClassId) -> Self {
        self.class.bases.push(Inherits {
            base,
            is_virtual: false,
        });
        self
    }

    pub fn virtual_base(mut self, base: ClassId) -> Self {
        self.class.bases.push(Inherits {
            base,
            is_virtual: true,
        });
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.class.is_abstract = true;
        self
    }

    pub fn table(mut self, table: &str) -> Self {
        self.class.table = Some(table.to_string());
        self
    }

    pub fn object_pointer(mut self, pointer: &str) -> Self {
        self.class.object_pointer = Some(pointer.to_string());
        self
    }

    /// Declares the class in another file of the unit.
    pub fn file(mut self, file: &str) -> Self {
        self.class.location.file = file.to_string();
        self
    }

    /// Marks the class as only forward declared.
    pub fn incomplete(mut self) -> Self {
        self.class.complete = false;
        self
    }

    pub fn no_default_ctor(mut self) -> Self {
        self.class.default_ctor = false;
        self
    }

    /// Adds a constituent object to a view.
    pub fn view_object(self, class: ClassId) -> Self {
        self.push_view_object(ViewObject {
            class,
            alias: None,
            join: None,
        })
    }

    /// Adds an aliased constituent object joined on `join`.
    pub fn view_alias(self, class: ClassId, alias: &str, join: Option<&str>) -> Self {
        self.push_view_object(ViewObject {
            class,
            alias: Some(alias.to_string()),
            join: join.map(str::to_string),
        })
    }

    pub fn view_query(mut self, query: &str) -> Self {
        if let ClassKind::View(view) = &mut self.class.kind {
            view.query = Some(query.to_string());
        }
        self
    }

    pub fn build(self) -> ClassId {
        let id = self.class.id;
        let scope = self.class.scope;

        self.builder.unit.classes.push(self.class);
        self.builder.unit.namespaces[scope.0]
            .defines
            .push(Decl::Class(id));

        id
    }

    fn push_view_object(mut self, object: ViewObject) -> Self {
        if let ClassKind::View(view) = &mut self.class.kind {
            view.objects.push(object);
        }
        self
    }
}

impl MemberBuilder<'_> {
    pub fn member_id(&self) -> MemberId {
        self.member.id
    }

    /// Marks the member as the object id.
    pub fn id(self) -> Self {
        self.member.is_id = true;
        self
    }

    pub fn auto(self) -> Self {
        self.member.auto = true;
        self
    }

    pub fn transient(self) -> Self {
        self.member.transient = true;
        self
    }

    pub fn inverse(self, other_side: &str) -> Self {
        self.member.inverse = Some(other_side.to_string());
        self
    }

    pub fn unordered(self) -> Self {
        self.member.unordered = true;
        self
    }

    pub fn column(self, column: &str) -> Self {
        self.member.column = Some(column.to_string());
        self
    }

    pub fn column_type(self, ty: &str) -> Self {
        self.member.column_type = Some(ty.to_string());
        self
    }

    pub fn var(self, var: &str) -> Self {
        self.member.var = Some(var.to_string());
        self
    }

    pub fn type_hint(self, hint: &str) -> Self {
        self.member.type_hint = Some(hint.to_string());
        self
    }
}
