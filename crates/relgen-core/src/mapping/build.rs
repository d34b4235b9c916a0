use super::{
    classify, ClassMapping, Column, ColumnSource, ContainerCounts, ContainerDesc,
    ContainerMapping, Element, IdMapping, InverseMapping, Mapping, MemberKind, Pointer, Reference,
    Simple, ViewMapping, ViewObjectMapping,
};
use crate::graph::{Class, ClassId, ClassKind, DataMember, MemberId, Unit, ViewAttrs};
use crate::visit::{
    self, walk_members, DeclVisitor, Descend, MemberCx, MemberVisitor, MembersVisitor,
};
use crate::{Error, Options, Result};

pub(super) struct Build<'a> {
    unit: &'a Unit,
    options: &'a Options,
    mapping: Mapping,

    /// Classes whose mapping is being computed, used to reject composite
    /// values that contain themselves
    in_progress: Vec<ClassId>,
}

/// Flattens the persistent members of an object or composite into columns.
struct Collect<'b, 'a> {
    build: &'b mut Build<'a>,
    owner: &'a Class,
    table: Option<String>,
    id: Option<IdMapping>,
    columns: Vec<Column>,
    containers: Vec<ContainerMapping>,
    has_pointers: bool,
}

/// Resolves the members of a view against its constituent objects.
struct ViewColumns<'b> {
    mapping: &'b Mapping,
    objects: &'b [ViewObjectMapping],
    view: &'b Class,
    columns: Vec<Column>,
    sources: Vec<ColumnSource>,
}

impl<'a> Build<'a> {
    pub(super) fn new(unit: &'a Unit, options: &'a Options) -> Build<'a> {
        Build {
            unit,
            options,
            mapping: Mapping::default(),
            in_progress: vec![],
        }
    }

    pub(super) fn run(mut self) -> Result<Mapping> {
        let unit = self.unit;
        visit::visit_unit(&mut self, unit)?;
        Ok(self.mapping)
    }

    fn map_class(&mut self, id: ClassId) -> Result<()> {
        if self.mapping.contains(id) {
            return Ok(());
        }

        let unit = self.unit;
        let class = unit.class(id);

        if self.in_progress.contains(&id) {
            return Err(Error::invariant_violation(format!(
                "composite value `{}` contains itself",
                unit.fq_name(class)
            )));
        }

        if !class.complete {
            return Err(Error::invariant_violation(format!(
                "layout of `{}` is required but the class is only forward declared",
                unit.fq_name(class)
            )));
        }

        self.in_progress.push(id);
        let mapping = match &class.kind {
            ClassKind::Object => self.map_object(class).map(Some),
            ClassKind::Composite => self.map_composite(class).map(Some),
            ClassKind::View(view) => self.map_view(class, view).map(Some),
            ClassKind::Plain => Ok(None),
        };
        self.in_progress.pop();

        let Some(mapping) = mapping? else {
            return Ok(());
        };

        log::debug!(
            "mapped `{}`: {} columns ({} in), {} containers",
            unit.fq_name(class),
            mapping.out_column_count,
            mapping.in_column_count,
            mapping.containers.len()
        );

        self.mapping.insert_class(mapping)
    }

    fn map_object(&mut self, class: &'a Class) -> Result<ClassMapping> {
        let unit = self.unit;

        for base in unit.persistent_bases_of(class) {
            self.map_class(base.id)?;
        }

        let id = self.id_of(class)?;
        if id.is_none() && !class.is_abstract {
            return Err(Error::unsupported_construct(
                &class.location,
                format!("object `{}` has no id member", unit.fq_name(class)),
            ));
        }

        let table = self.table_name(class);
        let mut collect = Collect::new(self, class, Some(table.clone()), id.clone());
        walk_members(&mut collect, unit, class)?;
        let Collect {
            columns,
            containers,
            has_pointers,
            ..
        } = collect;

        Ok(ClassMapping {
            class: class.id,
            table: if class.is_abstract { None } else { Some(table) },
            in_column_count: columns.iter().filter(|column| !column.auto).count(),
            out_column_count: columns.len(),
            columns,
            id,
            containers,
            has_pointers,
            view: None,
        })
    }

    fn map_composite(&mut self, class: &'a Class) -> Result<ClassMapping> {
        let unit = self.unit;

        for base in unit.persistent_bases_of(class) {
            if base.is_object() {
                return Err(Error::unsupported_construct(
                    &class.location,
                    format!(
                        "composite value `{}` cannot derive from object `{}`",
                        unit.fq_name(class),
                        unit.fq_name(base)
                    ),
                ));
            }
            self.map_class(base.id)?;
        }

        if let Some(member) = unit.members_of(class).find(|m| m.is_id && !m.transient) {
            return Err(Error::unsupported_construct(
                &member.location,
                format!(
                    "composite value `{}` cannot have an id member",
                    unit.fq_name(class)
                ),
            ));
        }

        let mut collect = Collect::new(self, class, None, None);
        walk_members(&mut collect, unit, class)?;
        let Collect {
            columns,
            containers,
            has_pointers,
            ..
        } = collect;

        Ok(ClassMapping {
            class: class.id,
            table: None,
            in_column_count: columns.len(),
            out_column_count: columns.len(),
            columns,
            id: None,
            containers,
            has_pointers,
            view: None,
        })
    }

    fn map_view(&mut self, class: &'a Class, view: &'a ViewAttrs) -> Result<ClassMapping> {
        let unit = self.unit;

        if view.objects.is_empty() {
            return Err(Error::unsupported_construct(
                &class.location,
                format!("view `{}` does not name any object", unit.fq_name(class)),
            ));
        }

        let mut objects = vec![];
        let mut has_pointers = false;

        for object in &view.objects {
            let target = unit.class(object.class);

            if !target.is_object() {
                return Err(Error::unsupported_construct(
                    &class.location,
                    format!(
                        "view `{}` refers to `{}` which is not a persistent object",
                        unit.fq_name(class),
                        unit.fq_name(target)
                    ),
                ));
            }

            self.map_class(target.id)?;
            has_pointers |= self.mapping.class(target.id)?.has_pointers;

            let table = self.table_name(target);
            let alias = object.alias.clone().unwrap_or_else(|| table.clone());

            objects.push(ViewObjectMapping {
                class: target.id,
                aliased: alias != table,
                table,
                alias,
                join: object.join.clone(),
            });
        }

        let mut resolve = ViewColumns {
            mapping: &self.mapping,
            objects: &objects,
            view: class,
            columns: vec![],
            sources: vec![],
        };
        walk_members(&mut resolve, unit, class)?;
        let ViewColumns {
            columns, sources, ..
        } = resolve;

        Ok(ClassMapping {
            class: class.id,
            table: None,
            in_column_count: columns.len(),
            out_column_count: columns.len(),
            columns,
            id: None,
            containers: vec![],
            has_pointers,
            view: Some(ViewMapping {
                objects,
                sources,
                query: view.query.clone(),
            }),
        })
    }

    /// The id of an object, own or inherited.
    fn id_of(&self, class: &'a Class) -> Result<Option<IdMapping>> {
        let unit = self.unit;
        let mut ids = IdMembers::default();
        self.collect_ids(class, &mut ids)?;
        let ids: Vec<&DataMember> = ids.0.iter().map(|id| unit.member(*id)).collect();

        if let [first, second, ..] = &ids[..] {
            return Err(Error::unsupported_construct(
                &second.location,
                format!(
                    "object `{}` has more than one id member (`{}` and `{}`)",
                    unit.fq_name(class),
                    first.name,
                    second.name
                ),
            ));
        }

        let Some(member) = ids.first() else {
            return Ok(None);
        };

        match classify(unit, member)? {
            MemberKind::Simple(Simple {
                scalar,
                nullable: false,
                ..
            }) => Ok(Some(IdMapping {
                member: member.id,
                root: member.scope,
                column: member.column_name().to_string(),
                var: member.var_name(),
                scalar,
                auto: member.auto,
            })),
            _ => Err(Error::unsupported_construct(
                &member.location,
                format!(
                    "id member `{}` of `{}` must be a simple value",
                    member.name,
                    unit.fq_name(class)
                ),
            )),
        }
    }

    fn collect_ids(&self, class: &'a Class, ids: &mut IdMembers) -> Result<()> {
        let unit = self.unit;

        if !class.complete {
            return Err(Error::invariant_violation(format!(
                "id of `{}` is required but the class is only forward declared",
                unit.fq_name(class)
            )));
        }

        for base in unit.persistent_bases_of(class) {
            self.collect_ids(base, ids)?;
        }

        visit::names(ids, unit, class)
    }

    fn table_name(&self, class: &Class) -> String {
        let name = class.table.as_deref().unwrap_or(&class.name);

        match &self.options.table_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }

    fn pointer_column(
        &self,
        member: &DataMember,
        name: String,
        var: String,
        pointer: &Pointer,
    ) -> Result<Column> {
        let unit = self.unit;
        let pointee = unit.class(pointer.class);

        let Some(id) = self.id_of(pointee)? else {
            return Err(Error::unsupported_construct(
                &member.location,
                format!(
                    "object `{}` pointed to by `{}` has no id member",
                    unit.fq_name(pointee),
                    member.name
                ),
            ));
        };

        Ok(Column {
            name,
            var,
            member: member.id,
            scalar: id.scalar,
            sql_type: None,
            nullable: true,
            id: false,
            auto: false,
            references: Some(Reference {
                class: pointee.id,
                table: self.table_name(pointee),
                column: id.column,
            }),
        })
    }

    fn container(
        &mut self,
        owner: &Class,
        owner_table: Option<&str>,
        owner_id: Option<&IdMapping>,
        cx: &MemberCx<'_>,
        member: &DataMember,
        desc: &ContainerDesc,
    ) -> Result<ContainerMapping> {
        let mut path = cx.path.clone();
        path.push(member.id);

        let var = cx.var_name(member);
        let name = var.strip_suffix('_').unwrap_or(&var).to_string();
        let table = owner_table.map(|table| format!("{table}_{}", cx.column_name(member)));

        let object_id = match (owner_table, owner_id) {
            (Some(owner_table), Some(id)) => Some(Column {
                name: "object_id".to_string(),
                var: "object_id_".to_string(),
                member: member.id,
                scalar: id.scalar,
                sql_type: None,
                nullable: false,
                id: false,
                auto: false,
                references: Some(Reference {
                    class: owner.id,
                    table: owner_table.to_string(),
                    column: id.column.clone(),
                }),
            }),
            _ => None,
        };

        let index = match &desc.index {
            Some(Element::Simple(simple)) => Some(simple_column(member, "index", simple)),
            _ => None,
        };
        let key = match &desc.key {
            Some(key) => self.element_columns(member, key, "key")?,
            None => vec![],
        };
        let value = self.element_columns(member, &desc.value, "value")?;

        let counts = ContainerCounts {
            cond: 1,
            data: 1 + usize::from(index.is_some()) + key.len() + value.len(),
        };
        self.mapping.insert_counts(member.id, counts)?;

        let inverse = if desc.inverse && owner.is_object() {
            Some(self.inverse(owner, member, desc)?)
        } else {
            None
        };

        log::trace!(
            "container `{}`: cond {}, data {}",
            member.name,
            counts.cond,
            counts.data
        );

        Ok(ContainerMapping {
            member: member.id,
            path,
            name,
            table,
            desc: desc.clone(),
            object_id,
            index,
            key,
            value,
            counts,
            inverse,
        })
    }

    fn element_columns(
        &mut self,
        member: &DataMember,
        element: &Element,
        name: &str,
    ) -> Result<Vec<Column>> {
        match element {
            Element::Simple(simple) => Ok(vec![simple_column(member, name, simple)]),
            Element::Pointer(pointer) => Ok(vec![self.pointer_column(
                member,
                name.to_string(),
                format!("{name}_"),
                pointer,
            )?]),
            Element::Composite(id) => {
                self.map_class(*id)?;
                let composite = self.mapping.class(*id)?;

                if composite.has_containers() {
                    return Err(Error::unsupported_construct(
                        &member.location,
                        format!(
                            "composite value `{}` in container `{}` cannot contain containers",
                            self.unit.fq_name(self.unit.class(*id)),
                            member.name
                        ),
                    ));
                }

                Ok(composite
                    .columns
                    .iter()
                    .map(|column| Column {
                        name: format!("{name}_{}", column.name),
                        var: format!("{name}_{}", column.var),
                        ..column.clone()
                    })
                    .collect())
            }
        }
    }

    fn inverse(
        &self,
        owner: &Class,
        member: &DataMember,
        desc: &ContainerDesc,
    ) -> Result<InverseMapping> {
        let unit = self.unit;

        let Some(pointer) = desc.value.pointer() else {
            return Err(Error::invariant_violation(format!(
                "inverse container `{}` does not hold object pointers",
                member.name
            )));
        };

        let pointee = unit.class(pointer.class);
        let name = member.inverse.as_deref().unwrap_or_default();

        let Some(other) = unit.find_member(pointee, name) else {
            return Err(Error::invariant_violation(format!(
                "inverse member `{name}` of `{}` not found in `{}`",
                member.name,
                unit.fq_name(pointee)
            )));
        };

        let points_back = |p: &Pointer| unit.derives_from(owner, p.class);

        match classify(unit, other)? {
            MemberKind::Pointer(p) if points_back(&p) => {
                let id = self.id_of(pointee)?.ok_or_else(|| {
                    Error::invariant_violation(format!(
                        "`{}` has no id member",
                        unit.fq_name(pointee)
                    ))
                })?;

                Ok(InverseMapping {
                    table: self.table_name(pointee),
                    id_column: id.column,
                    ref_column: other.column_name().to_string(),
                })
            }
            MemberKind::Container(c) if !c.inverse && c.value.pointer().is_some_and(points_back) => {
                Ok(InverseMapping {
                    table: format!("{}_{}", self.table_name(pointee), other.column_name()),
                    id_column: "object_id".to_string(),
                    ref_column: "value".to_string(),
                })
            }
            _ => Err(Error::invariant_violation(format!(
                "inverse member `{name}` of `{}` does not point back to `{}`",
                unit.fq_name(pointee),
                unit.fq_name(owner)
            ))),
        }
    }
}

fn simple_column(member: &DataMember, name: &str, simple: &Simple) -> Column {
    Column {
        name: name.to_string(),
        var: format!("{name}_"),
        member: member.id,
        scalar: simple.scalar,
        sql_type: None,
        nullable: simple.nullable,
        id: false,
        auto: false,
        references: None,
    }
}

impl DeclVisitor for Build<'_> {
    fn visit_class(&mut self, unit: &Unit, class: &Class) -> Result<()> {
        if unit.is_emitted(class) {
            self.map_class(class.id)?;
        }
        Ok(())
    }
}

impl<'b, 'a> Collect<'b, 'a> {
    fn new(
        build: &'b mut Build<'a>,
        owner: &'a Class,
        table: Option<String>,
        id: Option<IdMapping>,
    ) -> Collect<'b, 'a> {
        Collect {
            build,
            owner,
            table,
            id,
            columns: vec![],
            containers: vec![],
            has_pointers: false,
        }
    }
}

impl MembersVisitor for Collect<'_, '_> {
    fn base(&mut self, _cx: &MemberCx<'_>, base: &Class) -> Result<Descend> {
        self.build.map_class(base.id)?;
        Ok(Descend::Members)
    }

    fn simple(&mut self, cx: &MemberCx<'_>, member: &DataMember, simple: &Simple) -> Result<()> {
        if member.auto && !member.is_id {
            return Err(Error::unsupported_construct(
                &member.location,
                format!("member `{}` is auto but is not the object id", member.name),
            ));
        }

        let column = Column {
            name: cx.column_name(member),
            var: cx.var_name(member),
            member: member.id,
            scalar: simple.scalar,
            sql_type: member.column_type.clone(),
            nullable: simple.nullable,
            id: member.is_id,
            auto: member.is_id && member.auto,
            references: None,
        };

        log::trace!("column `{}` ({:?})", column.name, column.scalar);
        self.columns.push(column);
        Ok(())
    }

    fn pointer(&mut self, cx: &MemberCx<'_>, member: &DataMember, pointer: &Pointer) -> Result<()> {
        self.has_pointers = true;
        let column =
            self.build
                .pointer_column(member, cx.column_name(member), cx.var_name(member), pointer)?;

        log::trace!("pointer column `{}`", column.name);
        self.columns.push(column);
        Ok(())
    }

    fn composite(&mut self, _cx: &MemberCx<'_>, _member: &DataMember, class: &Class) -> Result<Descend> {
        self.build.map_class(class.id)?;
        Ok(Descend::Members)
    }

    fn container(
        &mut self,
        cx: &MemberCx<'_>,
        member: &DataMember,
        desc: &ContainerDesc,
    ) -> Result<()> {
        let container = self.build.container(
            self.owner,
            self.table.as_deref(),
            self.id.as_ref(),
            cx,
            member,
            desc,
        )?;

        let element_pointers = [desc.key.as_ref(), Some(&desc.value)]
            .into_iter()
            .flatten()
            .any(|element| match element {
                Element::Pointer(_) => true,
                Element::Composite(id) => self
                    .build
                    .mapping
                    .class(*id)
                    .is_ok_and(|composite| composite.has_pointers),
                Element::Simple(_) => false,
            });

        self.has_pointers |= element_pointers;
        self.containers.push(container);
        Ok(())
    }
}

impl MembersVisitor for ViewColumns<'_> {
    fn simple(&mut self, cx: &MemberCx<'_>, member: &DataMember, simple: &Simple) -> Result<()> {
        let unit = cx.unit;

        let (alias, column) = match member.column.as_deref().and_then(|c| c.split_once('.')) {
            Some((alias, column)) => {
                if !self.objects.iter().any(|object| object.alias == alias) {
                    return Err(Error::unsupported_construct(
                        &member.location,
                        format!(
                            "view member `{}` refers to `{alias}` which is not an object of view `{}`",
                            member.name,
                            unit.fq_name(self.view)
                        ),
                    ));
                }
                (alias.to_string(), column.to_string())
            }
            None => {
                let column = cx.column_name(member);
                let source = self.objects.iter().find(|object| {
                    self.mapping
                        .class(object.class)
                        .is_ok_and(|mapping| mapping.columns.iter().any(|c| c.name == column))
                });

                let Some(source) = source else {
                    return Err(Error::unsupported_construct(
                        &member.location,
                        format!(
                            "view member `{}` does not match a column of any object in view `{}`",
                            member.name,
                            unit.fq_name(self.view)
                        ),
                    ));
                };
                (source.alias.clone(), column)
            }
        };

        self.columns.push(Column {
            name: column.clone(),
            var: cx.var_name(member),
            member: member.id,
            scalar: simple.scalar,
            sql_type: member.column_type.clone(),
            nullable: simple.nullable,
            id: false,
            auto: false,
            references: None,
        });
        self.sources.push(ColumnSource { alias, column });
        Ok(())
    }

    fn pointer(&mut self, _cx: &MemberCx<'_>, member: &DataMember, _pointer: &Pointer) -> Result<()> {
        Err(Error::unsupported_construct(
            &member.location,
            format!("view member `{}` cannot be an object pointer", member.name),
        ))
    }

    fn container(
        &mut self,
        _cx: &MemberCx<'_>,
        member: &DataMember,
        _desc: &ContainerDesc,
    ) -> Result<()> {
        Err(Error::unsupported_construct(
            &member.location,
            format!("view member `{}` cannot be a container", member.name),
        ))
    }
}

/// Id members in hierarchy order. A base reached along more than one path
/// contributes its id once.
#[derive(Default)]
struct IdMembers(Vec<MemberId>);

impl MemberVisitor for IdMembers {
    fn visit_member(&mut self, _unit: &Unit, member: &DataMember) -> Result<()> {
        if member.is_id && !member.transient && !self.0.contains(&member.id) {
            self.0.push(member.id);
        }
        Ok(())
    }
}
