use crate::graph::{Class, ClassId, DataMember, MemberId, Unit};
use crate::mapping::{classify, ContainerDesc, MemberKind, Pointer, Simple};
use crate::{Error, Result};

/// Whether the walker descends into a base or composite member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Members,
    Skip,
}

/// Where in a class hierarchy the walker currently is.
#[derive(Debug, Clone)]
pub struct MemberCx<'a> {
    pub unit: &'a Unit,

    /// Composite members leading from the walked class to the current member,
    /// outermost first
    pub path: Vec<MemberId>,

    /// Prepended to image field names, e.g. `addr_` inside `addr`
    pub var_prefix: String,

    /// Prepended to column names, e.g. `addr_` inside `addr`
    pub column_prefix: String,
}

/// Persistent members of an object or composite value, flattened.
///
/// Persistent bases are walked first, in declaration order, followed by the
/// class's own members. A virtual base reached along several paths is walked
/// once. Transient members are never visited.
pub trait MembersVisitor {
    fn base(&mut self, cx: &MemberCx<'_>, base: &Class) -> Result<Descend> {
        Ok(Descend::Members)
    }

    fn simple(&mut self, cx: &MemberCx<'_>, member: &DataMember, simple: &Simple) -> Result<()> {
        Ok(())
    }

    fn pointer(&mut self, cx: &MemberCx<'_>, member: &DataMember, pointer: &Pointer) -> Result<()> {
        Ok(())
    }

    fn composite(&mut self, cx: &MemberCx<'_>, member: &DataMember, class: &Class) -> Result<Descend> {
        Ok(Descend::Members)
    }

    fn container(
        &mut self,
        cx: &MemberCx<'_>,
        member: &DataMember,
        container: &ContainerDesc,
    ) -> Result<()> {
        Ok(())
    }
}

impl<'a> MemberCx<'a> {
    pub fn root(unit: &'a Unit) -> MemberCx<'a> {
        MemberCx {
            unit,
            path: vec![],
            var_prefix: String::new(),
            column_prefix: String::new(),
        }
    }

    /// Context for the members of composite `member`, nested in `self`.
    pub fn nested(&self, member: &DataMember) -> MemberCx<'a> {
        let mut path = self.path.clone();
        path.push(member.id);

        MemberCx {
            unit: self.unit,
            path,
            var_prefix: format!("{}{}", self.var_prefix, member.var_name()),
            column_prefix: format!("{}{}_", self.column_prefix, member.column_name()),
        }
    }

    /// Column name of `member` in this context.
    pub fn column_name(&self, member: &DataMember) -> String {
        format!("{}{}", self.column_prefix, member.column_name())
    }

    /// Image field base of `member` in this context, e.g. `addr_street_`.
    pub fn var_name(&self, member: &DataMember) -> String {
        format!("{}{}", self.var_prefix, member.var_name())
    }
}

/// Walks the persistent members of `class` from the top of its hierarchy.
pub fn walk_members<V>(v: &mut V, unit: &Unit, class: &Class) -> Result<()>
where
    V: MembersVisitor + ?Sized,
{
    walk_members_in(v, &MemberCx::root(unit), class)
}

/// Walks the persistent members of `class` starting from an existing context.
pub fn walk_members_in<V>(v: &mut V, cx: &MemberCx<'_>, class: &Class) -> Result<()>
where
    V: MembersVisitor + ?Sized,
{
    walk(v, cx, class, &mut vec![], &mut vec![])
}

/// `composites` holds the composite values enclosing `class`; `virtuals`
/// holds the virtual bases already laid out in the current object, which
/// are shared by every path that reaches them.
fn walk<V>(
    v: &mut V,
    cx: &MemberCx<'_>,
    class: &Class,
    composites: &mut Vec<ClassId>,
    virtuals: &mut Vec<ClassId>,
) -> Result<()>
where
    V: MembersVisitor + ?Sized,
{
    let unit = cx.unit;

    if !class.complete {
        return Err(Error::invariant_violation(format!(
            "layout of `{}` is required but the class is only forward declared",
            unit.fq_name(class)
        )));
    }

    for inherits in &class.bases {
        let base = unit.class(inherits.base);

        if !base.is_persistent_base() {
            continue;
        }

        if inherits.is_virtual {
            if virtuals.contains(&base.id) {
                continue;
            }
            virtuals.push(base.id);
        }

        if v.base(cx, base)? == Descend::Members {
            walk(v, cx, base, composites, virtuals)?;
        }
    }

    for member in unit.members_of(class).filter(|m| !m.transient) {
        match classify(unit, member)? {
            MemberKind::Simple(simple) => v.simple(cx, member, &simple)?,
            MemberKind::Pointer(pointer) => v.pointer(cx, member, &pointer)?,
            MemberKind::Container(container) => v.container(cx, member, &container)?,
            MemberKind::Composite(id) => {
                let composite = unit.class(id);

                if composites.contains(&id) || id == class.id {
                    return Err(Error::invariant_violation(format!(
                        "composite value `{}` contains itself through member `{}`",
                        unit.fq_name(composite),
                        member.name
                    )));
                }

                if v.composite(cx, member, composite)? == Descend::Members {
                    composites.push(id);
                    walk(v, &cx.nested(member), composite, composites, &mut vec![])?;
                    composites.pop();
                }
            }
        }
    }

    Ok(())
}
