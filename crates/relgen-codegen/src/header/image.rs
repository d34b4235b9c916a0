use crate::element::{Part, PartKind};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::{Class, DataMember};
use relgen_core::mapping::{ClassMapping, IdMapping, Pointer, Simple};
use relgen_core::visit::{self, walk_members, BaseClauses, Descend, MemberCx, MembersVisitor};
use relgen_core::Result;

pub(super) fn id_image_type(cx: &Context<'_>, w: &mut Writer, id: &IdMapping) {
    w.line("struct id_image_type");
    w.open();
    cx.backend.image_fields(w, &id.var, id.scalar);
    w.blank();
    w.line("std::size_t version;");
    w.close(";");
}

/// The image of a class's own members. Bases contribute through C++
/// inheritance of their image and composite members through a nested
/// composite image; views have neither, so their composites are flattened.
pub(super) fn image_type(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<()> {
    let mut bases = BaseClauses::new(|_, base: &Class| format!("{}::image_type", cx.traits(base)));
    let bases = visit::inherits(&mut bases, cx.unit, class)?;

    w.line(format!("struct image_type{}", bases.concat()));
    w.open();

    let mut fields = Fields {
        cx,
        w: &mut *w,
        mapping: cx.class_mapping(class.id)?,
        flatten: class.is_view(),
    };
    walk_members(&mut fields, cx.unit, class)?;

    if !class.is_composite() {
        w.blank();
        w.line("std::size_t version;");
    }
    w.close(";");
    Ok(())
}

/// Image fields of one container element part.
pub(super) fn part_fields(cx: &Context<'_>, w: &mut Writer, part: &Part) {
    w.blank();
    w.comment(part.name);

    match part.kind {
        PartKind::Simple(scalar) | PartKind::Pointer { scalar, .. } => {
            cx.backend.image_fields(w, &part.var, scalar)
        }
        PartKind::Composite { class, .. } => {
            let traits = cx.traits(cx.unit.class(class));
            w.line(format!("{traits}::image_type {}value;", part.var));
        }
    }
}

struct Fields<'a, 'w> {
    cx: &'a Context<'a>,
    w: &'w mut Writer,
    mapping: &'a ClassMapping,
    flatten: bool,
}

impl MembersVisitor for Fields<'_, '_> {
    fn base(&mut self, _cx: &MemberCx<'_>, _base: &Class) -> Result<Descend> {
        Ok(Descend::Skip)
    }

    fn simple(&mut self, cx: &MemberCx<'_>, member: &DataMember, simple: &Simple) -> Result<()> {
        self.w.blank();
        self.w.comment(&member.name);
        self.cx
            .backend
            .image_fields(self.w, &cx.var_name(member), simple.scalar);
        Ok(())
    }

    fn pointer(&mut self, cx: &MemberCx<'_>, member: &DataMember, _pointer: &Pointer) -> Result<()> {
        let column = self.mapping.column(member.id)?;

        self.w.blank();
        self.w.comment(&member.name);
        self.cx
            .backend
            .image_fields(self.w, &cx.var_name(member), column.scalar);
        Ok(())
    }

    fn composite(&mut self, cx: &MemberCx<'_>, member: &DataMember, class: &Class) -> Result<Descend> {
        if self.flatten {
            return Ok(Descend::Members);
        }

        self.w.blank();
        self.w.comment(&member.name);
        self.w.line(format!(
            "{}::image_type {}value;",
            self.cx.traits(class),
            cx.var_name(member)
        ));
        Ok(Descend::Skip)
    }
}
