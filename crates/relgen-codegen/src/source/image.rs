//! Bodies converting between classes and their images.

use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::{Class, DataMember, Scalar};
use relgen_core::mapping::{ClassMapping, Pointer, Simple};
use relgen_core::visit::{walk_members, Descend, MemberCx, MembersVisitor};
use relgen_core::Result;

/// The function a member body is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Body {
    /// `grow (image_type& i, truncated t)`
    Grow,

    /// `bind (bind* b, image_type& i[, bool out])`
    Bind,

    /// `init (image_type& i, const T& o)`
    InitImage,

    /// `init (T& o, const image_type& i, database& db)`
    InitValue,
}

/// Writes the per-member statements of `body` for the members of `class`.
pub(super) fn members(cx: &Context<'_>, w: &mut Writer, class: &Class, body: Body) -> Result<()> {
    let mut members = Members {
        cx,
        w,
        mapping: cx.class_mapping(class.id)?,
        body,
        object: class.is_object(),
        flatten: class.is_view(),
        offset: 0,
    };
    walk_members(&mut members, cx.unit, class)
}

/// Sets image fields `<image>*` from the C++ value `src` of type `ty`.
/// Expects `grew` in scope and declares `is_null` unless `declare_null` is
/// false.
pub(super) fn set_image(
    cx: &Context<'_>,
    w: &mut Writer,
    ty: &str,
    image: &str,
    scalar: Scalar,
    src: &str,
    declare_null: bool,
) {
    let size = cx.backend.image(scalar).size;

    if declare_null {
        w.line("bool is_null (false);");
    }
    if size.is_some() {
        w.line("std::size_t size (0);");
        w.line(format!("std::size_t cap ({image}value.capacity ());"));
    }

    w.line(format!("{}::set_image (", cx.backend.value_traits(ty, scalar)));
    w.indented(|w| match size {
        Some(_) => {
            w.line(format!("{image}value,"));
            w.line("size,");
            w.line("is_null,");
            w.line(format!("{src});"));
        }
        None => w.line(format!("{image}value, is_null, {src});")),
    });
    w.line(format!("{image}null = is_null;"));

    match size {
        Some("std::size_t") => w.line(format!("{image}size = size;")),
        Some(size) => w.line(format!("{image}size = static_cast<{size}> (size);")),
        None => {}
    }
    if size.is_some() {
        w.line(format!("grew = grew || (cap != {image}value.capacity ());"));
    }
}

/// Sets the C++ value `dst` of type `ty` from image fields `<image>*`.
pub(super) fn set_value(
    cx: &Context<'_>,
    w: &mut Writer,
    ty: &str,
    image: &str,
    scalar: Scalar,
    dst: &str,
) {
    let variable = cx.backend.image(scalar).size.is_some();

    w.line(format!("{}::set_value (", cx.backend.value_traits(ty, scalar)));
    w.indented(|w| {
        w.line(format!("{dst},"));
        w.line(format!("{image}value,"));
        if variable {
            w.line(format!("{image}size,"));
        }
        w.line(format!("{image}null);"));
    });
}

/// Grows the buffer of one column if the fetch truncated it.
pub(super) fn grow_one(w: &mut Writer, image: &str, scalar: Scalar, index: usize) {
    if scalar.is_variable_length() {
        w.line(format!("if (t[{index}UL])"));
        w.open();
        w.line(format!("{image}value.capacity ({image}size);"));
        w.line("grew = true;");
        w.close("");
    } else {
        w.line(format!("t[{index}UL] = 0;"));
    }
}

/// Writes an object pointer `src` of type `ptr` to image fields `<image>*`
/// as the id of the pointed-to object.
pub(super) fn pointer_image(
    cx: &Context<'_>,
    w: &mut Writer,
    pointee: &str,
    ptr: &str,
    image: &str,
    scalar: Scalar,
    src: &str,
) {
    w.line(format!("typedef object_traits< {pointee} > obj_traits;"));
    w.line(format!("typedef pointer_traits< {ptr} > ptr_traits;"));
    w.blank();
    w.line(format!("bool is_null (ptr_traits::null_ptr ({src}));"));
    w.line("if (!is_null)");
    w.open();
    w.line("const obj_traits::id_type& id (");
    w.line(format!("  obj_traits::id (ptr_traits::get_ref ({src})));"));
    w.blank();
    set_image(cx, w, "obj_traits::id_type", image, scalar, "id", false);
    w.close("");
    w.line("else");
    w.line(format!("  {image}null = true;"));
}

/// Loads the object whose id is in image fields `<image>*` into pointer
/// `dst`.
pub(super) fn pointer_value(
    cx: &Context<'_>,
    w: &mut Writer,
    pointee: &str,
    ptr: &str,
    image: &str,
    scalar: Scalar,
    dst: &str,
) {
    w.line(format!("typedef object_traits< {pointee} > obj_traits;"));
    w.line(format!("typedef pointer_traits< {ptr} > ptr_traits;"));
    w.blank();
    w.line(format!("if ({image}null)"));
    w.line(format!("  {dst} = ptr_traits::pointer_type ();"));
    w.line("else");
    w.open();
    w.line("obj_traits::id_type id;");
    set_value(cx, w, "obj_traits::id_type", image, scalar, "id");
    w.blank();
    w.line(format!("{dst} = db.load< obj_traits::object_type > (id);"));
    w.close("");
}

struct Members<'a, 'w> {
    cx: &'a Context<'a>,
    w: &'w mut Writer,
    mapping: &'a ClassMapping,
    body: Body,

    /// Objects bind with an `out` flag that excludes database-assigned ids
    object: bool,

    /// Views have no composite traits of their own to delegate to
    flatten: bool,

    /// Index of the next column in the truncation vector
    offset: usize,
}

impl Members<'_, '_> {
    fn access(&self, cx: &MemberCx<'_>, member: &DataMember) -> String {
        format!("{}.{}", self.cx.access("o", &cx.path), member.name)
    }

    fn column(&mut self, cx: &MemberCx<'_>, member: &DataMember, scalar: Scalar) {
        let image = format!("i.{}", cx.var_name(member));

        match self.body {
            Body::Grow => {
                grow_one(self.w, &image, scalar, self.offset);
                self.offset += 1;
            }
            Body::Bind if self.object && member.is_id && member.auto => {
                self.w.line("if (out)");
                self.w.open();
                self.cx.backend.bind(self.w, "i.", &cx.var_name(member), scalar);
                self.w.line("n++;");
                self.w.close("");
            }
            Body::Bind => {
                self.cx.backend.bind(self.w, "i.", &cx.var_name(member), scalar);
                self.w.line("n++;");
            }
            Body::InitImage | Body::InitValue => {}
        }
    }
}

impl MembersVisitor for Members<'_, '_> {
    fn base(&mut self, _cx: &MemberCx<'_>, base: &Class) -> Result<Descend> {
        let traits = self.cx.traits(base);
        let mapping = self.cx.class_mapping(base.id)?;
        let w = &mut *self.w;

        w.blank();
        w.comment(&format!("{} base", base.name));

        match self.body {
            Body::Grow => {
                w.line(format!("if ({traits}::grow (i, t + {}UL))", self.offset));
                w.line("  grew = true;");
                self.offset += mapping.out_column_count;
            }
            Body::Bind if base.is_object() => {
                w.line(format!("{traits}::bind (b + n, i, out);"));
                w.line(format!(
                    "n += out ? {}UL : {}UL;",
                    mapping.out_column_count, mapping.in_column_count
                ));
            }
            Body::Bind => {
                w.line(format!("{traits}::bind (b + n, i);"));
                w.line(format!("n += {}UL;", mapping.out_column_count));
            }
            Body::InitImage => {
                w.line(format!("if ({traits}::init (i, o))"));
                w.line("  grew = true;");
            }
            Body::InitValue => w.line(format!("{traits}::init (o, i, db);")),
        }

        Ok(Descend::Skip)
    }

    fn simple(&mut self, cx: &MemberCx<'_>, member: &DataMember, simple: &Simple) -> Result<()> {
        self.w.blank();
        self.w.comment(&member.name);

        let image = format!("i.{}", cx.var_name(member));
        let ty = self.cx.member_type(member);
        let access = self.access(cx, member);

        match self.body {
            Body::Grow | Body::Bind => self.column(cx, member, simple.scalar),
            Body::InitImage => {
                let w = &mut *self.w;
                w.open();
                w.line(format!("{ty} const& v ="));
                w.line(format!("  {access};"));
                w.blank();
                set_image(self.cx, w, &ty, &image, simple.scalar, "v", true);
                w.close("");
            }
            Body::InitValue => {
                let w = &mut *self.w;
                w.open();
                w.line(format!("{ty}& v ="));
                w.line(format!("  {access};"));
                w.blank();
                set_value(self.cx, w, &ty, &image, simple.scalar, "v");
                w.close("");
            }
        }
        Ok(())
    }

    fn pointer(&mut self, cx: &MemberCx<'_>, member: &DataMember, pointer: &Pointer) -> Result<()> {
        let scalar = self.mapping.column(member.id)?.scalar;

        self.w.blank();
        self.w.comment(&member.name);

        let image = format!("i.{}", cx.var_name(member));
        let pointee = self.cx.fq(pointer.class);
        let ptr = self.cx.member_type(member);
        let access = self.access(cx, member);

        match self.body {
            Body::Grow | Body::Bind => self.column(cx, member, scalar),
            Body::InitImage => {
                self.w.open();
                pointer_image(self.cx, self.w, &pointee, &ptr, &image, scalar, &access);
                self.w.close("");
            }
            Body::InitValue => {
                self.w.open();
                pointer_value(self.cx, self.w, &pointee, &ptr, &image, scalar, &access);
                self.w.close("");
            }
        }
        Ok(())
    }

    fn composite(&mut self, cx: &MemberCx<'_>, member: &DataMember, class: &Class) -> Result<Descend> {
        if self.flatten {
            return Ok(Descend::Members);
        }

        let traits = self.cx.traits(class);
        let image = format!("i.{}value", cx.var_name(member));
        let access = self.access(cx, member);
        let columns = self.cx.class_mapping(class.id)?.out_column_count;
        let w = &mut *self.w;

        w.blank();
        w.comment(&member.name);

        match self.body {
            Body::Grow => {
                w.line(format!("if ({traits}::grow (\n      {image}, t + {}UL))", self.offset));
                w.line("  grew = true;");
                self.offset += columns;
            }
            Body::Bind => {
                w.line(format!("{traits}::bind (b + n, {image});"));
                w.line(format!("n += {columns}UL;"));
            }
            Body::InitImage => {
                w.line(format!("if ({traits}::init (\n      {image},\n      {access}))"));
                w.line("  grew = true;");
            }
            Body::InitValue => w.line(format!("{traits}::init (\n  {access},\n  {image},\n  db);")),
        }

        Ok(Descend::Skip)
    }
}
