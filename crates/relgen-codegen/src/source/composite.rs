use super::image::{self, Body};
use super::{function, unused};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::Result;

pub(super) fn define(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<()> {
    let scope = cx.scope(class);

    log::trace!("composite definitions for `{}`", cx.unit.fq_name(class));

    w.comment(&class.name);

    function(
        w,
        "bool",
        &scope,
        &format!("grow (image_type& i, {} t)", cx.backend.truncated_vector()),
        |w| {
            unused(w, &["i", "t"]);
            w.line("bool grew (false);");
            image::members(cx, w, class, Body::Grow)?;
            w.blank();
            w.line("return grew;");
            Ok(())
        },
    )?;

    function(
        w,
        "void",
        &scope,
        &format!("bind ({} b, image_type& i)", cx.backend.bind_vector()),
        |w| {
            unused(w, &["b", "i"]);
            w.line("std::size_t n (0);");
            w.line("ODB_POTENTIALLY_UNUSED (n);");
            image::members(cx, w, class, Body::Bind)
        },
    )?;

    function(
        w,
        "bool",
        &scope,
        "init (image_type& i, const value_type& o)",
        |w| {
            unused(w, &["i", "o"]);
            w.line("bool grew (false);");
            image::members(cx, w, class, Body::InitImage)?;
            w.blank();
            w.line("return grew;");
            Ok(())
        },
    )?;

    function(
        w,
        "void",
        &scope,
        "init (value_type& o, const image_type& i, database& db)",
        |w| {
            unused(w, &["o", "i", "db"]);
            image::members(cx, w, class, Body::InitValue)
        },
    )
}
