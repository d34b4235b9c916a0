use super::image::{self, Body};
use super::object::query_body;
use super::{constant, function, query, unused};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::Result;

pub(super) fn define(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<()> {
    let scope = cx.scope(class);
    let db = cx.db();
    let mapping = cx.class_mapping(class.id)?;

    log::trace!("view definitions for `{}`", cx.unit.fq_name(class));

    w.comment(&class.name);

    let mut statement = cx
        .serializer
        .serialize(&relgen_sql::view_statement(cx.unit, cx.mapping, mapping)?);
    statement.push(' ');
    constant(w, &scope, "query_statement", &statement);

    query::query_type(w, &scope);

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
            w.line("std::size_t n (0);");
            image::members(cx, w, class, Body::Bind)
        },
    )?;

    function(
        w,
        "void",
        &scope,
        "init (view_type& o, const image_type& i, database& db)",
        |w| {
            unused(w, &["o", "i", "db"]);
            image::members(cx, w, class, Body::InitValue)
        },
    )?;

    function(
        w,
        "void",
        &scope,
        &format!(
            "query_ (database&,\n        const query_type& q,\n        {db}::view_statements< view_type >& sts,\n        details::shared_ptr< {db}::select_statement >& st)"
        ),
        |w| {
            query_body(cx, w, "image", "imb.bind, im", "query_statement");
            Ok(())
        },
    )
}
