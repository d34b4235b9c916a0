use super::{function, image, query};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::{Error, Result};

pub(super) fn traits(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<()> {
    let unit = cx.unit;
    let db = cx.db();
    let name = unit.fq_name(class);
    let mapping = cx.class_mapping(class.id)?;

    let Some(view) = &mapping.view else {
        return Err(Error::invariant_violation(format!(
            "`{name}` has no view mapping"
        )));
    };

    log::trace!("view traits for `{name}`");

    w.comment(&class.name);
    w.line("template <>");
    w.line(format!("class access::view_traits< {name} >"));
    w.open();
    w.label("public:");
    w.line(format!("typedef {name} view_type;"));
    w.line(format!("typedef {} pointer_type;", cx.pointer_type(class)));
    w.blank();
    image::image_type(cx, w, class)?;

    w.blank();
    w.line("struct query_columns");
    w.open();
    for object in &view.objects {
        let object_name = cx.fq(object.class);

        w.blank();
        w.comment(&object.alias);
        if object.aliased {
            let tag = format!("{}_alias_tag", object.alias);
            w.line(format!("struct {tag};"));
            w.line(format!(
                "typedef {db}::alias_query_columns< {object_name}, {tag} > {};",
                object.alias
            ));
        } else {
            w.line(format!(
                "typedef object_traits< {object_name} >::query_columns {};",
                object.alias
            ));
        }
    }
    w.close(";");

    w.blank();
    w.line(format!("typedef {db}::query query_base_type;"));
    w.blank();
    query::query_type(w, "struct query_type");

    w.blank();
    w.line(format!(
        "static const std::size_t column_count = {}UL;",
        mapping.out_column_count
    ));
    w.blank();
    w.line("static const char* const query_statement;");
    w.blank();

    let bind = cx.backend.bind_vector();
    function(
        w,
        "bool",
        &format!("grow (image_type&, {});", cx.backend.truncated_vector()),
    );
    function(w, "void", &format!("bind ({bind}, image_type&);"));
    function(w, "void", "init (view_type&, const image_type&, database&);");

    w.line("template<typename T>");
    function(w, "result<T>", "query (database&, const query_type&);");

    w.label("public:");
    function(
        w,
        "void",
        &format!(
            "query_ (database&,\n        const query_type&,\n        {db}::view_statements< view_type >&,\n        details::shared_ptr< {db}::select_statement >&);"
        ),
    );
    w.close(";");
    Ok(())
}
