use super::{container, function, image, query};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::Result;
use relgen_sql::ObjectStatements;

/// Declares `object_traits` for `class`. Returns true when its query
/// columns are deferred to the second pass.
pub(super) fn traits(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<bool> {
    let unit = cx.unit;
    let db = cx.db();
    let mapping = cx.class_mapping(class.id)?;
    let name = unit.fq_name(class);
    let concrete = !class.is_abstract;
    let deferred = cx.query() && mapping.has_pointers;

    log::trace!("object traits for `{name}`");

    w.comment(&class.name);
    w.line("template <>");
    w.line(format!("class access::object_traits< {name} >"));
    w.open();
    w.label("public:");
    w.line(format!("typedef {name} object_type;"));
    w.line(format!("typedef {} pointer_type;", cx.pointer_type(class)));

    if let Some(id) = &mapping.id {
        if id.root == class.id {
            let member = unit.member(id.member);
            w.line(format!("typedef {} id_type;", cx.member_type(member)));
            w.blank();
            image::id_image_type(cx, w, id);
        } else {
            let root = cx.fq(id.root);
            w.line(format!("typedef object_traits< {root} >::id_type id_type;"));
            w.line(format!(
                "typedef object_traits< {root} >::id_image_type id_image_type;"
            ));
        }
    }

    w.blank();
    image::image_type(cx, w, class)?;

    if cx.query() {
        w.blank();
        if deferred {
            w.line("struct query_columns;");
            w.blank();
            w.line(format!("typedef {db}::query query_base_type;"));
            w.blank();
            w.line("struct query_type;");
        } else {
            query::columns(cx, w, class, "struct query_columns")?;
            w.blank();
            w.line(format!("typedef {db}::query query_base_type;"));
            w.blank();
            query::query_type(w, "struct query_type");
        }
    }

    if concrete {
        let stmts = ObjectStatements::new(mapping)?;

        w.blank();
        w.line(format!(
            "static const std::size_t in_column_count = {}UL;",
            mapping.in_column_count
        ));
        w.line(format!(
            "static const std::size_t out_column_count = {}UL;",
            mapping.out_column_count
        ));
        w.blank();
        for (name, _) in stmts.named() {
            w.line(format!("static const char* const {name};"));
        }
        if cx.query() {
            w.line("static const char* const query_clause;");
        }
    }

    for container in &mapping.containers {
        w.blank();
        container::traits(cx, w, class, container, concrete)?;
    }

    w.blank();
    w.line("struct container_statement_cache_type;");
    w.blank();

    let bind = cx.backend.bind_vector();

    if mapping.id.is_some() {
        function(w, "id_type", "id (const object_type&);");
        if cx.query() {
            function(w, "id_type", "id (const image_type&);");
        }
    }

    function(
        w,
        "bool",
        &format!("grow (image_type&, {});", cx.backend.truncated_vector()),
    );
    function(w, "void", &format!("bind ({bind}, image_type&, bool);"));

    if mapping.id.is_some() {
        function(w, "void", &format!("bind ({bind}, id_image_type&);"));
    }

    function(w, "bool", "init (image_type&, const object_type&);");
    function(w, "void", "init (object_type&, const image_type&, database&);");

    if mapping.id.is_some() {
        function(w, "void", "init (id_image_type&, const id_type&);");
    }

    if concrete {
        let persist = if mapping.auto_id() {
            "persist (database&, object_type&);"
        } else {
            "persist (database&, const object_type&);"
        };
        function(w, "void", persist);
        function(w, "void", "update (database&, const object_type&);");
        function(w, "void", "erase (database&, const id_type&);");

        if class.default_ctor {
            function(w, "pointer_type", "find (database&, const id_type&);");
        }
        function(w, "bool", "find (database&, const id_type&, object_type&);");

        if cx.query() {
            w.line("template<typename T>");
            function(w, "result<T>", "query (database&, const query_type&);");
        }

        if cx.options.embedded_schema() {
            function(
                w,
                "bool",
                "create_schema (database&, unsigned short pass, bool drop);",
            );
        }

        w.label("public:");
        let statements = format!("{db}::object_statements< object_type >&");
        function(
            w,
            "bool",
            &format!("find_ ({statements}, const id_type&);"),
        );
        function(w, "void", &format!("load_ ({statements}, object_type&);"));

        if cx.query() {
            function(
                w,
                "void",
                &format!(
                    "query_ (database&,\n        const query_type&,\n        {statements},\n        details::shared_ptr< {db}::select_statement >&);"
                ),
            );
        }
    }

    w.close(";");
    Ok(deferred)
}
