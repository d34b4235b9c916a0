use super::{function, image};
use crate::element;
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::{Class, ContainerKind};
use relgen_core::mapping::ContainerMapping;
use relgen_core::Result;

/// Declares the traits struct of one container member.
///
/// Only containers of concrete objects have statements and functions;
/// abstract objects and composite values get the types alone.
pub(super) fn traits(
    cx: &Context<'_>,
    w: &mut Writer,
    owner: &Class,
    container: &ContainerMapping,
    full: bool,
) -> Result<()> {
    let unit = cx.unit;
    let db = cx.db();
    let desc = &container.desc;
    let member = unit.member(container.member);
    let name = container.traits_name();
    let ordered = desc.kind == ContainerKind::Ordered;
    let map = desc.kind.is_map();

    w.comment(&member.name);
    w.line(format!("struct {name}"));
    w.open();

    w.line(format!("typedef {} container_type;", unit.ty(desc.ty).name));
    w.line("typedef odb::access::container_traits< container_type > container_traits;");
    if ordered {
        w.line("typedef container_traits::index_type index_type;");
    }
    if map {
        w.line("typedef container_traits::key_type key_type;");
    }
    w.line("typedef container_traits::value_type value_type;");
    w.blank();

    let functions = if ordered {
        "ordered_functions<index_type, value_type>"
    } else if map {
        "map_functions<key_type, value_type>"
    } else {
        "set_functions<value_type>"
    };
    w.line(format!("typedef {functions} functions_type;"));

    let id_image = owner.is_object() && cx.class_mapping(owner.id)?.id.is_some();
    if owner.is_object() {
        w.line(format!("typedef {db}::container_statements< {name} > statements_type;"));
    }

    if full {
        w.blank();
        w.line(format!(
            "static const std::size_t cond_column_count = {}UL;",
            container.counts.cond
        ));
        w.line(format!(
            "static const std::size_t data_column_count = {}UL;",
            container.counts.data
        ));
    }

    if id_image {
        w.blank();
        w.line(format!(
            "typedef object_traits< {} >::id_image_type id_image_type;",
            unit.fq_name(owner)
        ));
    }

    w.blank();
    w.line("struct cond_image_type");
    w.open();
    image::part_fields(cx, w, &element::cond(container)?);
    w.blank();
    w.line("std::size_t version;");
    w.close(";");

    w.blank();
    w.line("struct data_image_type");
    w.open();
    for part in element::data(container)? {
        image::part_fields(cx, w, &part);
    }
    w.blank();
    w.line("std::size_t version;");
    w.close(";");

    if full {
        functions_of(cx, w, container, ordered, map);
    }

    w.close(";");
    Ok(())
}

fn functions_of(
    cx: &Context<'_>,
    w: &mut Writer,
    container: &ContainerMapping,
    ordered: bool,
    map: bool,
) {
    let inverse = container.inverse.is_some();
    let bind = cx.backend.bind_vector();

    w.blank();
    if !inverse {
        w.line("static const char* const insert_one_statement;");
    }
    w.line("static const char* const select_all_statement;");
    if !inverse {
        w.line("static const char* const delete_all_statement;");
    }
    w.blank();

    function(
        w,
        "void",
        &format!("bind ({bind}, id_image_type*, cond_image_type&);"),
    );
    function(
        w,
        "void",
        &format!("bind ({bind}, id_image_type*, data_image_type&);"),
    );
    function(
        w,
        "void",
        &format!("grow (data_image_type&, {});", cx.backend.truncated_vector()),
    );

    // The index is only stored when the container is ordered.
    let stored_index = container.index.is_some();

    if !inverse {
        let key = if stored_index {
            "index_type, "
        } else if map {
            "const key_type&, "
        } else {
            ""
        };
        function(
            w,
            "void",
            &format!("init (data_image_type&, {key}const value_type&);"),
        );
    }

    let key = if stored_index {
        "index_type&, "
    } else if map {
        "key_type&, "
    } else {
        ""
    };
    function(
        w,
        "void",
        &format!("init ({key}value_type&, const data_image_type&, database&);"),
    );

    let (insert_key, load_key) = if ordered {
        ("index_type, ", "index_type&, ")
    } else if map {
        ("const key_type&, ", "key_type&, ")
    } else {
        ("", "")
    };

    if !inverse {
        function(
            w,
            "void",
            &format!("insert_one ({insert_key}const value_type&, void*);"),
        );
    }
    function(
        w,
        "bool",
        &format!("load_all ({load_key}value_type&, void*);"),
    );
    if !inverse {
        function(w, "void", "delete_all (void*);");
        function(
            w,
            "void",
            "persist (const container_type&,\n         id_image_type&,\n         statements_type&);",
        );
    }
    function(
        w,
        "void",
        "load (container_type&,\n      id_image_type&,\n      statements_type&);",
    );
    if !inverse {
        function(
            w,
            "void",
            "update (const container_type&,\n        id_image_type&,\n        statements_type&);",
        );
        function(w, "void", "erase (id_image_type&, statements_type&);");
    }
}
