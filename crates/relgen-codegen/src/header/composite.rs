use super::{container, function, image};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::Result;

pub(super) fn traits(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<()> {
    let name = cx.unit.fq_name(class);
    let mapping = cx.class_mapping(class.id)?;
    let bind = cx.backend.bind_vector();

    log::trace!("composite value traits for `{name}`");

    w.comment(&class.name);
    w.line("template <>");
    w.line(format!("class access::composite_value_traits< {name} >"));
    w.open();
    w.label("public:");
    w.line(format!("typedef {name} value_type;"));
    w.blank();
    image::image_type(cx, w, class)?;

    for container in &mapping.containers {
        w.blank();
        container::traits(cx, w, class, container, false)?;
    }

    w.blank();
    function(
        w,
        "bool",
        &format!("grow (image_type&, {});", cx.backend.truncated_vector()),
    );
    function(w, "void", &format!("bind ({bind}, image_type&);"));
    function(w, "bool", "init (image_type&, const value_type&);");
    function(w, "void", "init (value_type&, const image_type&, database&);");
    w.close(";");
    Ok(())
}
