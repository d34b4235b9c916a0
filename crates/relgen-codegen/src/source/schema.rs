//! Schema creation compiled into the generated source and registered with
//! the runtime's schema catalog.

use super::{function, unused};
use crate::writer::{self, Writer};
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::Result;
use relgen_sql::schema::ClassSchema;
use relgen_sql::SchemaGenerator;

pub(super) fn create_schema(
    cx: &Context<'_>,
    w: &mut Writer,
    schema: &SchemaGenerator<'_>,
    class: &Class,
) -> Result<()> {
    let ClassSchema { drop, create } = schema.class(class.id)?;

    function(
        w,
        "bool",
        &cx.scope(class),
        "create_schema (database& db, unsigned short pass, bool drop)",
        |w| {
            unused(w, &["db", "pass", "drop"]);

            w.line("if (drop)");
            w.open();
            passes(w, &drop);
            w.close("");
            w.line("else");
            w.open();
            passes(w, &create);
            w.close("");
            w.blank();
            w.line("return false;");
            Ok(())
        },
    )?;

    let entry = cx.unit.fq_name(class).trim_start_matches("::").replace("::", "_");

    w.line("static const schema_catalog_entry");
    w.line(format!("schema_catalog_entry_{entry}_ ("));
    w.indented(|w| {
        w.line(format!("id_{},", cx.db()));
        w.line("\"\",");
        w.line(format!("&{}create_schema);", cx.scope(class)));
    });
    w.blank();
    Ok(())
}

/// A switch over both passes. Each pass returns whether another pass
/// follows; empty passes are left to the trailing `return false`.
fn passes(w: &mut Writer, stmts: &[Vec<String>; 2]) {
    let [first, second] = stmts;

    if first.is_empty() && second.is_empty() {
        return;
    }

    w.line("switch (pass)");
    w.open();
    for (pass, stmts) in stmts.iter().enumerate() {
        let more = pass == 0 && !second.is_empty();
        if stmts.is_empty() && !more {
            continue;
        }

        w.line(format!("case {}:", pass + 1));
        w.open();
        for stmt in stmts {
            execute(w, stmt);
        }
        w.line(format!("return {more};"));
        w.close("");
    }
    w.close("");
}

fn execute(w: &mut Writer, stmt: &str) {
    let mut lines = writer::literal(stmt);
    if let Some(last) = lines.last_mut() {
        last.push_str(");");
    }

    w.line("db.execute (");
    w.indented(|w| {
        for line in &lines {
            w.line(line);
        }
    });
}
