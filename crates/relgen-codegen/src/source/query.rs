use crate::columns::{query_columns, QueryColumn};
use crate::writer::{self, Writer};
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::Result;

/// Defines the static members of an object's query columns.
pub(super) fn columns(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<()> {
    let scope = format!("{}query_columns::", cx.scope(class));
    let table = cx.serializer.ident(&cx.table(class)?);

    w.line(format!("const char {scope}table[] = {};", literal(&table)));
    w.blank();

    define(cx, w, &scope, &query_columns(cx, class)?);
    Ok(())
}

fn define(cx: &Context<'_>, w: &mut Writer, scope: &str, columns: &[QueryColumn]) {
    for column in columns {
        match column {
            QueryColumn::Column {
                name,
                column,
                ty,
                scalar,
            } => {
                w.line(format!("const {}", QueryColumn::column_type(cx, ty, *scalar)));
                w.line(scope);
                w.line(format!("{name} (table, {}, 0);", literal(column)));
                w.blank();
            }
            QueryColumn::Composite {
                name,
                class,
                columns,
            } => {
                define(cx, w, &format!("{scope}{class}::"), columns);

                w.line(format!("const {scope}{class}"));
                w.line(format!("{scope}{name};"));
                w.blank();
            }
        }
    }
}

/// Constructors of `query_type`, declared in the header as forwarding to
/// `query_base_type`.
pub(super) fn query_type(w: &mut Writer, scope: &str) {
    let scope = format!("{scope}query_type::");

    w.line(&scope);
    w.line("query_type ()");
    w.line("{");
    w.line("}");
    w.blank();

    for param in ["const std::string& q", "const query_base_type& q"] {
        w.line(&scope);
        w.line(format!("query_type ({param})"));
        w.line("  : query_base_type (q)");
        w.line("{");
        w.line("}");
        w.blank();
    }
}

/// A single-line identifier as a C++ string literal.
fn literal(text: &str) -> String {
    writer::literal(text).concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_identifiers_are_escaped() {
        assert_eq!(literal("\"Person\""), "\"\\\"Person\\\"\"");
        assert_eq!(literal("`Person`"), "\"`Person`\"");
    }
}
