use crate::columns::{query_columns, QueryColumn};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::{Class, Inherits, Unit};
use relgen_core::visit::{self, InheritsVisitor};
use relgen_core::Result;

/// Writes the query columns struct introduced by `head`, e.g.
/// `struct query_columns`.
pub(super) fn columns(cx: &Context<'_>, w: &mut Writer, class: &Class, head: &str) -> Result<()> {
    let bases = visit::inherits(&mut ObjectBases { cx }, cx.unit, class)?;

    w.line(format!("{head}{}", bases.concat()));
    w.open();
    w.line("static const char table[];");
    declare(cx, w, &query_columns(cx, class)?);
    w.close(";");
    Ok(())
}

pub(super) fn query_type(w: &mut Writer, head: &str) {
    w.line(format!("{head}: query_base_type, query_columns"));
    w.open();
    w.line("query_type ();");
    w.line("query_type (const std::string&);");
    w.line("query_type (const query_base_type&);");
    w.close(";");
}

/// Second-pass definitions of query columns the first pass only declared.
pub(super) fn deferred(cx: &Context<'_>, w: &mut Writer, class: &Class) -> Result<()> {
    let scope = cx.scope(class);

    w.comment(&class.name);
    columns(cx, w, class, &format!("struct {scope}query_columns"))?;
    w.blank();
    query_type(w, &format!("struct {scope}query_type"));
    Ok(())
}

/// Defines the `query<T>` member template of an object or view. Templates
/// are instantiated by the caller, so the definition stays in the header.
pub(super) fn template(cx: &Context<'_>, w: &mut Writer, class: &Class) {
    let db = cx.db();
    let (statements, result) = if class.is_view() {
        ("view_statements< view_type >", "view_result_impl")
    } else {
        ("object_statements< object_type >", "object_result_impl")
    };
    let find = if class.is_view() {
        "find_view<view_type>"
    } else {
        "find_object<object_type>"
    };

    w.line("template<typename T>");
    w.line(format!("inline result<T> {}", cx.scope(class)));
    w.line("query (database& db, const query_type& q)");
    w.open();
    w.line(format!("using namespace {db};"));
    w.blank();
    w.line(format!("{db}::connection& conn ("));
    w.line(format!("  {db}::transaction::current ().connection ());"));
    w.line(format!("{statements}& sts ("));
    w.line(format!("  conn.statement_cache ().{find} ());"));
    w.line("details::shared_ptr< select_statement > st;");
    w.blank();
    w.line("query_ (db, q, sts, st);");
    w.blank();
    w.line(format!("details::shared_ptr< {result}<T> > r ("));
    w.line(format!("  new (details::shared) {result}<T> (q, st, sts));"));
    w.blank();
    w.line("return result<T> (r);");
    w.close("");
}

fn declare(cx: &Context<'_>, w: &mut Writer, columns: &[QueryColumn]) {
    for column in columns {
        w.blank();

        match column {
            QueryColumn::Column {
                name, ty, scalar, ..
            } => {
                w.comment(name);
                w.line(format!("static const {}", QueryColumn::column_type(cx, ty, *scalar)));
                w.line(format!("{name};"));
            }
            QueryColumn::Composite {
                name,
                class,
                columns,
            } => {
                w.comment(name);
                w.line(format!("struct {class}"));
                w.open();
                w.line(format!("{class} ()"));
                w.line("{");
                w.line("}");
                declare(cx, w, columns);
                w.close(";");
                w.blank();
                w.line(format!("static const {class} {name};"));
            }
        }
    }
}

/// `: object_traits< ::Base >::query_columns` clauses for object bases.
/// Composite bases have their columns flattened instead.
struct ObjectBases<'a> {
    cx: &'a Context<'a>,
}

impl InheritsVisitor for ObjectBases<'_> {
    type State = Vec<String>;

    fn visit_base(
        &mut self,
        _unit: &Unit,
        inherits: &Inherits,
        base: &Class,
        clauses: &mut Vec<String>,
    ) -> Result<()> {
        if !base.is_object() {
            return Ok(());
        }

        let sep = if clauses.is_empty() { ": " } else { ", " };
        let virtual_ = if inherits.is_virtual { "virtual " } else { "" };
        clauses.push(format!("{sep}{virtual_}{}::query_columns", self.cx.traits(base)));
        Ok(())
    }
}
