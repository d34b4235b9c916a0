//! The generated source: statement text, image conversions and the
//! persistence functions of every persistent class defined in the unit.

mod composite;
mod container;
mod image;
mod object;
mod query;
mod schema;
mod view;

use crate::writer::{self, Writer};
use crate::Context;

use relgen_core::graph::{Class, ClassKind, Unit};
use relgen_core::visit::{self, DeclVisitor};
use relgen_core::Result;
use relgen_sql::SchemaGenerator;

pub(crate) fn generate(cx: &Context<'_>) -> Result<String> {
    let mut w = Writer::new();

    w.line("// This file was generated by relgen.");
    w.line("//");
    w.blank();
    include(cx, &mut w);
    w.blank();

    let schema = if cx.options.embedded_schema() {
        Some(SchemaGenerator::new(cx.unit, cx.mapping, cx.options.db())?)
    } else {
        None
    };

    w.line("namespace odb");
    w.open();
    visit::visit_unit(
        &mut Definitions {
            cx,
            w: &mut w,
            schema: schema.as_ref(),
        },
        cx.unit,
    )?;
    w.close("");

    Ok(w.finish())
}

fn include(cx: &Context<'_>, w: &mut Writer) {
    let db = cx.db();

    w.line(format!("#include \"{}-odb.hxx\"", cx.stem()));
    w.blank();
    w.line("#include <cassert>");
    w.line("#include <cstring>");
    w.blank();
    w.line("#include <odb/cache-traits.hxx>");
    w.line("#include <odb/details/shared-ptr.hxx>");
    w.line("#include <odb/details/unused.hxx>");
    if cx.options.embedded_schema() {
        w.line("#include <odb/schema-catalog-impl.hxx>");
    }
    w.blank();

    for header in [
        "binding",
        "traits",
        "database",
        "transaction",
        "connection",
        "statement",
        "statement-cache",
        "object-statements",
        "container-statements",
        "exceptions",
    ] {
        w.line(format!("#include <odb/{db}/{header}.hxx>"));
    }

    if cx.query() {
        w.line(format!("#include <odb/{db}/result.hxx>"));
        w.line(format!("#include <odb/{db}/view-statements.hxx>"));
    }
}

struct Definitions<'a, 'w> {
    cx: &'a Context<'a>,
    w: &'w mut Writer,

    /// Present when the schema is compiled into the source
    schema: Option<&'a SchemaGenerator<'a>>,
}

impl DeclVisitor for Definitions<'_, '_> {
    fn visit_class(&mut self, unit: &Unit, class: &Class) -> Result<()> {
        if !unit.is_emitted(class) {
            return Ok(());
        }

        self.w.blank();

        let res = match &class.kind {
            ClassKind::Object => object::define(self.cx, self.w, self.schema, class),
            ClassKind::Composite => composite::define(self.cx, self.w, class),
            ClassKind::View(_) => view::define(self.cx, self.w, class),
            ClassKind::Plain => Ok(()),
        };
        res.map_err(|err| err.context(format!("generating `{}`", unit.fq_name(class))))
    }
}

/// Writes an out-of-class function definition.
fn function(
    w: &mut Writer,
    ret: &str,
    scope: &str,
    signature: &str,
    body: impl FnOnce(&mut Writer) -> Result<()>,
) -> Result<()> {
    w.line(format!("{ret} {scope}"));
    w.line(signature);
    w.open();
    body(w)?;
    w.close("");
    w.blank();
    Ok(())
}

/// Defines a statement constant declared as `static const char* const`.
fn constant(w: &mut Writer, scope: &str, name: &str, text: &str) {
    w.line(format!("const char* const {scope}{name} ="));

    let mut lines = writer::literal(text);
    if let Some(last) = lines.last_mut() {
        last.push(';');
    }
    w.indented(|w| {
        for line in &lines {
            w.line(line);
        }
    });
    w.blank();
}

/// Marks parameters that a body may not use.
fn unused(w: &mut Writer, names: &[&str]) {
    for name in names {
        w.line(format!("ODB_POTENTIALLY_UNUSED ({name});"));
    }
    w.blank();
}
