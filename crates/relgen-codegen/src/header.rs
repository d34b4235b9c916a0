//! The generated header: one traits specialization per persistent class
//! defined in the unit.
//!
//! Generation takes two passes. The first declares every traits class in
//! declaration order. Query columns of objects that point to other objects
//! need the traits of the pointed-to class, which may be declared later, so
//! the first pass only forward declares them and the second pass defines
//! them once every traits class exists.

mod composite;
mod container;
mod image;
mod object;
mod query;
mod view;

use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::{Class, ClassId, ClassKind, Unit};
use relgen_core::visit::{self, DeclVisitor};
use relgen_core::Result;

/// Objects whose query columns are left for the second pass.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    classes: Vec<ClassId>,
}

impl Pending {
    pub(crate) fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

pub(crate) fn generate(cx: &Context<'_>) -> Result<String> {
    let mut w = Writer::new();
    let guard = guard(cx.stem());

    w.line("// This file was generated by relgen.");
    w.line("//");
    w.blank();
    w.line(format!("#ifndef {guard}"));
    w.line(format!("#define {guard}"));
    w.blank();
    include(cx, &mut w);
    w.blank();

    w.line("namespace odb");
    w.open();
    let pending = pass1(cx, &mut w)?;
    pass2(cx, &mut w, &pending)?;
    if cx.query() {
        templates(cx, &mut w)?;
    }
    w.close("");

    w.blank();
    w.line(format!("#endif // {guard}"));

    Ok(w.finish())
}

fn include(cx: &Context<'_>, w: &mut Writer) {
    let db = cx.db();

    w.line(format!("#include \"{}\"", file_name(&cx.unit.file)));
    w.blank();
    w.line("#include <odb/details/buffer.hxx>");
    w.blank();
    w.line(format!("#include <odb/{db}/version.hxx>"));
    w.line(format!("#include <odb/{db}/forward.hxx>"));
    w.line(format!("#include <odb/{db}/{db}-types.hxx>"));

    if cx.query() {
        w.line(format!("#include <odb/{db}/query.hxx>"));
    }
}

/// Declares the traits of every persistent class defined in the unit.
pub(crate) fn pass1(cx: &Context<'_>, w: &mut Writer) -> Result<Pending> {
    let mut pass = Pass1 {
        cx,
        w,
        pending: Pending::default(),
    };
    visit::visit_unit(&mut pass, cx.unit)?;

    log::debug!("{} classes have deferred query columns", pass.pending.classes.len());
    Ok(pass.pending)
}

/// Defines the query columns deferred by the first pass. Writes nothing when
/// nothing was deferred.
pub(crate) fn pass2(cx: &Context<'_>, w: &mut Writer, pending: &Pending) -> Result<()> {
    if pending.is_empty() {
        return Ok(());
    }

    w.blank();
    w.line("// Query columns of objects that point to other objects.");
    w.line("//");

    for id in &pending.classes {
        let class = cx.unit.class(*id);
        w.blank();
        query::deferred(cx, w, class)?;
    }
    Ok(())
}

/// Defines the `query<T>` templates of concrete objects and views.
fn templates(cx: &Context<'_>, w: &mut Writer) -> Result<()> {
    visit::visit_unit(&mut Templates { cx, w }, cx.unit)
}

struct Templates<'a, 'w> {
    cx: &'a Context<'a>,
    w: &'w mut Writer,
}

impl DeclVisitor for Templates<'_, '_> {
    fn visit_class(&mut self, unit: &Unit, class: &Class) -> Result<()> {
        let queried = (class.is_object() && !class.is_abstract) || class.is_view();
        if unit.is_emitted(class) && queried {
            self.w.blank();
            query::template(self.cx, self.w, class);
        }
        Ok(())
    }
}

struct Pass1<'a, 'w> {
    cx: &'a Context<'a>,
    w: &'w mut Writer,
    pending: Pending,
}

impl DeclVisitor for Pass1<'_, '_> {
    fn visit_class(&mut self, unit: &Unit, class: &Class) -> Result<()> {
        if !unit.is_emitted(class) {
            return Ok(());
        }

        self.w.blank();

        let deferred = match &class.kind {
            ClassKind::Object => object::traits(self.cx, self.w, class),
            ClassKind::Composite => composite::traits(self.cx, self.w, class).map(|_| false),
            ClassKind::View(_) => view::traits(self.cx, self.w, class).map(|_| false),
            ClassKind::Plain => Ok(false),
        }
        .map_err(|err| err.context(format!("generating `{}`", unit.fq_name(class))))?;

        if deferred {
            self.pending.classes.push(class.id);
        }

        Ok(())
    }
}

/// Declares `static <ret>\n<decl>` followed by a blank line.
fn function(w: &mut Writer, ret: &str, decl: &str) {
    w.line(format!("static {ret}"));
    w.line(decl);
    w.blank();
}

fn guard(stem: &str) -> String {
    let mut ret: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    ret.push_str("_ODB_HXX");
    ret
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use relgen_core::graph::Scalar;
    use relgen_core::{Database, Mapping, Options};

    #[test]
    fn guards_are_identifiers() {
        assert_eq!(guard("person"), "PERSON_ODB_HXX");
        assert_eq!(guard("my-model.v2"), "MY_MODEL_V2_ODB_HXX");
    }

    #[test]
    fn class_failures_name_the_class() {
        let mut b = Unit::builder("person.hxx");
        let int = b.fundamental("int", Scalar::Int32);
        let person = b.object("Person").build();
        b.member(person, "id_", int).id();
        let unit = b.build().unwrap();

        // Mapped from a unit without `Person`
        let options = Options::new().database(Database::Sqlite);
        let empty = Unit::builder("person.hxx").build().unwrap();
        let mapping = Mapping::build(&empty, &options).unwrap();
        let cx = Context::new(&unit, &options, &mapping);

        let err = pass1(&cx, &mut Writer::new()).unwrap_err();
        assert!(err.to_string().starts_with("generating `::Person`: "));
        assert!(err.root().is_invariant_violation());
    }
}
