//! Container traits of concrete objects: statement text and the functions
//! the runtime calls while walking a container.

use super::image::{grow_one, pointer_image, pointer_value, set_image, set_value};
use super::{constant, function, unused};
use crate::element::{self, Part, PartKind};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::{Class, ContainerKind};
use relgen_core::mapping::{ContainerMapping, IdMapping};
use relgen_core::{Error, Result};
use relgen_sql::ContainerStatements;

pub(super) fn define_all(
    cx: &Context<'_>,
    w: &mut Writer,
    owner: &Class,
    container: &ContainerMapping,
    id: &IdMapping,
) -> Result<()> {
    let Some(stmts) = ContainerStatements::new(container) else {
        return Err(Error::invariant_violation(format!(
            "container `{}` of `{}` has no table",
            container.name,
            cx.unit.fq_name(owner)
        )));
    };

    let scope = format!("{}{}::", cx.scope(owner), container.traits_name());
    let member = cx.unit.member(container.member);
    let inverse = container.inverse.is_some();

    log::trace!("container functions for `{}`", member.name);

    w.comment(&member.name);

    if let Some(insert_one) = &stmts.insert_one {
        constant(w, &scope, "insert_one_statement", &cx.serializer.serialize(insert_one));
    }
    constant(
        w,
        &scope,
        "select_all_statement",
        &cx.serializer.serialize(&stmts.select_all),
    );
    if let Some(delete_all) = &stmts.delete_all {
        constant(w, &scope, "delete_all_statement", &cx.serializer.serialize(delete_all));
    }

    let container = Container {
        cx,
        scope,
        mapping: container,
        id,
        parts: element::data(container)?,
    };

    container.bind_cond(w)?;
    container.bind_data(w)?;
    container.grow(w)?;
    if !inverse {
        container.init_image(w)?;
    }
    container.init_value(w)?;
    if !inverse {
        container.insert_one(w)?;
    }
    container.load_all(w)?;
    if !inverse {
        container.delete_all(w)?;
        container.persist(w)?;
    }
    container.load(w)?;
    if !inverse {
        container.update(w)?;
        container.erase(w)?;
    }
    Ok(())
}

struct Container<'a> {
    cx: &'a Context<'a>,

    /// `access::object_traits< ::P >::tags_traits::`
    scope: String,

    mapping: &'a ContainerMapping,

    /// Id of the owning object
    id: &'a IdMapping,

    parts: Vec<Part>,
}

impl Container<'_> {
    fn ordered(&self) -> bool {
        self.mapping.desc.kind == ContainerKind::Ordered
    }

    fn map(&self) -> bool {
        self.mapping.desc.kind.is_map()
    }

    fn stored_index(&self) -> bool {
        self.mapping.index.is_some()
    }

    fn bind_object_id(&self, w: &mut Writer, count: bool) {
        w.comment("object_id");
        w.line("if (p != 0)");
        w.open();
        w.line("id_image_type& id (*p);");
        self.cx.backend.bind(w, "id.", &self.id.var, self.id.scalar);
        if count {
            w.line("n++;");
        }
        w.close("");
    }

    fn bind_cond(&self, w: &mut Writer) -> Result<()> {
        let bind = self.cx.backend.bind_vector();

        function(
            w,
            "void",
            &self.scope,
            &format!("bind ({bind} b,\n      id_image_type* p,\n      cond_image_type& c)"),
            |w| {
                unused(w, &["c"]);
                w.line("std::size_t n (0);");
                w.blank();
                self.bind_object_id(w, false);
                Ok(())
            },
        )
    }

    fn bind_data(&self, w: &mut Writer) -> Result<()> {
        let bind = self.cx.backend.bind_vector();

        function(
            w,
            "void",
            &self.scope,
            &format!("bind ({bind} b,\n      id_image_type* p,\n      data_image_type& d)"),
            |w| {
                w.line("std::size_t n (0);");
                w.blank();
                self.bind_object_id(w, true);

                for part in &self.parts {
                    w.blank();
                    w.comment(part.name);
                    match part.kind {
                        PartKind::Simple(scalar) | PartKind::Pointer { scalar, .. } => {
                            self.cx.backend.bind(w, "d.", &part.var, scalar);
                            w.line("n++;");
                        }
                        PartKind::Composite { class, columns } => {
                            let traits = self.cx.traits(self.cx.unit.class(class));
                            w.line(format!("{traits}::bind (b + n, d.{}value);", part.var));
                            w.line(format!("n += {columns}UL;"));
                        }
                    }
                }
                Ok(())
            },
        )
    }

    fn grow(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            &format!(
                "grow (data_image_type& i, {} t)",
                self.cx.backend.truncated_vector()
            ),
            |w| {
                w.line("bool grew (false);");

                let mut offset = 0;
                for part in &self.parts {
                    let image = format!("i.{}", part.var);

                    w.blank();
                    w.comment(part.name);
                    match part.kind {
                        PartKind::Simple(scalar) | PartKind::Pointer { scalar, .. } => {
                            grow_one(w, &image, scalar, offset)
                        }
                        PartKind::Composite { class, .. } => {
                            let traits = self.cx.traits(self.cx.unit.class(class));
                            w.line(format!("if ({traits}::grow (\n      {image}value, t + {offset}UL))"));
                            w.line("  grew = true;");
                        }
                    }
                    offset += part.columns();
                }

                w.blank();
                w.line("if (grew)");
                w.line("  i.version++;");
                Ok(())
            },
        )
    }

    /// Parameter list prefix naming the index or key, e.g. `index_type j, `.
    fn key_param(&self, by_ref: bool) -> &'static str {
        match (self.stored_index(), self.map(), by_ref) {
            (true, _, false) => "index_type j, ",
            (true, _, true) => "index_type& j, ",
            (false, true, false) => "const key_type& k, ",
            (false, true, true) => "key_type& k, ",
            (false, false, _) => "",
        }
    }

    fn source(part: &Part) -> &'static str {
        match part.name {
            "index" => "j",
            "key" => "k",
            _ => "v",
        }
    }

    fn init_image(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            &format!(
                "init (data_image_type& i, {}const value_type& v)",
                self.key_param(false)
            ),
            |w| {
                w.line("bool grew (false);");

                for part in &self.parts {
                    let image = format!("i.{}", part.var);
                    let src = Self::source(part);

                    w.blank();
                    w.comment(part.name);
                    match part.kind {
                        PartKind::Simple(scalar) => {
                            w.open();
                            set_image(self.cx, w, &part.ty(), &image, scalar, src, true);
                            w.close("");
                        }
                        PartKind::Pointer { class, scalar } => {
                            w.open();
                            let pointee = self.cx.fq(class);
                            pointer_image(self.cx, w, &pointee, &part.ty(), &image, scalar, src);
                            w.close("");
                        }
                        PartKind::Composite { class, .. } => {
                            let traits = self.cx.traits(self.cx.unit.class(class));
                            w.line(format!("if ({traits}::init ({image}value, {src}))"));
                            w.line("  grew = true;");
                        }
                    }
                }

                w.blank();
                w.line("if (grew)");
                w.line("  i.version++;");
                Ok(())
            },
        )
    }

    fn init_value(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            &format!(
                "init ({}value_type& v,\n      const data_image_type& i,\n      database& db)",
                self.key_param(true)
            ),
            |w| {
                unused(w, &["db"]);

                for part in &self.parts {
                    let image = format!("i.{}", part.var);
                    let dst = Self::source(part);

                    w.blank();
                    w.comment(part.name);
                    match part.kind {
                        PartKind::Simple(scalar) => {
                            set_value(self.cx, w, &part.ty(), &image, scalar, dst)
                        }
                        PartKind::Pointer { class, scalar } => {
                            w.open();
                            let pointee = self.cx.fq(class);
                            pointer_value(self.cx, w, &pointee, &part.ty(), &image, scalar, dst);
                            w.close("");
                        }
                        PartKind::Composite { class, .. } => {
                            let traits = self.cx.traits(self.cx.unit.class(class));
                            w.line(format!("{traits}::init ({dst}, {image}value, db);"));
                        }
                    }
                }
                Ok(())
            },
        )
    }

    /// Index or key parameters of the runtime callbacks. Ordered containers
    /// always receive an index, stored or not.
    fn callback_params(&self, by_ref: bool) -> (&'static str, &'static str) {
        match (self.ordered(), self.map(), by_ref) {
            (true, _, false) => ("index_type i, ", "i"),
            (true, _, true) => ("index_type& i, ", "i"),
            (false, true, false) => ("const key_type& k, ", "k"),
            (false, true, true) => ("key_type& k, ", "k"),
            (false, false, _) => ("", ""),
        }
    }

    /// Arguments passed on to `init`, plus a parameter `init` ignores.
    fn init_args(&self) -> (&'static str, Option<&'static str>) {
        match (self.ordered(), self.stored_index(), self.map()) {
            (true, true, _) => ("i, ", None),
            (true, false, _) => ("", Some("i")),
            (false, _, true) => ("k, ", None),
            (false, _, false) => ("", None),
        }
    }

    fn insert_one(&self, w: &mut Writer) -> Result<()> {
        let (params, _) = self.callback_params(false);
        let (args, ignored) = self.init_args();
        let db = self.cx.db();

        function(
            w,
            "void",
            &self.scope,
            &format!("insert_one ({params}const value_type& v, void* d)"),
            |w| {
                if let Some(ignored) = ignored {
                    unused(w, &[ignored]);
                }
                w.line(format!("using namespace {db};"));
                w.blank();
                w.line("statements_type& sts (*static_cast< statements_type* > (d));");
                w.line("binding& b (sts.data_image_binding ());");
                w.line("data_image_type& di (sts.data_image ());");
                w.blank();
                w.line(format!("init (di, {args}v);"));
                w.blank();
                w.line("if (di.version != sts.data_image_version () || b.version == 0)");
                w.open();
                w.line("bind (b.bind, sts.id_image (), di);");
                w.line("sts.data_image_version (di.version);");
                w.line("b.version++;");
                w.close("");
                w.blank();
                w.line("if (!sts.insert_one_statement ().execute ())");
                w.line("  throw object_already_persistent ();");
                Ok(())
            },
        )
    }

    fn load_all(&self, w: &mut Writer) -> Result<()> {
        let (params, _) = self.callback_params(true);
        let (args, ignored) = self.init_args();
        let db = self.cx.db();

        function(
            w,
            "bool",
            &self.scope,
            &format!("load_all ({params}value_type& v, void* d)"),
            |w| {
                if let Some(ignored) = ignored {
                    unused(w, &[ignored]);
                }
                w.line(format!("using namespace {db};"));
                w.blank();
                w.line("statements_type& sts (*static_cast< statements_type* > (d));");
                w.line("data_image_type& di (sts.data_image ());");
                w.line(format!("init ({args}v, di, sts.db ());"));
                w.blank();
                w.line("select_statement& st (sts.select_all_statement ());");
                w.line("select_statement::result r (st.fetch ());");
                w.blank();
                refetch(w);
                w.blank();
                w.line("if (r == select_statement::no_data)");
                w.open();
                w.line("st.free_result ();");
                w.line("return false;");
                w.close("");
                w.blank();
                w.line("return true;");
                Ok(())
            },
        )
    }

    fn delete_all(&self, w: &mut Writer) -> Result<()> {
        let db = self.cx.db();

        function(w, "void", &self.scope, "delete_all (void* d)", |w| {
            w.line(format!("using namespace {db};"));
            w.blank();
            w.line("statements_type& sts (*static_cast< statements_type* > (d));");
            w.line("sts.delete_all_statement ().execute ();");
            Ok(())
        })
    }

    fn persist(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            "persist (const container_type& c,\n         id_image_type& id,\n         statements_type& sts)",
            |w| {
                w.line(format!("using namespace {};", self.cx.db()));
                w.blank();
                bind_data_id(w);
                w.blank();
                self.functions(w);
                w.line("container_traits::persist (c, fs);");
                Ok(())
            },
        )
    }

    fn load(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            "load (container_type& c,\n      id_image_type& id,\n      statements_type& sts)",
            |w| {
                w.line(format!("using namespace {};", self.cx.db()));
                w.blank();
                bind_cond_id(w);
                w.blank();
                w.line("select_statement& st (sts.select_all_statement ());");
                w.line("st.execute ();");
                w.line("select_statement::result r (st.fetch ());");
                w.blank();
                w.line("data_image_type& di (sts.data_image ());");
                refetch(w);
                w.blank();
                w.line("bool more (r != select_statement::no_data);");
                w.blank();
                w.line("if (!more)");
                w.line("  st.free_result ();");
                w.blank();
                self.functions(w);
                w.line("container_traits::load (c, more, fs);");
                Ok(())
            },
        )
    }

    fn update(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            "update (const container_type& c,\n        id_image_type& id,\n        statements_type& sts)",
            |w| {
                w.line(format!("using namespace {};", self.cx.db()));
                w.blank();
                bind_data_id(w);
                w.blank();
                bind_cond_id(w);
                w.blank();
                self.functions(w);
                w.line("container_traits::update (c, fs);");
                Ok(())
            },
        )
    }

    fn erase(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            "erase (id_image_type& id, statements_type& sts)",
            |w| {
                w.line(format!("using namespace {};", self.cx.db()));
                w.blank();
                bind_cond_id(w);
                w.blank();
                self.functions(w);
                w.line("container_traits::erase (fs);");
                Ok(())
            },
        )
    }

    fn functions(&self, w: &mut Writer) {
        w.line("sts.id_image (id);");
        w.line("functions_type& fs (sts.functions ());");
        if self.ordered() {
            let ordered = if self.mapping.desc.ordered { "true" } else { "false" };
            w.line(format!("fs.ordered ({ordered});"));
        }
    }
}

fn bind_data_id(w: &mut Writer) {
    w.line("binding& b (sts.data_image_binding ());");
    w.line("if (id.version != sts.data_id_image_version () || b.version == 0)");
    w.open();
    w.line("bind (b.bind, &id, sts.data_image ());");
    w.line("sts.data_id_image_version (id.version);");
    w.line("b.version++;");
    w.close("");
}

fn bind_cond_id(w: &mut Writer) {
    w.line("binding& cb (sts.cond_image_binding ());");
    w.line("if (id.version != sts.cond_id_image_version () || cb.version == 0)");
    w.open();
    w.line("bind (cb.bind, &id, sts.cond_image ());");
    w.line("sts.cond_id_image_version (id.version);");
    w.line("cb.version++;");
    w.close("");
}

/// Regrows the data image after a truncated fetch and fetches the row
/// again. Expects `st`, `r` and `di` in scope.
fn refetch(w: &mut Writer) {
    w.line("if (r == select_statement::truncated)");
    w.open();
    w.line("grow (di, sts.data_image_truncated ());");
    w.blank();
    w.line("if (di.version != sts.data_image_version ())");
    w.open();
    w.line("binding& b (sts.data_image_binding ());");
    w.line("bind (b.bind, 0, di);");
    w.line("sts.data_image_version (di.version);");
    w.line("b.version++;");
    w.line("st.refetch ();");
    w.close("");
    w.close("");
}
