use super::image::{self, set_image, set_value, Body};
use super::{constant, container, function, query, schema, unused};
use crate::writer::Writer;
use crate::Context;

use relgen_core::graph::Class;
use relgen_core::mapping::{ClassMapping, IdMapping};
use relgen_core::Result;
use relgen_sql::{ObjectStatements, SchemaGenerator};

/// Defines the out-of-class members of `object_traits` for `class`.
pub(super) fn define(
    cx: &Context<'_>,
    w: &mut Writer,
    schema: Option<&SchemaGenerator<'_>>,
    class: &Class,
) -> Result<()> {
    let mapping = cx.class_mapping(class.id)?;
    let object = Object {
        cx,
        scope: cx.scope(class),
        class,
        mapping,
        concrete: !class.is_abstract,
    };

    log::trace!("object definitions for `{}`", cx.unit.fq_name(class));

    w.comment(&class.name);

    if object.concrete {
        object.statements(w)?;
    }

    if cx.query() {
        query::columns(cx, w, class)?;
        query::query_type(w, &object.scope);
    }

    if let Some(id) = &mapping.id {
        object.id(w, id)?;
    }
    object.grow(w)?;
    object.bind(w)?;
    object.init(w)?;
    if let Some(id) = &mapping.id {
        object.id_image(w, id)?;
    }

    if !object.concrete {
        return Ok(());
    }

    // `Mapping::build` rejects objects without an id.
    let Some(id) = &mapping.id else {
        return Ok(());
    };

    for container in &mapping.containers {
        container::define_all(cx, w, class, container, id)?;
    }
    object.container_cache(w);

    object.persist(w, id)?;
    object.update(w, id)?;
    object.erase(w)?;
    if class.default_ctor {
        object.find_pointer(w)?;
    }
    object.find(w)?;
    object.find_(w)?;
    object.load_(w, id)?;

    if cx.query() {
        object.query_(w)?;
    }

    if let Some(schema) = schema {
        schema::create_schema(cx, w, schema, class)?;
    }
    Ok(())
}

struct Object<'a> {
    cx: &'a Context<'a>,

    /// `access::object_traits< ::P >::`
    scope: String,

    class: &'a Class,
    mapping: &'a ClassMapping,
    concrete: bool,
}

impl Object<'_> {
    fn statements(&self, w: &mut Writer) -> Result<()> {
        let stmts = ObjectStatements::new(self.mapping)?;

        for (name, stmt) in stmts.named() {
            constant(w, &self.scope, name, &self.cx.serializer.serialize(stmt));
        }

        if self.cx.query() {
            let mut clause = self.cx.serializer.serialize(&stmts.query);
            clause.push(' ');
            constant(w, &self.scope, "query_clause", &clause);
        }
        Ok(())
    }

    fn id(&self, w: &mut Writer, id: &IdMapping) -> Result<()> {
        let member = self.cx.unit.member(id.member);
        let ret = format!("{}id_type", self.scope);

        function(w, &ret, &self.scope, "id (const object_type& o)", |w| {
            w.line(format!("return o.{};", member.name));
            Ok(())
        })?;

        if self.cx.query() {
            function(w, &ret, &self.scope, "id (const image_type& i)", |w| {
                w.line("id_type id;");
                set_value(self.cx, w, "id_type", &format!("i.{}", id.var), id.scalar, "id");
                w.line("return id;");
                Ok(())
            })?;
        }
        Ok(())
    }

    fn grow(&self, w: &mut Writer) -> Result<()> {
        let signature = format!(
            "grow (image_type& i, {} t)",
            self.cx.backend.truncated_vector()
        );

        function(w, "bool", &self.scope, &signature, |w| {
            unused(w, &["i", "t"]);
            w.line("bool grew (false);");
            image::members(self.cx, w, self.class, Body::Grow)?;
            w.blank();
            w.line("return grew;");
            Ok(())
        })
    }

    fn bind(&self, w: &mut Writer) -> Result<()> {
        let bind = self.cx.backend.bind_vector();

        function(
            w,
            "void",
            &self.scope,
            &format!("bind ({bind} b,\n      image_type& i,\n      bool out)"),
            |w| {
                unused(w, &["out"]);
                w.line("std::size_t n (0);");
                image::members(self.cx, w, self.class, Body::Bind)
            },
        )?;

        if let Some(id) = &self.mapping.id {
            function(
                w,
                "void",
                &self.scope,
                &format!("bind ({bind} b, id_image_type& i)"),
                |w| {
                    w.line("std::size_t n (0);");
                    self.cx.backend.bind(w, "i.", &id.var, id.scalar);
                    Ok(())
                },
            )?;
        }
        Ok(())
    }

    fn init(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "bool",
            &self.scope,
            "init (image_type& i, const object_type& o)",
            |w| {
                unused(w, &["i", "o"]);
                w.line("bool grew (false);");
                image::members(self.cx, w, self.class, Body::InitImage)?;
                w.blank();
                w.line("return grew;");
                Ok(())
            },
        )?;

        function(
            w,
            "void",
            &self.scope,
            "init (object_type& o, const image_type& i, database& db)",
            |w| {
                unused(w, &["o", "i", "db"]);
                image::members(self.cx, w, self.class, Body::InitValue)
            },
        )
    }

    fn id_image(&self, w: &mut Writer, id: &IdMapping) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            "init (id_image_type& i, const id_type& id)",
            |w| {
                w.line("bool grew (false);");
                w.open();
                set_image(self.cx, w, "id_type", &format!("i.{}", id.var), id.scalar, "id", true);
                w.close("");
                w.blank();
                w.line("if (grew)");
                w.line("  i.version++;");
                Ok(())
            },
        )
    }

    /// Defines the per-connection cache of container statements.
    fn container_cache(&self, w: &mut Writer) {
        let db = self.cx.db();
        let name = format!("{}container_statement_cache_type", self.scope);

        w.line(format!("struct {name}"));
        w.open();
        for container in &self.mapping.containers {
            w.line(format!(
                "{db}::container_statements_impl< {} > {};",
                container.traits_name(),
                container.name
            ));
        }
        if !self.mapping.containers.is_empty() {
            w.blank();
        }

        w.line("container_statement_cache_type (");
        w.line(format!("  {db}::connection& c)"));
        for (i, container) in self.mapping.containers.iter().enumerate() {
            let sep = if i == 0 { ":" } else { "," };
            w.line(format!("{sep} {} (c)", container.name));
        }
        w.line("{");
        if self.mapping.containers.is_empty() {
            w.line("  ODB_POTENTIALLY_UNUSED (c);");
        }
        w.line("}");
        w.close(";");
        w.blank();
    }

    fn preamble(&self, w: &mut Writer) {
        let db = self.cx.db();

        w.line(format!("using namespace {db};"));
        w.blank();
        w.line(format!("{db}::connection& conn ("));
        w.line(format!("  {db}::transaction::current ().connection ());"));
        w.line("object_statements< object_type >& sts (");
        w.line("  conn.statement_cache ().find_object<object_type> ());");
    }

    /// Initializes the id image from `src` and rebinds it if it changed.
    fn id_binding(&self, w: &mut Writer, src: &str) {
        w.line("id_image_type& i (sts.id_image ());");
        w.line(format!("init (i, {src});"));
        w.blank();
        w.line("binding& idb (sts.id_image_binding ());");
        w.line("if (i.version != sts.id_image_version () || idb.version == 0)");
        w.open();
        w.line("bind (idb.bind, i);");
        w.line("sts.id_image_version (i.version);");
        w.line("idb.version++;");
        w.close("");
    }

    /// Calls `call` on the traits of every container, e.g. `persist`.
    fn containers(&self, w: &mut Writer, call: &str, with_value: bool) {
        for container in &self.mapping.containers {
            if container.inverse.is_some() && call != "load" {
                continue;
            }

            let traits = container.traits_name();
            let cache = format!("sts.container_statement_cache ().{}", container.name);
            let access = self.cx.access("obj", &container.path);

            w.blank();
            w.line(format!("{traits}::{call} ("));
            w.indented(|w| {
                if with_value {
                    w.line(format!("{access},"));
                }
                w.line("i,");
                w.line(format!("{cache});"));
            });
        }
    }

    fn has_writable_containers(&self) -> bool {
        self.mapping
            .containers
            .iter()
            .any(|container| container.inverse.is_none())
    }

    fn persist(&self, w: &mut Writer, id: &IdMapping) -> Result<()> {
        let auto = self.mapping.auto_id();
        let signature = if auto {
            "persist (database&, object_type& obj)"
        } else {
            "persist (database&, const object_type& obj)"
        };

        function(w, "void", &self.scope, signature, |w| {
            self.preamble(w);
            w.blank();
            w.line("image_type& im (sts.image ());");
            w.line("binding& imb (sts.insert_image_binding ());");
            w.blank();
            w.line("if (init (im, obj))");
            w.line("  im.version++;");
            w.blank();
            w.line("if (im.version != sts.insert_image_version () || imb.version == 0)");
            w.open();
            w.line("bind (imb.bind, im, false);");
            w.line("sts.insert_image_version (im.version);");
            w.line("imb.version++;");
            w.close("");
            w.blank();
            w.line("insert_statement& st (sts.persist_statement ());");
            w.line("if (!st.execute ())");
            w.line("  throw object_already_persistent ();");

            let member = &self.cx.unit.member(id.member).name;
            if auto {
                w.blank();
                w.line(format!("obj.{member} = static_cast< id_type > (st.id ());"));
            }

            if self.has_writable_containers() {
                w.blank();
                self.id_binding(w, &format!("obj.{member}"));
                self.containers(w, "persist", true);
            }
            Ok(())
        })
    }

    fn update(&self, w: &mut Writer, id: &IdMapping) -> Result<()> {
        let has_update = ObjectStatements::new(self.mapping)?.update.is_some();
        let containers = self.has_writable_containers();
        let member = &self.cx.unit.member(id.member).name;

        function(
            w,
            "void",
            &self.scope,
            "update (database& db, const object_type& obj)",
            |w| {
                if !has_update && !containers {
                    unused(w, &["db", "obj"]);
                    return Ok(());
                }

                unused(w, &["db"]);
                self.preamble(w);
                w.blank();
                w.line("id_image_type& i (sts.id_image ());");
                w.line(format!("init (i, obj.{member});"));

                if has_update {
                    w.blank();
                    w.line("image_type& im (sts.image ());");
                    w.line("if (init (im, obj))");
                    w.line("  im.version++;");
                    w.blank();
                    w.line("binding& imb (sts.update_image_binding ());");
                    w.line("if (im.version != sts.update_image_version () ||");
                    w.line("    i.version != sts.update_id_image_version () ||");
                    w.line("    imb.version == 0)");
                    w.open();
                    w.line("bind (imb.bind, im, false);");
                    w.line("bind (imb.bind + in_column_count, i);");
                    w.line("sts.update_image_version (im.version);");
                    w.line("sts.update_id_image_version (i.version);");
                    w.line("imb.version++;");
                    w.close("");
                    w.blank();
                    w.line("if (sts.update_statement ().execute () == 0)");
                    w.line("  throw object_not_persistent ();");
                }

                if containers {
                    w.blank();
                    w.line("binding& idb (sts.id_image_binding ());");
                    w.line("if (i.version != sts.id_image_version () || idb.version == 0)");
                    w.open();
                    w.line("bind (idb.bind, i);");
                    w.line("sts.id_image_version (i.version);");
                    w.line("idb.version++;");
                    w.close("");
                    self.containers(w, "update", true);
                }
                Ok(())
            },
        )
    }

    fn erase(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "void",
            &self.scope,
            "erase (database& db, const id_type& id)",
            |w| {
                self.preamble(w);
                w.blank();
                self.id_binding(w, "id");
                self.containers(w, "erase", false);
                w.blank();
                w.line("if (sts.erase_statement ().execute () != 1)");
                w.line("  throw object_not_persistent ();");
                w.blank();
                w.line("pointer_cache_traits< pointer_type >::erase (db, id);");
                Ok(())
            },
        )
    }

    fn find_pointer(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            &format!("{}pointer_type", self.scope),
            &self.scope,
            "find (database& db, const id_type& id)",
            |w| {
                self.preamble(w);
                w.blank();
                w.line("object_statements< object_type >::auto_lock l (sts);");
                w.blank();
                w.line("if (l.locked ())");
                w.open();
                w.line("if (!find_ (sts, id))");
                w.line("  return pointer_type ();");
                w.close("");
                w.blank();
                w.line("pointer_type p (");
                w.line("  access::object_factory< object_type, pointer_type >::create ());");
                w.line("pointer_traits< pointer_type >::guard pg (p);");
                w.line("pointer_cache_traits< pointer_type >::insert_guard ig (");
                w.line("  pointer_cache_traits< pointer_type >::insert (db, id, p));");
                w.line("object_type& obj (pointer_traits< pointer_type >::get_ref (p));");
                w.line("init (obj, sts.image (), db);");
                w.line("load_ (sts, obj);");
                w.line("sts.load_delayed ();");
                w.line("l.unlock ();");
                w.line("ig.release ();");
                w.line("pg.release ();");
                w.line("return p;");
                Ok(())
            },
        )
    }

    fn find(&self, w: &mut Writer) -> Result<()> {
        function(
            w,
            "bool",
            &self.scope,
            "find (database& db, const id_type& id, object_type& obj)",
            |w| {
                self.preamble(w);
                w.blank();
                w.line("object_statements< object_type >::auto_lock l (sts);");
                w.blank();
                w.line("if (!find_ (sts, id))");
                w.line("  return false;");
                w.blank();
                w.line("reference_cache_traits< object_type >::insert_guard ig (");
                w.line("  reference_cache_traits< object_type >::insert (db, id, obj));");
                w.line("init (obj, sts.image (), db);");
                w.line("load_ (sts, obj);");
                w.line("sts.load_delayed ();");
                w.line("l.unlock ();");
                w.line("ig.release ();");
                w.line("return true;");
                Ok(())
            },
        )
    }

    fn find_(&self, w: &mut Writer) -> Result<()> {
        let db = self.cx.db();

        function(
            w,
            "bool",
            &self.scope,
            &format!("find_ ({db}::object_statements< object_type >& sts, const id_type& id)"),
            |w| {
                w.line(format!("using namespace {db};"));
                w.blank();
                self.id_binding(w, "id");
                w.blank();
                w.line("image_type& im (sts.image ());");
                w.line("binding& imb (sts.select_image_binding ());");
                w.blank();
                w.line("if (im.version != sts.select_image_version () || imb.version == 0)");
                w.open();
                w.line("bind (imb.bind, im, true);");
                w.line("sts.select_image_version (im.version);");
                w.line("imb.version++;");
                w.close("");
                w.blank();
                w.line("select_statement& st (sts.find_statement ());");
                w.line("st.execute ();");
                w.line("select_statement::result r (st.fetch ());");
                w.blank();
                w.line("if (r == select_statement::truncated)");
                w.open();
                w.line("if (grow (im, sts.select_image_truncated ()))");
                w.line("  im.version++;");
                w.blank();
                w.line("if (im.version != sts.select_image_version ())");
                w.open();
                w.line("bind (imb.bind, im, true);");
                w.line("sts.select_image_version (im.version);");
                w.line("imb.version++;");
                w.line("st.refetch ();");
                w.close("");
                w.close("");
                w.blank();
                w.line("st.free_result ();");
                w.line("return r != select_statement::no_data;");
                Ok(())
            },
        )
    }

    fn load_(&self, w: &mut Writer, id: &IdMapping) -> Result<()> {
        let db = self.cx.db();
        let member = &self.cx.unit.member(id.member).name;

        function(
            w,
            "void",
            &self.scope,
            &format!("load_ ({db}::object_statements< object_type >& sts, object_type& obj)"),
            |w| {
                unused(w, &["sts", "obj"]);

                if self.mapping.containers.is_empty() {
                    return Ok(());
                }

                w.line("id_image_type& i (sts.id_image ());");
                w.line(format!("init (i, obj.{member});"));
                w.blank();
                w.line("binding& idb (sts.id_image_binding ());");
                w.line("if (i.version != sts.id_image_version () || idb.version == 0)");
                w.open();
                w.line("bind (idb.bind, i);");
                w.line("sts.id_image_version (i.version);");
                w.line("idb.version++;");
                w.close("");
                self.containers(w, "load", true);
                Ok(())
            },
        )
    }

    fn query_(&self, w: &mut Writer) -> Result<()> {
        let db = self.cx.db();

        function(
            w,
            "void",
            &self.scope,
            &format!(
                "query_ (database&,\n        const query_type& q,\n        {db}::object_statements< object_type >& sts,\n        details::shared_ptr< {db}::select_statement >& st)"
            ),
            |w| {
                query_body(self.cx, w, "select_image", "imb.bind, im, true", "query_clause");
                Ok(())
            },
        )
    }
}

/// Binds the image of `<image>` statements and starts the select of a
/// query. Shared by objects and views, whose statements name their image
/// binding differently.
pub(super) fn query_body(cx: &Context<'_>, w: &mut Writer, image: &str, bind: &str, statement: &str) {
    w.line(format!("using namespace {};", cx.db()));
    w.line("using odb::details::shared;");
    w.blank();
    w.line("image_type& im (sts.image ());");
    w.line(format!("binding& imb (sts.{image}_binding ());"));
    w.blank();
    w.line(format!("if (im.version != sts.{image}_version () || imb.version == 0)"));
    w.open();
    w.line(format!("bind ({bind});"));
    w.line(format!("sts.{image}_version (im.version);"));
    w.line("imb.version++;");
    w.close("");
    w.blank();
    w.line("st.reset (");
    w.line("  new (shared) select_statement (");
    w.line("    sts.connection (),");
    w.line(format!("    {statement} + q.clause (),"));
    w.line("    q.parameters_binding (),");
    w.line("    imb));");
    w.line("st->execute ();");
}
