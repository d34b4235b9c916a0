use crate::backend::Backend;

use relgen_core::graph::{Class, ClassId, ClassKind, DataMember, MemberId, Unit};
use relgen_core::mapping::ClassMapping;
use relgen_core::{Mapping, Options, Result};
use relgen_sql::Serializer;

/// Everything a generation pass reads. Shared by the header and source
/// generators and never mutated once built.
#[derive(Debug)]
pub(crate) struct Context<'a> {
    pub(crate) unit: &'a Unit,
    pub(crate) options: &'a Options,
    pub(crate) mapping: &'a Mapping,
    pub(crate) backend: Backend,
    pub(crate) serializer: Serializer,
}

impl<'a> Context<'a> {
    pub(crate) fn new(unit: &'a Unit, options: &'a Options, mapping: &'a Mapping) -> Context<'a> {
        let database = options.db();

        Context {
            unit,
            options,
            mapping,
            backend: Backend::new(database),
            serializer: Serializer::new(database),
        }
    }

    /// Runtime namespace, e.g. `sqlite`.
    pub(crate) fn db(&self) -> &'static str {
        self.backend.name()
    }

    pub(crate) fn query(&self) -> bool {
        self.options.generate_query
    }

    pub(crate) fn stem(&self) -> &'a str {
        crate::stem(self.unit)
    }

    pub(crate) fn class_mapping(&self, id: ClassId) -> Result<&'a ClassMapping> {
        self.mapping.class(id)
    }

    pub(crate) fn fq(&self, id: ClassId) -> String {
        self.unit.fq_name(self.unit.class(id))
    }

    /// The traits class of a persistent class, e.g.
    /// `object_traits< ::Person >`.
    pub(crate) fn traits(&self, class: &Class) -> String {
        let kind = match class.kind {
            ClassKind::Composite => "composite_value_traits",
            ClassKind::View(_) => "view_traits",
            ClassKind::Object | ClassKind::Plain => "object_traits",
        };
        format!("{kind}< {} >", self.unit.fq_name(class))
    }

    /// `access::object_traits< ::Person >::`, the scope of out-of-class
    /// definitions.
    pub(crate) fn scope(&self, class: &Class) -> String {
        format!("access::{}::", self.traits(class))
    }

    /// Type of a member as spelled in generated code.
    pub(crate) fn member_type(&self, member: &DataMember) -> String {
        match &member.type_hint {
            Some(hint) => hint.clone(),
            None => self.unit.ty(member.ty).name.clone(),
        }
    }

    pub(crate) fn pointer_type(&self, class: &Class) -> String {
        match &class.object_pointer {
            Some(pointer) => pointer.clone(),
            None => format!("{}*", self.unit.fq_name(class)),
        }
    }

    /// Table a class's query columns refer to. Abstract classes have no
    /// table of their own, so they use the name one would have.
    pub(crate) fn table(&self, class: &Class) -> Result<String> {
        if let Some(table) = &self.class_mapping(class.id)?.table {
            return Ok(table.clone());
        }

        let name = class.table.as_deref().unwrap_or(&class.name);
        Ok(match &self.options.table_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        })
    }

    /// `o.addr_.street_` style access to a member through composite members.
    pub(crate) fn access(&self, object: &str, path: &[MemberId]) -> String {
        let mut ret = object.to_string();
        for member in path {
            ret.push('.');
            ret.push_str(&self.unit.member(*member).name);
        }
        ret
    }
}
