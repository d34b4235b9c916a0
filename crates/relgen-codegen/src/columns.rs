//! Query columns of a class, shared by their declarations in the header
//! and their definitions in the source.

use crate::Context;

use relgen_core::graph::{Class, DataMember, Scalar};
use relgen_core::mapping::{ClassMapping, Pointer, Simple};
use relgen_core::visit::{walk_members, walk_members_in, Descend, MemberCx, MembersVisitor};
use relgen_core::Result;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum QueryColumn {
    Column {
        /// Name of the static member
        name: String,

        /// Quoted column name
        column: String,

        /// Type the column converts to
        ty: String,

        scalar: Scalar,
    },
    Composite {
        name: String,

        /// Name of the nested struct holding the composite's columns
        class: String,

        columns: Vec<QueryColumn>,
    },
}

impl QueryColumn {
    /// The `query_column` type of a column.
    pub(crate) fn column_type(cx: &Context<'_>, ty: &str, scalar: Scalar) -> String {
        let db = cx.db();
        let id = cx.backend.image_id(scalar);
        format!("{db}::query_column<\n  {db}::value_traits<\n      {ty},\n      {id} >::query_type,\n  {id} >")
    }
}

/// Columns of the class's own members. Object bases contribute theirs by
/// inheritance; composite bases are flattened in.
pub(crate) fn query_columns(cx: &Context<'_>, class: &Class) -> Result<Vec<QueryColumn>> {
    let mut collect = Collect {
        cx,
        mapping: cx.class_mapping(class.id)?,
        stack: vec![vec![]],
    };
    walk_members(&mut collect, cx.unit, class)?;
    Ok(collect.stack.pop().unwrap_or_default())
}

struct Collect<'a> {
    cx: &'a Context<'a>,
    mapping: &'a ClassMapping,

    /// Columns of the struct being filled, innermost composite last
    stack: Vec<Vec<QueryColumn>>,
}

impl Collect<'_> {
    fn push(&mut self, column: QueryColumn) {
        if let Some(columns) = self.stack.last_mut() {
            columns.push(column);
        }
    }
}

impl MembersVisitor for Collect<'_> {
    fn base(&mut self, _cx: &MemberCx<'_>, base: &Class) -> Result<Descend> {
        Ok(if base.is_object() {
            Descend::Skip
        } else {
            Descend::Members
        })
    }

    fn simple(&mut self, cx: &MemberCx<'_>, member: &DataMember, simple: &Simple) -> Result<()> {
        self.push(QueryColumn::Column {
            name: member.public_name().to_string(),
            column: self.cx.serializer.ident(&cx.column_name(member)),
            ty: self.cx.member_type(member),
            scalar: simple.scalar,
        });
        Ok(())
    }

    fn pointer(&mut self, cx: &MemberCx<'_>, member: &DataMember, pointer: &Pointer) -> Result<()> {
        let column = self.mapping.column(member.id)?;

        self.push(QueryColumn::Column {
            name: member.public_name().to_string(),
            column: self.cx.serializer.ident(&cx.column_name(member)),
            ty: format!("object_traits< {} >::id_type", self.cx.fq(pointer.class)),
            scalar: column.scalar,
        });
        Ok(())
    }

    fn composite(&mut self, cx: &MemberCx<'_>, member: &DataMember, class: &Class) -> Result<Descend> {
        self.stack.push(vec![]);
        walk_members_in(self, &cx.nested(member), class)?;
        let columns = self.stack.pop().unwrap_or_default();

        let name = member.public_name().to_string();
        self.push(QueryColumn::Composite {
            class: format!("{name}_class_"),
            name,
            columns,
        });
        Ok(Descend::Skip)
    }
}
