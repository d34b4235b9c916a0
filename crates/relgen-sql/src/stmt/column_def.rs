use super::Type;

use relgen_core::mapping::Column;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Type,
    pub not_null: bool,

    /// Declared inline as the table's primary key
    pub primary_key: bool,

    pub auto_increment: bool,
}

impl ColumnDef {
    pub(crate) fn from_mapping(column: &Column) -> ColumnDef {
        ColumnDef {
            name: column.name.clone(),
            ty: Type::from_column(column),
            not_null: !column.nullable,
            primary_key: column.id,
            auto_increment: column.auto,
        }
    }
}
