use super::{ColumnDef, ForeignKey, Name, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Name of the table
    pub name: Name,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Constraints declared as part of the table, for flavors that cannot
    /// add them later
    pub foreign_keys: Vec<ForeignKey>,
}

impl Statement {
    pub fn create_table(
        name: impl Into<Name>,
        columns: Vec<ColumnDef>,
        foreign_keys: Vec<ForeignKey>,
    ) -> Self {
        CreateTable {
            name: name.into(),
            columns,
            foreign_keys,
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
