use super::{Name, Statement};

/// `INSERT` with one parameter per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: Name,
    pub columns: Vec<String>,
}

impl Statement {
    pub fn insert(table: impl Into<Name>, columns: Vec<String>) -> Self {
        Insert {
            table: table.into(),
            columns,
        }
        .into()
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
