use super::{Name, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: Name,

    /// Columns compared against parameters, joined with `AND`
    pub filter: Vec<String>,
}

impl Statement {
    pub fn delete(table: impl Into<Name>, filter: Vec<String>) -> Self {
        Delete {
            table: table.into(),
            filter,
        }
        .into()
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
