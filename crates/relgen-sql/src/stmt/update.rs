use super::{Name, Statement};

/// `UPDATE` setting every column from a parameter, filtered by equality on
/// `filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: Name,
    pub columns: Vec<String>,
    pub filter: Vec<String>,
}

impl Statement {
    pub fn update(table: impl Into<Name>, columns: Vec<String>, filter: Vec<String>) -> Self {
        Update {
            table: table.into(),
            columns,
            filter,
        }
        .into()
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
