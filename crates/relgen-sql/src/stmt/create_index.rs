use super::{Name, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    /// Name of the index
    pub name: Name,

    /// Which table to index
    pub on: Name,

    /// The columns to index
    pub columns: Vec<String>,
}

impl Statement {
    pub fn create_index(name: impl Into<Name>, on: impl Into<Name>, columns: Vec<String>) -> Self {
        CreateIndex {
            name: name.into(),
            on: on.into(),
            columns,
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
