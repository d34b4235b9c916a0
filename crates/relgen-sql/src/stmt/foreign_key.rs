use super::{Name, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Constraint name, e.g. `Employee_employer_fk`
    pub name: String,

    pub columns: Vec<String>,

    /// Referenced table
    pub references: Name,

    /// Referenced columns, parallel to `columns`
    pub referenced: Vec<String>,

    /// Rows go away with the referenced row. Set for container tables.
    pub on_delete_cascade: bool,

    /// Checked at commit rather than per statement. Set for object pointers,
    /// which may be persisted in any order.
    pub deferred: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddForeignKey {
    pub table: Name,
    pub foreign_key: ForeignKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropForeignKey {
    pub table: Name,

    /// Constraint name
    pub name: String,
}

impl Statement {
    pub fn add_foreign_key(table: impl Into<Name>, foreign_key: ForeignKey) -> Self {
        AddForeignKey {
            table: table.into(),
            foreign_key,
        }
        .into()
    }

    pub fn drop_foreign_key(table: impl Into<Name>, name: impl Into<String>) -> Self {
        DropForeignKey {
            table: table.into(),
            name: name.into(),
        }
        .into()
    }
}

impl From<AddForeignKey> for Statement {
    fn from(value: AddForeignKey) -> Self {
        Self::AddForeignKey(value)
    }
}

impl From<DropForeignKey> for Statement {
    fn from(value: DropForeignKey) -> Self {
        Self::DropForeignKey(value)
    }
}
