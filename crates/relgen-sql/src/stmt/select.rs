use super::{Name, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<ColumnRef>,
    pub from: TableRef,
    pub joins: Vec<Join>,

    /// Columns compared against parameters, joined with `AND`
    pub filter: Vec<ColumnRef>,

    /// Condition written by the user, emitted verbatim after `filter`
    pub condition: Option<String>,

    pub order_by: Option<ColumnRef>,
}

/// A column qualified by the table (or alias) it is read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: Name,
    pub alias: Option<String>,
}

/// A `LEFT JOIN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: JoinOn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOn {
    Eq(ColumnRef, ColumnRef),

    /// Condition written by the user, emitted verbatim
    Raw(String),
}

impl Select {
    pub fn new(from: TableRef, columns: Vec<ColumnRef>) -> Select {
        Select {
            columns,
            from,
            joins: vec![],
            filter: vec![],
            condition: None,
            order_by: None,
        }
    }

    pub fn join(mut self, table: TableRef, on: JoinOn) -> Select {
        self.joins.push(Join { table, on });
        self
    }

    pub fn filter(mut self, column: ColumnRef) -> Select {
        self.filter.push(column);
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Select {
        self.condition = Some(condition.into());
        self
    }

    pub fn order_by(mut self, column: ColumnRef) -> Select {
        self.order_by = Some(column);
        self
    }
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> ColumnRef {
        ColumnRef {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl TableRef {
    pub fn new(name: impl Into<Name>) -> TableRef {
        TableRef {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<Name>, alias: impl Into<String>) -> TableRef {
        TableRef {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Name the table goes by in the rest of the statement.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.name.last())
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
