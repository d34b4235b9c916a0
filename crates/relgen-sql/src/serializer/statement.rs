use super::{And, Comma, Flavor, Formatter, Ident, Placeholder, ToSql};

use crate::stmt::{self, Statement};

/// `"column"=?`
struct Assign<'a>(&'a str);

/// `"table"."column"=?`
struct Matches<'a>(&'a stmt::ColumnRef);

impl ToSql for Assign<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(self.0) "=" Placeholder);
    }
}

impl ToSql for Matches<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0 "=" Placeholder);
    }
}

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::AddForeignKey(stmt) => stmt.to_sql(f),
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DropForeignKey(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::ForeignKey {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = Ident(&self.name);
        let columns = Comma(self.columns.iter().map(Ident));
        let referenced = Comma(self.referenced.iter().map(Ident));
        let table = &self.references;

        fmt!(
            f, "CONSTRAINT " name "\n    FOREIGN KEY (" columns ")\n    REFERENCES " table " (" referenced ")"
        );

        if self.on_delete_cascade {
            fmt!(f, "\n    ON DELETE CASCADE");
        }

        if self.deferred {
            match f.serializer.flavor {
                Flavor::Postgresql => fmt!(f, "\n    INITIALLY DEFERRED"),
                Flavor::Sqlite => fmt!(f, "\n    DEFERRABLE INITIALLY DEFERRED"),
                // InnoDB checks constraints immediately.
                Flavor::Mysql => {}
            }
        }
    }
}

impl ToSql for &stmt::AddForeignKey {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = &self.table;
        let fk = &self.foreign_key;

        fmt!(f, "ALTER TABLE " table "\n  ADD " fk);
    }
}

impl ToSql for &stmt::DropForeignKey {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = &self.table;
        let name = Ident(&self.name);

        match f.serializer.flavor {
            Flavor::Mysql => fmt!(f, "ALTER TABLE " table " DROP FOREIGN KEY " name),
            Flavor::Postgresql | Flavor::Sqlite => {
                fmt!(f, "ALTER TABLE IF EXISTS " table "\n  DROP CONSTRAINT IF EXISTS " name)
            }
        }
    }
}

impl ToSql for &stmt::CreateIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = Ident(self.name.last());
        let table = &self.on;
        let columns = Comma(self.columns.iter().map(Ident));

        fmt!(f, "CREATE INDEX " name " ON " table " (" columns ")");
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &self.name;

        fmt!(f, "CREATE TABLE " name " (");

        let mut s = "\n  ";
        for column in &self.columns {
            fmt!(f, s column);
            s = ",\n  ";
        }
        for fk in &self.foreign_keys {
            fmt!(f, s fk);
        }

        fmt!(f, ")");

        if f.serializer.is_mysql() {
            fmt!(f, "\n  ENGINE=InnoDB");
        }
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &self.name;

        fmt!(f, "DROP TABLE ");

        if self.if_exists {
            fmt!(f, "IF EXISTS ");
        }

        fmt!(f, name);

        if let Flavor::Postgresql = f.serializer.flavor {
            fmt!(f, " CASCADE");
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = &self.table;

        if self.columns.is_empty() {
            match f.serializer.flavor {
                Flavor::Mysql => fmt!(f, "INSERT INTO " table " () VALUES ()"),
                Flavor::Postgresql | Flavor::Sqlite => {
                    fmt!(f, "INSERT INTO " table " DEFAULT VALUES")
                }
            }
            return;
        }

        let columns = Comma(self.columns.iter().map(Ident));
        let values = Comma(self.columns.iter().map(|_| Placeholder));

        fmt!(f, "INSERT INTO " table " (" columns ") VALUES (" values ")");
    }
}

impl ToSql for &stmt::Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let columns = Comma(&self.columns);
        let from = &self.from;

        fmt!(f, "SELECT " columns " FROM " from);

        for join in &self.joins {
            let table = &join.table;
            fmt!(f, " LEFT JOIN " table " ON ");

            match &join.on {
                stmt::JoinOn::Eq(lhs, rhs) => fmt!(f, lhs "=" rhs),
                stmt::JoinOn::Raw(on) => fmt!(f, on),
            }
        }

        if !self.filter.is_empty() {
            let filter = And(self.filter.iter().map(Matches));
            fmt!(f, " WHERE " filter);
        }

        if let Some(condition) = &self.condition {
            let lead = if self.filter.is_empty() { " WHERE (" } else { " AND (" };
            fmt!(f, lead condition ")");
        }

        if let Some(order_by) = &self.order_by {
            fmt!(f, " ORDER BY " order_by);
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = &self.table;
        let columns = Comma(self.columns.iter().map(|column| Assign(column)));
        let filter = And(self.filter.iter().map(|column| Assign(column)));

        fmt!(f, "UPDATE " table " SET " columns " WHERE " filter);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = &self.table;

        fmt!(f, "DELETE FROM " table);

        if !self.filter.is_empty() {
            let filter = And(self.filter.iter().map(|column| Assign(column)));
            fmt!(f, " WHERE " filter);
        }
    }
}
