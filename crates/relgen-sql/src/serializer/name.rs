use super::{Formatter, Ident, Period, ToSql};

use crate::stmt;

impl ToSql for &stmt::Name {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let parts = Period(self.0.iter().map(Ident));
        fmt!(f, parts);
    }
}

impl ToSql for &stmt::ColumnRef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, Ident(&self.table) "." Ident(&self.column));
    }
}

impl ToSql for &stmt::TableRef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, &self.name);

        if let Some(alias) = &self.alias {
            fmt!(f, " AS " Ident(alias));
        }
    }
}
