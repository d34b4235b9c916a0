use super::{Flavor, Formatter, Ident, ToSql};

use crate::stmt::{self, Type};

use relgen_core::graph::Scalar;

impl ToSql for &stmt::ColumnDef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = Ident(&self.name);
        let ty = &self.ty;

        if self.auto_increment {
            match f.serializer.flavor {
                Flavor::Sqlite => fmt!(f, name " INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT"),
                Flavor::Postgresql => {
                    let serial = match self.ty {
                        Type::Scalar(Scalar::Int64 | Scalar::UInt32 | Scalar::UInt64) => "BIGSERIAL",
                        _ => "SERIAL",
                    };
                    fmt!(f, name " " serial " NOT NULL PRIMARY KEY")
                }
                Flavor::Mysql => fmt!(f, name " " ty " NOT NULL PRIMARY KEY AUTO_INCREMENT"),
            }
            return;
        }

        // MySQL cannot index TEXT columns without a prefix length.
        if self.primary_key && f.serializer.is_mysql() && self.ty == Type::Scalar(Scalar::String) {
            fmt!(f, name " VARCHAR(128)");
        } else {
            fmt!(f, name " " ty);
        }

        fmt!(f, if self.not_null { " NOT NULL" } else { " NULL" });

        if self.primary_key {
            fmt!(f, " PRIMARY KEY");
        }
    }
}
