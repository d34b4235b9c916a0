#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{And, Comma, Period};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
use params::Placeholder;

// Fragment serializers
mod column_def;
mod name;
mod statement;
mod ty;

use crate::stmt::Statement;

use relgen_core::Database;

/// Serialize a statement to a SQL string
#[derive(Debug, Clone)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Number of parameters emitted so far
    params: usize,
}

impl Serializer {
    pub fn new(database: Database) -> Serializer {
        match database {
            Database::Mysql => Serializer::mysql(),
            Database::Sqlite => Serializer::sqlite(),
            Database::Pgsql => Serializer::postgresql(),
        }
    }

    /// Serializes a statement without a trailing `;`.
    pub fn serialize(&self, stmt: &Statement) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params: 0,
        };

        stmt.to_sql(&mut fmt);
        ret
    }

    /// Quotes an identifier the way statements produced by this serializer
    /// do.
    pub fn ident(&self, name: &str) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params: 0,
        };

        Ident(name).to_sql(&mut fmt);
        ret
    }

    pub(crate) fn is_mysql(&self) -> bool {
        matches!(self.flavor, Flavor::Mysql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_double_embedded_quotes() {
        assert_eq!(Serializer::mysql().ident("a`b"), "`a``b`");
        assert_eq!(Serializer::sqlite().ident("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(Serializer::postgresql().ident("plain"), "\"plain\"");
    }
}
