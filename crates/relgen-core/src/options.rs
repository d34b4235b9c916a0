use crate::{Error, Result, Unit};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a generation run.
///
/// Options are threaded read-only through every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Target database. Required.
    pub database: Option<Database>,

    /// Generate query columns and query functions
    pub generate_query: bool,

    /// Generate the database schema
    pub generate_schema: bool,

    /// Where the generated schema goes
    pub schema_format: SchemaFormat,

    /// If set, prefix all table names with this string
    pub table_prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Mysql,
    Sqlite,
    Pgsql,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFormat {
    /// Schema creation code compiled into the generated source
    Embedded,

    /// Standalone SQL file
    #[default]
    Sql,
}

/// What a target database supports, as far as generation is concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct Capability {
    /// The runtime library provides a query implementation.
    pub query: bool,

    /// Foreign keys can be added to an existing table. When false, they are
    /// declared inline by `CREATE TABLE`.
    pub alter_table_add_foreign_key: bool,

    /// Foreign keys can be dropped from an existing table.
    pub alter_table_drop_foreign_key: bool,

    /// Identifiers are quoted with this character.
    pub identifier_quote: char,

    /// Statement parameters are numbered (`$1`) instead of positional (`?`).
    pub numbered_params: bool,
}

impl Capability {
    /// MySQL capabilities.
    pub const MYSQL: Self = Self {
        query: true,
        alter_table_add_foreign_key: true,
        // The schema prologue disables foreign key checks instead.
        alter_table_drop_foreign_key: false,
        identifier_quote: '`',
        numbered_params: false,
    };

    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        query: true,
        alter_table_add_foreign_key: false,
        alter_table_drop_foreign_key: false,
        identifier_quote: '"',
        numbered_params: false,
    };

    /// PostgreSQL capabilities.
    pub const PGSQL: Self = Self {
        query: true,
        alter_table_add_foreign_key: true,
        alter_table_drop_foreign_key: true,
        identifier_quote: '"',
        numbered_params: true,
    };
}

impl Default for Options {
    fn default() -> Self {
        Self {
            database: None,
            generate_query: false,
            generate_schema: true,
            schema_format: SchemaFormat::Sql,
            table_prefix: None,
        }
    }
}

impl Options {
    /// Create a new Options with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub fn generate_query(mut self, generate_query: bool) -> Self {
        self.generate_query = generate_query;
        self
    }

    pub fn generate_schema(mut self, generate_schema: bool) -> Self {
        self.generate_schema = generate_schema;
        self
    }

    pub fn schema_format(mut self, schema_format: SchemaFormat) -> Self {
        self.schema_format = schema_format;
        self
    }

    pub fn table_prefix(mut self, prefix: &str) -> Self {
        self.table_prefix = Some(prefix.to_string());
        self
    }

    /// The target database. Only valid after [`Options::verify`] succeeded.
    pub fn db(&self) -> Database {
        self.database.unwrap_or(Database::Sqlite)
    }

    /// True if schema creation code is compiled into the generated source.
    pub fn embedded_schema(&self) -> bool {
        self.generate_schema && self.schema_format == SchemaFormat::Embedded
    }

    /// Checks the options against the unit before anything is generated.
    pub fn verify(&self, unit: &Unit) -> Result<()> {
        let Some(database) = self.database else {
            return Err(Error::invalid_configuration(
                "no target database specified",
            ));
        };

        if self.generate_query && !database.capability().query {
            return Err(Error::invalid_configuration(format!(
                "query support is requested but the {database} runtime does not provide it"
            )));
        }

        if !self.generate_query {
            let own_view = unit
                .classes
                .iter()
                .find(|class| class.is_view() && unit.is_emitted(class));

            if let Some(view) = own_view {
                return Err(Error::invalid_configuration(format!(
                    "view `{}` requires query support; enable query generation",
                    view.name
                )));
            }
        }

        Ok(())
    }
}

impl Database {
    pub fn capability(self) -> &'static Capability {
        match self {
            Database::Mysql => &Capability::MYSQL,
            Database::Sqlite => &Capability::SQLITE,
            Database::Pgsql => &Capability::PGSQL,
        }
    }

    /// Identifier used in generated names, e.g. `odb::sqlite`.
    pub fn name(self) -> &'static str {
        match self {
            Database::Mysql => "mysql",
            Database::Sqlite => "sqlite",
            Database::Pgsql => "pgsql",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
