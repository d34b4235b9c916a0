use super::Serializer;

use relgen_core::graph::Scalar;

#[derive(Debug, Clone, Copy)]
pub(super) enum Flavor {
    Postgresql,
    Sqlite,
    Mysql,
}

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }
}

impl Flavor {
    pub(super) fn quote(self) -> char {
        match self {
            Flavor::Mysql => '`',
            Flavor::Postgresql | Flavor::Sqlite => '"',
        }
    }

    pub(super) fn scalar_type(self, scalar: Scalar) -> &'static str {
        use Scalar::*;

        match self {
            Flavor::Sqlite => match scalar {
                Float | Double => "REAL",
                String => "TEXT",
                Blob => "BLOB",
                _ => "INTEGER",
            },
            Flavor::Mysql => match scalar {
                Bool => "TINYINT(1)",
                Int8 => "TINYINT",
                Int16 => "SMALLINT",
                Int32 => "INT",
                Int64 => "BIGINT",
                UInt8 => "TINYINT UNSIGNED",
                UInt16 => "SMALLINT UNSIGNED",
                UInt32 => "INT UNSIGNED",
                UInt64 => "BIGINT UNSIGNED",
                Float => "FLOAT",
                Double => "DOUBLE",
                String => "TEXT",
                Blob => "BLOB",
            },
            Flavor::Postgresql => match scalar {
                Bool => "BOOLEAN",
                Int8 | Int16 | UInt8 => "SMALLINT",
                Int32 | UInt16 => "INTEGER",
                Int64 | UInt32 | UInt64 => "BIGINT",
                Float => "REAL",
                Double => "DOUBLE PRECISION",
                String => "TEXT",
                Blob => "BYTEA",
            },
        }
    }
}
