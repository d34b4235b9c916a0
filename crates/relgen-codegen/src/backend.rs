//! How each database runtime spells images and parameter bindings.

use crate::writer::Writer;

use relgen_core::graph::Scalar;
use relgen_core::Database;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Backend {
    database: Database,
}

/// How one scalar is held in an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Image {
    /// Type of the `_value` field
    pub(crate) value: &'static str,

    /// Type of the `_size` field, for variable-length values only
    pub(crate) size: Option<&'static str>,

    /// Image type id passed to `value_traits`, e.g. `id_text`
    pub(crate) id: &'static str,

    /// Buffer type written to the bind entry
    bind: &'static str,

    is_unsigned: bool,
}

impl Backend {
    pub(crate) fn new(database: Database) -> Backend {
        Backend { database }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.database.name()
    }

    pub(crate) fn bind_vector(&self) -> &'static str {
        match self.database {
            Database::Mysql => "MYSQL_BIND*",
            Database::Sqlite => "sqlite::bind*",
            Database::Pgsql => "pgsql::bind*",
        }
    }

    pub(crate) fn truncated_vector(&self) -> &'static str {
        match self.database {
            Database::Mysql => "my_bool*",
            Database::Sqlite | Database::Pgsql => "bool*",
        }
    }

    fn null_type(&self) -> &'static str {
        match self.database {
            Database::Mysql => "my_bool",
            Database::Sqlite | Database::Pgsql => "bool",
        }
    }

    pub(crate) fn image(&self, scalar: Scalar) -> Image {
        match self.database {
            Database::Mysql => mysql(scalar),
            Database::Sqlite => sqlite(scalar),
            Database::Pgsql => pgsql(scalar),
        }
    }

    /// `<db>::id_<x>`, qualified for use outside the runtime namespace.
    pub(crate) fn image_id(&self, scalar: Scalar) -> String {
        format!("{}::{}", self.name(), self.image(scalar).id)
    }

    /// The `value_traits` specialization converting between `ty` and the
    /// image of `scalar`.
    pub(crate) fn value_traits(&self, ty: &str, scalar: Scalar) -> String {
        format!(
            "{}::value_traits<\n    {ty},\n    {} >",
            self.name(),
            self.image_id(scalar)
        )
    }

    /// Declares the image fields of one column, `var` being the field prefix.
    pub(crate) fn image_fields(&self, w: &mut Writer, var: &str, scalar: Scalar) {
        let image = self.image(scalar);

        w.line(format!("{} {var}value;", image.value));
        if let Some(size) = image.size {
            w.line(format!("{size} {var}size;"));
        }
        w.line(format!("{} {var}null;", self.null_type()));
    }

    /// Fills bind entry `b[n]` from image fields `<image><var>*`.
    pub(crate) fn bind(&self, w: &mut Writer, image: &str, var: &str, scalar: Scalar) {
        let im = self.image(scalar);
        let value = format!("{image}{var}value");
        let size = format!("{image}{var}size");
        let null = format!("{image}{var}null");

        match self.database {
            Database::Mysql => {
                w.line(format!("b[n].buffer_type = {};", im.bind));
                if im.is_unsigned {
                    w.line("b[n].is_unsigned = 1;");
                }
                if im.size.is_some() {
                    w.line(format!("b[n].buffer = {value}.data ();"));
                    w.line(format!(
                        "b[n].buffer_length = static_cast<unsigned long> (\n  {value}.capacity ());"
                    ));
                    w.line(format!("b[n].length = &{size};"));
                } else {
                    w.line(format!("b[n].buffer = &{value};"));
                }
            }
            Database::Sqlite | Database::Pgsql => {
                w.line(format!("b[n].type = {}::bind::{};", self.name(), im.bind));
                if im.size.is_some() {
                    w.line(format!("b[n].buffer = {value}.data ();"));
                    w.line(format!("b[n].size = &{size};"));
                    w.line(format!("b[n].capacity = {value}.capacity ();"));
                } else {
                    w.line(format!("b[n].buffer = &{value};"));
                }
            }
        }

        w.line(format!("b[n].is_null = &{null};"));
    }
}

impl Image {
    const fn fixed(value: &'static str, id: &'static str, bind: &'static str) -> Image {
        Image {
            value,
            size: None,
            id,
            bind,
            is_unsigned: false,
        }
    }

    const fn unsigned(self) -> Image {
        Image {
            is_unsigned: true,
            ..self
        }
    }

    const fn buffer(size: &'static str, id: &'static str, bind: &'static str) -> Image {
        Image {
            value: "details::buffer",
            size: Some(size),
            id,
            bind,
            is_unsigned: false,
        }
    }
}

fn mysql(scalar: Scalar) -> Image {
    match scalar {
        Scalar::Bool | Scalar::Int8 => Image::fixed("signed char", "id_tiny", "MYSQL_TYPE_TINY"),
        Scalar::UInt8 => Image::fixed("unsigned char", "id_utiny", "MYSQL_TYPE_TINY").unsigned(),
        Scalar::Int16 => Image::fixed("short", "id_short", "MYSQL_TYPE_SHORT"),
        Scalar::UInt16 => {
            Image::fixed("unsigned short", "id_ushort", "MYSQL_TYPE_SHORT").unsigned()
        }
        Scalar::Int32 => Image::fixed("int", "id_long", "MYSQL_TYPE_LONG"),
        Scalar::UInt32 => Image::fixed("unsigned int", "id_ulong", "MYSQL_TYPE_LONG").unsigned(),
        Scalar::Int64 => Image::fixed("long long", "id_longlong", "MYSQL_TYPE_LONGLONG"),
        Scalar::UInt64 => {
            Image::fixed("unsigned long long", "id_ulonglong", "MYSQL_TYPE_LONGLONG").unsigned()
        }
        Scalar::Float => Image::fixed("float", "id_float", "MYSQL_TYPE_FLOAT"),
        Scalar::Double => Image::fixed("double", "id_double", "MYSQL_TYPE_DOUBLE"),
        Scalar::String => Image::buffer("unsigned long", "id_string", "MYSQL_TYPE_STRING"),
        Scalar::Blob => Image::buffer("unsigned long", "id_blob", "MYSQL_TYPE_BLOB"),
    }
}

fn sqlite(scalar: Scalar) -> Image {
    match scalar {
        Scalar::Float | Scalar::Double => Image::fixed("double", "id_real", "real"),
        Scalar::String => Image::buffer("std::size_t", "id_text", "text"),
        Scalar::Blob => Image::buffer("std::size_t", "id_blob", "blob"),
        _ => Image::fixed("long long", "id_integer", "integer"),
    }
}

fn pgsql(scalar: Scalar) -> Image {
    match scalar {
        Scalar::Bool => Image::fixed("bool", "id_boolean", "boolean_"),
        Scalar::Int8 | Scalar::UInt8 | Scalar::Int16 => {
            Image::fixed("short", "id_smallint", "smallint")
        }
        Scalar::UInt16 | Scalar::Int32 => Image::fixed("int", "id_integer", "integer"),
        Scalar::UInt32 | Scalar::Int64 | Scalar::UInt64 => {
            Image::fixed("long long", "id_bigint", "bigint")
        }
        Scalar::Float => Image::fixed("float", "id_real", "real"),
        Scalar::Double => Image::fixed("double", "id_double", "double_"),
        Scalar::String => Image::buffer("std::size_t", "id_string", "text"),
        Scalar::Blob => Image::buffer("std::size_t", "id_bytea", "bytea"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_collapses_integers() {
        let backend = Backend::new(Database::Sqlite);

        for scalar in [Scalar::Bool, Scalar::Int8, Scalar::UInt32, Scalar::UInt64] {
            assert_eq!(backend.image(scalar).id, "id_integer");
        }
        assert_eq!(backend.image(Scalar::Float).id, "id_real");
    }

    #[test]
    fn variable_length_values_bind_their_buffer() {
        let mut w = Writer::new();
        Backend::new(Database::Pgsql).bind(&mut w, "i.", "name_", Scalar::String);

        assert_eq!(
            w.finish(),
            concat!(
                "b[n].type = pgsql::bind::text;\n",
                "b[n].buffer = i.name_value.data ();\n",
                "b[n].size = &i.name_size;\n",
                "b[n].capacity = i.name_value.capacity ();\n",
                "b[n].is_null = &i.name_null;\n",
            )
        );
    }

    #[test]
    fn mysql_marks_unsigned_columns() {
        let mut w = Writer::new();
        Backend::new(Database::Mysql).bind(&mut w, "i.", "id_", Scalar::UInt64);

        assert_eq!(
            w.finish(),
            concat!(
                "b[n].buffer_type = MYSQL_TYPE_LONGLONG;\n",
                "b[n].is_unsigned = 1;\n",
                "b[n].buffer = &i.id_value;\n",
                "b[n].is_null = &i.id_null;\n",
            )
        );
    }
}
