use relgen_core::graph::Scalar;
use relgen_core::mapping::Column;

/// Column type. Scalars are spelled per flavor when serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Scalar(Scalar),

    /// Explicit type given by the user, emitted verbatim
    Custom(String),
}

impl Type {
    pub(crate) fn from_column(column: &Column) -> Type {
        match &column.sql_type {
            Some(ty) => Type::Custom(ty.clone()),
            None => Type::Scalar(column.scalar),
        }
    }
}
