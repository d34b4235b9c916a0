use super::{Formatter, ToSql};

use crate::stmt;

impl ToSql for &stmt::Type {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            stmt::Type::Custom(ty) => fmt!(f, ty),
            stmt::Type::Scalar(scalar) => {
                let ty = f.serializer.flavor.scalar_type(*scalar);
                fmt!(f, ty);
            }
        }
    }
}
