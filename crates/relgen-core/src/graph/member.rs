use super::{ClassId, Location, TypeId};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataMember {
    pub id: MemberId,

    /// Name as declared, e.g. `name_` or `m_name`
    pub name: String,

    /// Declaring class
    pub scope: ClassId,

    pub location: Location,

    /// Declared type
    pub ty: TypeId,

    /// Spelling of the declared type as written at the declaration site
    pub type_hint: Option<String>,

    /// Member is the object id
    pub is_id: bool,

    /// Id value is assigned by the database
    pub auto: bool,

    /// Member is not persisted
    pub transient: bool,

    /// Name of the member on the other side of the relation. Inverse
    /// containers are loaded from that side and never written.
    pub inverse: Option<String>,

    /// Ordered container stored without an index column
    pub unordered: bool,

    /// Explicit column name
    pub column: Option<String>,

    /// Explicit SQL column type
    pub column_type: Option<String>,

    /// Overrides the name used for image fields
    pub var: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub usize);

impl DataMember {
    /// Name with the conventional `m_` prefix and `_` suffix removed.
    pub fn public_name(&self) -> &str {
        let name = self.name.strip_prefix("m_").unwrap_or(&self.name);
        let name = name.strip_suffix('_').unwrap_or(name);

        if name.is_empty() {
            &self.name
        } else {
            name
        }
    }

    /// Base name of the image fields for this member, e.g. `name_` for
    /// `name_value`, `name_size` and `name_null`.
    pub fn var_name(&self) -> String {
        match &self.var {
            Some(var) => format!("{var}_"),
            None => format!("{}_", self.public_name()),
        }
    }

    /// Column name, before any composite prefix is applied.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or_else(|| self.public_name())
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "MemberId({})", self.0)
    }
}
