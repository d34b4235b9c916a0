mod column_def;
pub use column_def::ColumnDef;

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_table;
pub use drop_table::DropTable;

mod foreign_key;
pub use foreign_key::{AddForeignKey, DropForeignKey, ForeignKey};

mod insert;
pub use insert::Insert;

mod name;
pub use name::Name;

mod select;
pub use select::{ColumnRef, Join, JoinOn, Select, TableRef};

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    AddForeignKey(AddForeignKey),
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    Delete(Delete),
    DropForeignKey(DropForeignKey),
    DropTable(DropTable),
    Insert(Insert),
    Select(Select),
    Update(Update),
}
