pub mod object;
pub use object::{view_statement, ContainerStatements, ObjectStatements};

pub mod schema;
pub use schema::SchemaGenerator;

pub mod serializer;
pub use serializer::Serializer;

pub mod stmt;
pub use stmt::Statement;
