//! Drop and create statements for the tables of a unit.
//!
//! Both directions run in two passes. Tables are created in the first pass
//! and cross-table constraints are added in the second, once every table
//! exists. Dropping runs the other way around.

use crate::stmt::{ColumnDef, ForeignKey, Statement};
use crate::Serializer;

use relgen_core::graph::{Class, ClassId, Unit};
use relgen_core::mapping::{ClassMapping, Column, ContainerMapping};
use relgen_core::visit::{self, DeclVisitor};
use relgen_core::{Database, Mapping, Result};

/// Generates schema statements for every concrete object emitted for a
/// unit.
#[derive(Debug)]
pub struct SchemaGenerator<'a> {
    database: Database,
    serializer: Serializer,

    /// Concrete objects with tables, in declaration order
    objects: Vec<&'a ClassMapping>,
}

/// Serialized schema statements of one object, its container tables
/// included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassSchema {
    pub drop: [Vec<String>; 2],
    pub create: [Vec<String>; 2],
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(unit: &'a Unit, mapping: &'a Mapping, database: Database) -> Result<Self> {
        let mut tables = Tables {
            mapping,
            objects: vec![],
        };
        visit::visit_unit(&mut tables, unit)?;

        log::debug!("schema for {} tables", tables.objects.len());

        Ok(SchemaGenerator {
            database,
            serializer: Serializer::new(database),
            objects: tables.objects,
        })
    }

    /// Classes that get a table.
    pub fn classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.objects.iter().map(|object| object.class)
    }

    /// Statements run before everything else.
    pub fn prologue(&self) -> Vec<String> {
        match self.database {
            Database::Mysql => vec!["SET FOREIGN_KEY_CHECKS = 0".to_string()],
            Database::Sqlite | Database::Pgsql => vec![],
        }
    }

    /// Statements run after everything else.
    pub fn epilogue(&self) -> Vec<String> {
        match self.database {
            Database::Mysql => vec!["SET FOREIGN_KEY_CHECKS = 1".to_string()],
            Database::Sqlite | Database::Pgsql => vec![],
        }
    }

    /// Drop statements of one pass across all tables.
    pub fn drop(&self, pass: usize) -> Vec<Statement> {
        self.objects
            .iter()
            .flat_map(|object| self.drop_object(object, pass))
            .collect()
    }

    /// Create statements of one pass across all tables.
    pub fn create(&self, pass: usize) -> Vec<Statement> {
        self.objects
            .iter()
            .flat_map(|object| self.create_object(object, pass))
            .collect()
    }

    /// Serialized statements of one object, for schema creation compiled
    /// into the generated source.
    pub fn class(&self, id: ClassId) -> Result<ClassSchema> {
        let Some(object) = self.objects.iter().find(|object| object.class == id) else {
            relgen_core::bail!("class {id:?} has no table in this schema");
        };
        let serialize = |stmts: Vec<Statement>| {
            stmts
                .iter()
                .map(|stmt| self.serializer.serialize(stmt))
                .collect::<Vec<_>>()
        };

        Ok(ClassSchema {
            drop: [
                serialize(self.drop_object(object, 1)),
                serialize(self.drop_object(object, 2)),
            ],
            create: [
                serialize(self.create_object(object, 1)),
                serialize(self.create_object(object, 2)),
            ],
        })
    }

    /// The standalone SQL file.
    pub fn sql(&self) -> String {
        let mut stmts = self.prologue();

        for pass in 1..=2 {
            stmts.extend(self.drop(pass).iter().map(|stmt| self.serializer.serialize(stmt)));
        }

        for pass in 1..=2 {
            stmts.extend(self.create(pass).iter().map(|stmt| self.serializer.serialize(stmt)));
        }

        stmts.extend(self.epilogue());

        let mut ret = String::new();
        for stmt in stmts {
            if !ret.is_empty() {
                ret.push('\n');
            }
            ret.push_str(&stmt);
            ret.push_str(";\n");
        }
        ret
    }

    fn drop_object(&self, object: &ClassMapping, pass: usize) -> Vec<Statement> {
        let Some(table) = &object.table else {
            return vec![];
        };

        match pass {
            1 if self.database.capability().alter_table_drop_foreign_key => {
                let mut stmts: Vec<_> = pointer_keys(table, &object.columns)
                    .into_iter()
                    .map(|fk| Statement::drop_foreign_key(table, fk.name))
                    .collect();

                for (table, container) in tables(object) {
                    stmts.extend(
                        container_keys(table, container)
                            .into_iter()
                            .map(|fk| Statement::drop_foreign_key(table, fk.name)),
                    );
                }
                stmts
            }
            2 => {
                let mut stmts: Vec<_> = tables(object)
                    .map(|(table, _)| Statement::drop_table_if_exists(table))
                    .collect();
                stmts.push(Statement::drop_table_if_exists(table));
                stmts
            }
            _ => vec![],
        }
    }

    fn create_object(&self, object: &ClassMapping, pass: usize) -> Vec<Statement> {
        let Some(table) = &object.table else {
            return vec![];
        };

        let inline = !self.database.capability().alter_table_add_foreign_key;

        match pass {
            1 => {
                let foreign_keys = if inline {
                    pointer_keys(table, &object.columns)
                } else {
                    vec![]
                };

                let mut stmts = vec![Statement::create_table(
                    table,
                    object.columns.iter().map(ColumnDef::from_mapping).collect(),
                    foreign_keys,
                )];

                for (table, container) in tables(object) {
                    stmts.extend(create_container(table, container, inline));
                }
                stmts
            }
            2 if !inline => {
                let mut stmts: Vec<_> = pointer_keys(table, &object.columns)
                    .into_iter()
                    .map(|fk| Statement::add_foreign_key(table, fk))
                    .collect();

                for (table, container) in tables(object) {
                    stmts.extend(
                        container_keys(table, container)
                            .into_iter()
                            .map(|fk| Statement::add_foreign_key(table, fk)),
                    );
                }
                stmts
            }
            _ => vec![],
        }
    }
}

/// Finds the concrete objects emitted for a unit.
struct Tables<'a> {
    mapping: &'a Mapping,
    objects: Vec<&'a ClassMapping>,
}

impl DeclVisitor for Tables<'_> {
    fn visit_class(&mut self, unit: &Unit, class: &Class) -> Result<()> {
        if !class.is_object() || class.is_abstract || !unit.is_emitted(class) {
            return Ok(());
        }

        let object = self.mapping.class(class.id)?;
        if object.table.is_some() {
            self.objects.push(object);
        }
        Ok(())
    }
}

/// Container tables of an object. Inverse containers have none.
fn tables(object: &ClassMapping) -> impl Iterator<Item = (&String, &ContainerMapping)> {
    object.containers.iter().filter_map(|container| {
        if container.inverse.is_some() {
            return None;
        }
        container.table.as_ref().map(|table| (table, container))
    })
}

fn create_container(table: &str, container: &ContainerMapping, inline: bool) -> Vec<Statement> {
    let Some(object_id) = &container.object_id else {
        return vec![];
    };

    let columns = std::iter::once(object_id)
        .chain(container.data_columns())
        .map(ColumnDef::from_mapping)
        .collect();

    let foreign_keys = if inline {
        container_keys(table, container)
    } else {
        vec![]
    };

    let mut stmts = vec![Statement::create_table(table, columns, foreign_keys)];

    stmts.push(Statement::create_index(
        format!("{table}_{}_i", object_id.name),
        table,
        vec![object_id.name.clone()],
    ));

    if let Some(index) = &container.index {
        stmts.push(Statement::create_index(
            format!("{table}_{}_i", index.name),
            table,
            vec![index.name.clone()],
        ));
    }

    stmts
}

/// The owner reference of a container table, then references held by its
/// elements.
fn container_keys(table: &str, container: &ContainerMapping) -> Vec<ForeignKey> {
    let mut keys = vec![];

    if let Some(object_id) = &container.object_id {
        if let Some(fk) = foreign_key(table, object_id) {
            keys.push(ForeignKey {
                on_delete_cascade: true,
                deferred: false,
                ..fk
            });
        }
    }

    let elements: Vec<_> = container.data_columns().cloned().collect();
    keys.extend(pointer_keys(table, &elements));
    keys
}

fn pointer_keys(table: &str, columns: &[Column]) -> Vec<ForeignKey> {
    columns
        .iter()
        .filter_map(|column| foreign_key(table, column))
        .collect()
}

fn foreign_key(table: &str, column: &Column) -> Option<ForeignKey> {
    let reference = column.references.as_ref()?;

    Some(ForeignKey {
        name: fk_name(table, &column.name),
        columns: vec![column.name.clone()],
        references: reference.table.as_str().into(),
        referenced: vec![reference.column.clone()],
        on_delete_cascade: false,
        deferred: true,
    })
}

fn fk_name(table: &str, column: &str) -> String {
    format!("{table}_{column}_fk")
}
