//! Statements executed by the generated persistence functions.

use crate::stmt::{ColumnRef, JoinOn, Select, Statement, TableRef};

use relgen_core::graph::Unit;
use relgen_core::mapping::{ClassMapping, ContainerMapping, ViewMapping, ViewObjectMapping};
use relgen_core::{Error, Mapping, Result};

/// Statements of a concrete object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectStatements {
    pub persist: Statement,
    pub find: Statement,

    /// Absent when every column belongs to the id
    pub update: Option<Statement>,

    pub erase: Statement,

    /// Select list and joins; the runtime appends the query clause.
    pub query: Statement,
}

/// Statements of a container stored in its own table.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStatements {
    /// Absent for inverse containers, which are never written
    pub insert_one: Option<Statement>,

    pub select_all: Statement,

    /// Absent for inverse containers
    pub delete_all: Option<Statement>,
}

impl ObjectStatements {
    pub fn new(class: &ClassMapping) -> Result<ObjectStatements> {
        let (Some(table), Some(id)) = (&class.table, &class.id) else {
            return Err(Error::invariant_violation(format!(
                "statements requested for class {:?} which has no table",
                class.class
            )));
        };

        let persist = Statement::insert(
            table,
            class
                .columns
                .iter()
                .filter(|column| !column.auto)
                .map(|column| column.name.clone())
                .collect(),
        );

        let select_list: Vec<_> = class
            .columns
            .iter()
            .map(|column| ColumnRef::new(table, &column.name))
            .collect();

        let find = Select::new(TableRef::new(table), select_list.clone())
            .filter(ColumnRef::new(table, &id.column))
            .into();

        // The update binding is the insert binding followed by the id, so a
        // caller-assigned id is set to itself.
        let assigned: Vec<_> = class
            .columns
            .iter()
            .filter(|column| !column.auto)
            .map(|column| column.name.clone())
            .collect();

        let update = if class.columns.iter().all(|column| column.id) {
            None
        } else {
            Some(Statement::update(table, assigned, vec![id.column.clone()]))
        };

        let erase = Statement::delete(table, vec![id.column.clone()]);

        // Pointed-to objects are joined under the pointer column's name so
        // query conditions can reach their columns.
        let mut query = Select::new(TableRef::new(table), select_list);
        for column in &class.columns {
            let Some(reference) = &column.references else {
                continue;
            };

            query = query.join(
                TableRef::aliased(&reference.table, &column.name),
                JoinOn::Eq(
                    ColumnRef::new(&column.name, &reference.column),
                    ColumnRef::new(table, &column.name),
                ),
            );
        }

        Ok(ObjectStatements {
            persist,
            find,
            update,
            erase,
            query: query.into(),
        })
    }

    /// The statements run through object statements, paired with the name
    /// of the constant holding each.
    pub fn named(&self) -> Vec<(&'static str, &Statement)> {
        let mut ret = vec![("persist_statement", &self.persist), ("find_statement", &self.find)];
        if let Some(update) = &self.update {
            ret.push(("update_statement", update));
        }
        ret.push(("erase_statement", &self.erase));
        ret
    }
}

impl ContainerStatements {
    /// Returns `None` for containers without a table of their own, i.e.
    /// containers of composite values that are not part of an object.
    pub fn new(container: &ContainerMapping) -> Option<ContainerStatements> {
        if let Some(inverse) = &container.inverse {
            let select_all = Select::new(
                TableRef::new(&inverse.table),
                vec![ColumnRef::new(&inverse.table, &inverse.id_column)],
            )
            .filter(ColumnRef::new(&inverse.table, &inverse.ref_column));

            return Some(ContainerStatements {
                insert_one: None,
                select_all: select_all.into(),
                delete_all: None,
            });
        }

        let table = container.table.as_ref()?;
        let object_id = container.object_id.as_ref()?;

        let data: Vec<_> = container.data_columns().collect();

        let insert_one = Statement::insert(
            table,
            std::iter::once(object_id)
                .chain(data.iter().copied())
                .map(|column| column.name.clone())
                .collect(),
        );

        let mut select_all = Select::new(
            TableRef::new(table),
            data.iter()
                .map(|column| ColumnRef::new(table, &column.name))
                .collect(),
        )
        .filter(ColumnRef::new(table, &object_id.name));

        if let Some(index) = &container.index {
            select_all = select_all.order_by(ColumnRef::new(table, &index.name));
        }

        let delete_all = Statement::delete(table, vec![object_id.name.clone()]);

        Some(ContainerStatements {
            insert_one: Some(insert_one),
            select_all: select_all.into(),
            delete_all: Some(delete_all),
        })
    }
}

/// The select statement of a view.
///
/// Objects after the first are joined with their explicit join condition or,
/// failing that, through a pointer between them and an object already in the
/// statement.
pub fn view_statement(unit: &Unit, mapping: &Mapping, view: &ClassMapping) -> Result<Statement> {
    let class = unit.class(view.class);

    let Some(ViewMapping {
        objects,
        sources,
        query,
    }) = &view.view
    else {
        return Err(Error::invariant_violation(format!(
            "`{}` has no view mapping",
            unit.fq_name(class)
        )));
    };

    let table_ref = |table: &str, alias: &str, aliased: bool| {
        if aliased {
            TableRef::aliased(table, alias)
        } else {
            TableRef::new(table)
        }
    };

    let Some((first, rest)) = objects.split_first() else {
        return Err(Error::invariant_violation(format!(
            "view `{}` has no objects",
            unit.fq_name(class)
        )));
    };

    let columns = sources
        .iter()
        .map(|source| ColumnRef::new(&source.alias, &source.column))
        .collect();

    let mut select = Select::new(table_ref(&first.table, &first.alias, first.aliased), columns);

    for (i, object) in rest.iter().enumerate() {
        let joined = &objects[..=i];

        let on = match &object.join {
            Some(join) => JoinOn::Raw(join.clone()),
            None => pointer_join(mapping, joined, object).ok_or_else(|| {
                Error::unsupported_construct(
                    &class.location,
                    format!(
                        "view `{}` has no join condition for `{}` and no pointer relates it to the objects before it",
                        unit.fq_name(class),
                        object.alias
                    ),
                )
            })?,
        };

        select = select.join(table_ref(&object.table, &object.alias, object.aliased), on);
    }

    if let Some(query) = query {
        select = select.condition(query);
    }

    Ok(select.into())
}

fn pointer_join(
    mapping: &Mapping,
    joined: &[ViewObjectMapping],
    object: &ViewObjectMapping,
) -> Option<JoinOn> {
    let this = mapping.class(object.class).ok()?;
    let this_id = this.id.as_ref()?;

    for prev in joined {
        let other = mapping.class(prev.class).ok()?;

        // prev -> object
        if let Some(column) = other
            .columns
            .iter()
            .find(|c| c.references.as_ref().is_some_and(|r| r.class == object.class))
        {
            return Some(JoinOn::Eq(
                ColumnRef::new(&prev.alias, &column.name),
                ColumnRef::new(&object.alias, &this_id.column),
            ));
        }

        // object -> prev
        if let (Some(column), Some(other_id)) = (
            this.columns
                .iter()
                .find(|c| c.references.as_ref().is_some_and(|r| r.class == prev.class)),
            &other.id,
        ) {
            return Some(JoinOn::Eq(
                ColumnRef::new(&object.alias, &column.name),
                ColumnRef::new(&prev.alias, &other_id.column),
            ));
        }
    }

    None
}
