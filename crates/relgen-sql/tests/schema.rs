use relgen_core::graph::{Container, Scalar, Unit};
use relgen_core::{Database, Mapping, Options};
use relgen_sql::{SchemaGenerator, Serializer, Statement};

use pretty_assertions::assert_eq;

/// `Employer` owns a set of tags, `Employee` points at its employer.
fn company() -> Unit {
    let mut b = Unit::builder("company.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let tags = b.container("::std::set< ::std::string >", Container::set(string));
    let employer = b.object("Employer").build();
    let employee = b.object("Employee").build();
    let employer_ptr = b.pointer(employer);
    b.member(employer, "id_", long).id().auto();
    b.member(employer, "name_", string);
    b.member(employer, "tags_", tags);
    b.member(employee, "id_", long).id().auto();
    b.member(employee, "employer_", employer_ptr);
    b.build().unwrap()
}

fn render(database: Database, stmts: &[Statement]) -> Vec<String> {
    let serializer = Serializer::new(database);
    stmts.iter().map(|stmt| serializer.serialize(stmt)).collect()
}

fn generate(unit: &Unit, database: Database, f: impl FnOnce(&SchemaGenerator<'_>)) {
    let mapping = Mapping::build(unit, &Options::new().database(database)).unwrap();
    let schema = SchemaGenerator::new(unit, &mapping, database).unwrap();
    f(&schema);
}

#[test]
fn sqlite_declares_foreign_keys_inline() {
    let unit = company();

    generate(&unit, Database::Sqlite, |schema| {
        assert_eq!(
            render(Database::Sqlite, &schema.create(1)),
            [
                concat!(
                    "CREATE TABLE \"Employer\" (\n",
                    "  \"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,\n",
                    "  \"name\" TEXT NOT NULL)",
                ),
                concat!(
                    "CREATE TABLE \"Employer_tags\" (\n",
                    "  \"object_id\" INTEGER NOT NULL,\n",
                    "  \"value\" TEXT NOT NULL,\n",
                    "  CONSTRAINT \"Employer_tags_object_id_fk\"\n",
                    "    FOREIGN KEY (\"object_id\")\n",
                    "    REFERENCES \"Employer\" (\"id\")\n",
                    "    ON DELETE CASCADE)",
                ),
                "CREATE INDEX \"Employer_tags_object_id_i\" ON \"Employer_tags\" (\"object_id\")",
                concat!(
                    "CREATE TABLE \"Employee\" (\n",
                    "  \"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,\n",
                    "  \"employer\" INTEGER NULL,\n",
                    "  CONSTRAINT \"Employee_employer_fk\"\n",
                    "    FOREIGN KEY (\"employer\")\n",
                    "    REFERENCES \"Employer\" (\"id\")\n",
                    "    DEFERRABLE INITIALLY DEFERRED)",
                ),
            ]
        );

        assert!(schema.create(2).is_empty());
        assert!(schema.drop(1).is_empty());
    });
}

#[test]
fn postgresql_adds_foreign_keys_in_second_pass() {
    let unit = company();

    generate(&unit, Database::Pgsql, |schema| {
        let first = render(Database::Pgsql, &schema.create(1));
        assert!(first.iter().all(|stmt| !stmt.contains("FOREIGN KEY")));
        assert!(first[0].contains("\"id\" BIGSERIAL NOT NULL PRIMARY KEY"));

        assert_eq!(
            render(Database::Pgsql, &schema.create(2)),
            [
                concat!(
                    "ALTER TABLE \"Employer_tags\"\n",
                    "  ADD CONSTRAINT \"Employer_tags_object_id_fk\"\n",
                    "    FOREIGN KEY (\"object_id\")\n",
                    "    REFERENCES \"Employer\" (\"id\")\n",
                    "    ON DELETE CASCADE",
                ),
                concat!(
                    "ALTER TABLE \"Employee\"\n",
                    "  ADD CONSTRAINT \"Employee_employer_fk\"\n",
                    "    FOREIGN KEY (\"employer\")\n",
                    "    REFERENCES \"Employer\" (\"id\")\n",
                    "    INITIALLY DEFERRED",
                ),
            ]
        );
    });
}

#[test]
fn postgresql_drops_constraints_then_tables() {
    let mut b = Unit::builder("company.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let tags = b.container("::std::set< ::std::string >", Container::set(string));
    let employer = b.object("Employer").build();
    let employee = b.object("Employee").build();
    let employer_ptr = b.pointer(employer);
    let former = b.container("::std::set< ::Employer* >", Container::set(employer_ptr));
    b.member(employer, "id_", long).id().auto();
    b.member(employer, "tags_", tags);
    b.member(employee, "id_", long).id().auto();
    b.member(employee, "employer_", employer_ptr);
    b.member(employee, "former_", former);
    let unit = b.build().unwrap();

    let drop = |table: &str, name: &str| {
        format!("ALTER TABLE IF EXISTS \"{table}\"\n  DROP CONSTRAINT IF EXISTS \"{name}\"")
    };

    generate(&unit, Database::Pgsql, |schema| {
        assert_eq!(
            render(Database::Pgsql, &schema.drop(1)),
            [
                drop("Employer_tags", "Employer_tags_object_id_fk"),
                drop("Employee", "Employee_employer_fk"),
                drop("Employee_former", "Employee_former_object_id_fk"),
                drop("Employee_former", "Employee_former_value_fk"),
            ]
        );
        assert_eq!(
            render(Database::Pgsql, &schema.drop(2)),
            [
                "DROP TABLE IF EXISTS \"Employer_tags\" CASCADE",
                "DROP TABLE IF EXISTS \"Employer\" CASCADE",
                "DROP TABLE IF EXISTS \"Employee_former\" CASCADE",
                "DROP TABLE IF EXISTS \"Employee\" CASCADE",
            ]
        );
    });
}

#[test]
fn mysql_file_is_framed_by_foreign_key_checks() {
    let mut b = Unit::builder("person.hxx");
    let int = b.fundamental("int", Scalar::Int32);
    let string = b.fundamental("::std::string", Scalar::String);
    let person = b.object("Person").build();
    b.member(person, "id_", int).id().auto();
    b.member(person, "name_", string);
    let unit = b.build().unwrap();

    generate(&unit, Database::Mysql, |schema| {
        assert_eq!(
            schema.sql(),
            concat!(
                "SET FOREIGN_KEY_CHECKS = 0;\n",
                "\n",
                "DROP TABLE IF EXISTS `Person`;\n",
                "\n",
                "CREATE TABLE `Person` (\n",
                "  `id` INT NOT NULL PRIMARY KEY AUTO_INCREMENT,\n",
                "  `name` TEXT NOT NULL)\n",
                "  ENGINE=InnoDB;\n",
                "\n",
                "SET FOREIGN_KEY_CHECKS = 1;\n",
            )
        );
    });
}

#[test]
fn ordered_container_indexes_its_index_column() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let names = b.container(
        "::std::vector< ::std::string >",
        Container::ordered(long, string),
    );
    let person = b.object("Person").build();
    b.member(person, "id_", long).id();
    b.member(person, "names_", names);
    let unit = b.build().unwrap();

    generate(&unit, Database::Pgsql, |schema| {
        let stmts = render(Database::Pgsql, &schema.create(1));
        assert_eq!(
            &stmts[2..],
            [
                "CREATE INDEX \"Person_names_object_id_i\" ON \"Person_names\" (\"object_id\")",
                "CREATE INDEX \"Person_names_index_i\" ON \"Person_names\" (\"index\")",
            ]
        );
    });
}

#[test]
fn only_concrete_own_objects_get_tables() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let elsewhere = b.object("Elsewhere").file("other.hxx").build();
    let base = b.object("Base").abstract_().build();
    let derived = b.object("Derived").base(base).build();
    let value = b.composite("Value").build();
    b.member(elsewhere, "id_", long).id();
    b.member(base, "id_", long).id();
    b.member(derived, "name_", string);
    b.member(value, "x_", long);
    let unit = b.build().unwrap();

    generate(&unit, Database::Sqlite, |schema| {
        assert_eq!(schema.classes().collect::<Vec<_>>(), [derived]);
        for id in [elsewhere, base, value] {
            let err = schema.class(id).unwrap_err();
            assert!(err.to_string().ends_with("has no table in this schema"));
        }
        assert_eq!(
            render(Database::Sqlite, &schema.drop(2)),
            ["DROP TABLE IF EXISTS \"Derived\""]
        );
    });
}

#[test]
fn class_schema_serializes_each_pass() {
    let unit = company();
    let mapping = Mapping::build(&unit, &Options::new().database(Database::Sqlite)).unwrap();
    let schema = SchemaGenerator::new(&unit, &mapping, Database::Sqlite).unwrap();

    let employer = schema.classes().next().unwrap();
    let class = schema.class(employer).unwrap();

    assert!(class.drop[0].is_empty());
    assert_eq!(
        class.drop[1],
        [
            "DROP TABLE IF EXISTS \"Employer_tags\"",
            "DROP TABLE IF EXISTS \"Employer\"",
        ]
    );
    assert_eq!(class.create[0].len(), 3);
    assert!(class.create[1].is_empty());
}
