use relgen_core::graph::{ClassId, Container, Scalar, Unit};
use relgen_core::{Database, Mapping, Options};
use relgen_sql::{view_statement, ContainerStatements, ObjectStatements, Serializer};

use pretty_assertions::assert_eq;

fn mapping(unit: &Unit) -> Mapping {
    Mapping::build(unit, &Options::new().database(Database::Sqlite)).unwrap()
}

fn object(mapping: &Mapping, class: ClassId) -> ObjectStatements {
    ObjectStatements::new(mapping.class(class).unwrap()).unwrap()
}

fn person() -> (Unit, ClassId) {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "name_", string);
    (b.build().unwrap(), person)
}

#[test]
fn person_statements_skip_auto_id_on_insert() {
    let (unit, person) = person();
    let mapping = mapping(&unit);
    let stmts = object(&mapping, person);
    let sql = Serializer::sqlite();

    assert_eq!(
        sql.serialize(&stmts.persist),
        r#"INSERT INTO "Person" ("name") VALUES (?)"#
    );
    assert_eq!(
        sql.serialize(&stmts.find),
        r#"SELECT "Person"."id", "Person"."name" FROM "Person" WHERE "Person"."id"=?"#
    );
    assert_eq!(
        sql.serialize(stmts.update.as_ref().unwrap()),
        r#"UPDATE "Person" SET "name"=? WHERE "id"=?"#
    );
    assert_eq!(
        sql.serialize(&stmts.erase),
        r#"DELETE FROM "Person" WHERE "id"=?"#
    );
    assert_eq!(
        sql.serialize(&stmts.query),
        r#"SELECT "Person"."id", "Person"."name" FROM "Person""#
    );
}

#[test]
fn placeholders_and_quotes_follow_the_database() {
    let (unit, person) = person();
    let mapping = mapping(&unit);
    let stmts = object(&mapping, person);

    assert_eq!(
        Serializer::postgresql().serialize(stmts.update.as_ref().unwrap()),
        r#"UPDATE "Person" SET "name"=$1 WHERE "id"=$2"#
    );
    assert_eq!(
        Serializer::mysql().serialize(&stmts.persist),
        "INSERT INTO `Person` (`name`) VALUES (?)"
    );
}

#[test]
fn id_only_object_has_no_update() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let class = b.object("Token").build();
    b.member(class, "id_", long).id().auto();
    let unit = b.build().unwrap();

    let mapping = mapping(&unit);
    let stmts = object(&mapping, class);
    assert!(stmts.update.is_none());

    assert_eq!(
        Serializer::sqlite().serialize(&stmts.persist),
        r#"INSERT INTO "Token" DEFAULT VALUES"#
    );
    assert_eq!(
        Serializer::mysql().serialize(&stmts.persist),
        "INSERT INTO `Token` () VALUES ()"
    );
}

#[test]
fn query_joins_pointed_to_objects() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let employer = b.object("Employer").build();
    let employee = b.object("Employee").build();
    let employer_ptr = b.pointer(employer);
    b.member(employer, "id_", long).id();
    b.member(employee, "id_", long).id();
    b.member(employee, "employer_", employer_ptr);
    let unit = b.build().unwrap();

    let mapping = mapping(&unit);
    let stmts = object(&mapping, employee);

    assert_eq!(
        Serializer::sqlite().serialize(&stmts.query),
        concat!(
            r#"SELECT "Employee"."id", "Employee"."employer" FROM "Employee" "#,
            r#"LEFT JOIN "Employer" AS "employer" ON "employer"."id"="Employee"."employer""#
        )
    );
}

#[test]
fn abstract_object_has_no_statements() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let base = b.object("Base").abstract_().build();
    b.member(base, "id_", long).id();
    let unit = b.build().unwrap();

    let mapping = mapping(&unit);
    let err = ObjectStatements::new(mapping.class(base).unwrap()).unwrap_err();
    assert!(err.is_invariant_violation());
}

#[test]
fn container_statements_address_the_side_table() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let tags = b.container("::std::set< ::std::string >", Container::set(string));
    let names = b.container(
        "::std::vector< ::std::string >",
        Container::ordered(long, string),
    );
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "tags_", tags);
    b.member(person, "names_", names);
    let unit = b.build().unwrap();

    let mapping = mapping(&unit);
    let class = mapping.class(person).unwrap();
    let sql = Serializer::sqlite();

    let tags = ContainerStatements::new(&class.containers[0]).unwrap();
    assert_eq!(
        sql.serialize(tags.insert_one.as_ref().unwrap()),
        r#"INSERT INTO "Person_tags" ("object_id", "value") VALUES (?, ?)"#
    );
    assert_eq!(
        sql.serialize(&tags.select_all),
        r#"SELECT "Person_tags"."value" FROM "Person_tags" WHERE "Person_tags"."object_id"=?"#
    );
    assert_eq!(
        sql.serialize(tags.delete_all.as_ref().unwrap()),
        r#"DELETE FROM "Person_tags" WHERE "object_id"=?"#
    );

    let names = ContainerStatements::new(&class.containers[1]).unwrap();
    assert_eq!(
        sql.serialize(&names.select_all),
        concat!(
            r#"SELECT "Person_names"."index", "Person_names"."value" FROM "Person_names" "#,
            r#"WHERE "Person_names"."object_id"=? ORDER BY "Person_names"."index""#
        )
    );
}

#[test]
fn inverse_container_only_selects() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let employer = b.object("Employer").build();
    let employee = b.object("Employee").build();
    let employer_ptr = b.pointer(employer);
    let employee_ptr = b.pointer(employee);
    let employees = b.container("::std::set< ::Employee* >", Container::set(employee_ptr));
    b.member(employer, "id_", long).id();
    b.member(employer, "employees_", employees).inverse("employer_");
    b.member(employee, "id_", long).id();
    b.member(employee, "employer_", employer_ptr);
    let unit = b.build().unwrap();

    let mapping = mapping(&unit);
    let stmts = ContainerStatements::new(&mapping.class(employer).unwrap().containers[0]).unwrap();

    assert!(stmts.insert_one.is_none());
    assert!(stmts.delete_all.is_none());
    assert_eq!(
        Serializer::postgresql().serialize(&stmts.select_all),
        r#"SELECT "Employee"."id" FROM "Employee" WHERE "Employee"."employer"=$1"#
    );
}

#[test]
fn composite_container_outside_object_has_no_statements() {
    let mut b = Unit::builder("t.hxx");
    let string = b.fundamental("::std::string", Scalar::String);
    let tags = b.container("::std::set< ::std::string >", Container::set(string));
    let address = b.composite("Address").build();
    b.member(address, "tags_", tags);
    let unit = b.build().unwrap();

    let mapping = mapping(&unit);
    assert!(ContainerStatements::new(&mapping.class(address).unwrap().containers[0]).is_none());
}

#[test]
fn view_joins_through_pointers_and_aliases() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let employer = b.object("Employer").build();
    let employee = b.object("Employee").build();
    let employer_ptr = b.pointer(employer);
    let view = b
        .view("EmployeeName")
        .view_object(employee)
        .view_alias(employer, "company", None)
        .view_query("\"company\".\"name\" <> ''")
        .build();
    b.member(employer, "id_", long).id();
    b.member(employer, "name_", string);
    b.member(employee, "id_", long).id();
    b.member(employee, "first_", string);
    b.member(employee, "employer_", employer_ptr);
    b.member(view, "first_", string);
    b.member(view, "company_", string).column("company.name");
    let unit = b.build().unwrap();

    let mapping =
        Mapping::build(&unit, &Options::new().database(Database::Pgsql).generate_query(true))
            .unwrap();
    let stmt = view_statement(&unit, &mapping, mapping.class(view).unwrap()).unwrap();

    assert_eq!(
        Serializer::postgresql().serialize(&stmt),
        concat!(
            r#"SELECT "Employee"."first", "company"."name" FROM "Employee" "#,
            r#"LEFT JOIN "Employer" AS "company" ON "Employee"."employer"="company"."id" "#,
            r#"WHERE ("company"."name" <> '')"#
        )
    );
}

#[test]
fn view_without_relation_needs_a_join_condition() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let a = b.object("A").build();
    let c = b.object("C").build();
    let view = b.view("AC").view_object(a).view_object(c).build();
    b.member(a, "id_", long).id();
    b.member(c, "id_", long).id();
    b.member(view, "id_", long).column("A.id");
    let unit = b.build().unwrap();

    let mapping =
        Mapping::build(&unit, &Options::new().database(Database::Pgsql).generate_query(true))
            .unwrap();
    let err = view_statement(&unit, &mapping, mapping.class(view).unwrap()).unwrap_err();

    assert!(err.is_unsupported_construct());
    assert!(err.to_string().contains("no join condition"), "got: {err}");
}
