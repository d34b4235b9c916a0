mod util;
use util::*;

use relgen_core::graph::{Scalar, Unit};
use relgen_core::{Database, Options, SchemaFormat};

#[test]
fn missing_database_is_a_configuration_error() {
    let err = relgen_codegen::generate(&person(), &Options::new()).unwrap_err();

    assert!(err.is_invalid_configuration());
    assert!(err.to_string().contains("no target database"));
}

#[test]
fn views_require_query_support() {
    let err = relgen_codegen::generate(&employee_view(), &sqlite()).unwrap_err();

    assert!(err.is_invalid_configuration());
    assert!(err.to_string().contains("EmployeeName"));
}

#[test]
fn objects_without_an_id_are_rejected() {
    let mut b = Unit::builder("t.hxx");
    let string = b.fundamental("::std::string", Scalar::String);
    let note = b.object("Note").build();
    b.member(note, "text_", string);
    let unit = b.build().unwrap();

    let err = relgen_codegen::generate(&unit, &sqlite()).unwrap_err();
    assert!(err.is_unsupported_construct());
}

#[test]
fn standalone_schema_is_produced_for_sql_format() {
    let out = generate(&person(), &sqlite());
    let schema = out.schema.unwrap();

    assert!(schema.contains("DROP TABLE IF EXISTS \"Person\""));
    assert!(schema.contains("CREATE TABLE \"Person\" ("));
}

#[test]
fn schema_generation_can_be_disabled() {
    let out = generate(&person(), &sqlite().generate_schema(false));
    assert_eq!(out.schema, None);
    assert!(!contains(&out.source, "create_schema"));

    let out = generate(
        &person(),
        &sqlite()
            .generate_schema(false)
            .schema_format(SchemaFormat::Embedded),
    );
    assert_eq!(out.schema, None);
    assert!(!contains(&out.source, "create_schema"));
}

#[test]
fn table_prefix_reaches_the_statements() {
    let out = generate(&person(), &sqlite().table_prefix("app_"));

    assert!(contains(&out.source, r#""INSERT INTO \"app_Person\" (\"name\") VALUES (?)";"#));
    assert!(out.schema.unwrap().contains("CREATE TABLE \"app_Person\""));
}

#[test]
fn every_database_generates() {
    for database in [Database::Mysql, Database::Sqlite, Database::Pgsql] {
        let out = generate(&tagged_person(), &options(database).generate_query(true));
        let db = database.name();

        assert!(contains(&out.header, &format!("#include <odb/{db}/forward.hxx>")));
        assert!(contains(&out.source, &format!("#include <odb/{db}/container-statements.hxx>")));
        assert!(contains(&out.source, &format!("using namespace {db};")));
    }
}

#[test]
fn generation_is_deterministic() {
    let unit = company_with_inverse();
    let options = sqlite().generate_query(true);

    assert_eq!(generate(&unit, &options), generate(&unit, &options));
}

#[test]
fn stem_drops_directories_and_extension() {
    let unit = Unit::builder("include/model/person.hxx").build().unwrap();
    assert_eq!(relgen_codegen::stem(&unit), "person");

    let unit = Unit::builder("person").build().unwrap();
    assert_eq!(relgen_codegen::stem(&unit), "person");
}
