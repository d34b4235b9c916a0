use relgen_cli::RelgenCli;
use relgen_core::graph::{Scalar, Unit};

use std::path::PathBuf;

fn workdir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("relgen-cli-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_person(dir: &PathBuf) -> PathBuf {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "name_", string);
    let unit = b.build().unwrap();

    let input = dir.join("person.json");
    std::fs::write(&input, serde_json::to_string(&unit).unwrap()).unwrap();
    input
}

fn run(args: &[&str]) -> anyhow::Result<()> {
    RelgenCli::new().parse_from(std::iter::once("relgen").chain(args.iter().copied()))
}

#[test]
fn writes_header_source_and_schema_next_to_the_input() {
    let dir = workdir("next-to-input");
    let input = write_person(&dir);

    run(&["generate", input.to_str().unwrap(), "--database", "sqlite"]).unwrap();

    let header = std::fs::read_to_string(dir.join("person-odb.hxx")).unwrap();
    let source = std::fs::read_to_string(dir.join("person-odb.cxx")).unwrap();
    let schema = std::fs::read_to_string(dir.join("person.sql")).unwrap();

    assert!(header.contains("#define PERSON_ODB_HXX"));
    assert!(source.contains("#include \"person-odb.hxx\""));
    assert!(schema.contains("CREATE TABLE \"Person\" ("));
}

#[test]
fn embedded_schema_writes_no_sql_file() {
    let dir = workdir("embedded");
    let input = write_person(&dir);
    let out = dir.join("out");
    std::fs::create_dir_all(&out).unwrap();

    run(&[
        "generate",
        input.to_str().unwrap(),
        "--database",
        "pgsql",
        "--schema-format",
        "embedded",
        "--output-dir",
        out.to_str().unwrap(),
    ])
    .unwrap();

    assert!(out.join("person-odb.hxx").exists());
    assert!(out.join("person-odb.cxx").exists());
    assert!(!out.join("person.sql").exists());
}

#[test]
fn missing_database_fails_without_writing() {
    let dir = workdir("no-database");
    let input = write_person(&dir);

    let err = run(&["generate", input.to_str().unwrap()]).unwrap_err();

    assert!(format!("{err:#}").contains("no target database"));
    assert!(!dir.join("person-odb.hxx").exists());
}

#[test]
fn unknown_database_is_rejected_by_the_parser() {
    assert!(run(&["generate", "person.json", "--database", "oracle"]).is_err());
}
