mod util;
use util::*;

use relgen_core::graph::{Container, Scalar, Unit};
use relgen_core::Database;

use pretty_assertions::assert_eq;

#[test]
fn person_declares_counts_statements_and_image() {
    let out = generate(&person(), &sqlite());

    assert!(contains(&out.header, "static const std::size_t in_column_count = 1UL;"));
    assert!(contains(&out.header, "static const std::size_t out_column_count = 2UL;"));
    for name in [
        "persist_statement",
        "find_statement",
        "update_statement",
        "erase_statement",
    ] {
        assert!(contains(&out.header, &format!("static const char* const {name};")));
    }
    assert!(!contains(&out.header, "query_clause"));

    // Auto-assigned ids are written back into the object.
    assert!(contains(&out.header, "static void\npersist (database&, object_type&);"));

    assert_eq!(
        block(&out.header, "struct image_type"),
        lines(
            "struct image_type
            {
            // id_
            //
            long long id_value;
            bool id_null;

            // name_
            //
            details::buffer name_value;
            std::size_t name_size;
            bool name_null;

            std::size_t version;
            };"
        )
    );
}

#[test]
fn header_is_guarded_and_includes_the_input() {
    let out = generate(&person(), &sqlite());

    assert!(out.header.starts_with("// This file was generated by relgen.\n"));
    assert!(contains(&out.header, "#ifndef PERSON_ODB_HXX\n#define PERSON_ODB_HXX"));
    assert!(contains(&out.header, "#include \"person.hxx\""));
    assert!(contains(&out.header, "#include <odb/sqlite/sqlite-types.hxx>"));
    assert!(!contains(&out.header, "#include <odb/sqlite/query.hxx>"));
    assert!(out.header.ends_with("#endif // PERSON_ODB_HXX\n"));
}

#[test]
fn set_of_strings_gets_container_traits() {
    let out = generate(&tagged_person(), &sqlite());
    let traits = block(&out.header, "struct tags_traits");

    assert!(traits.contains("typedef ::std::set< ::std::string > container_type;"));
    assert!(traits.contains("typedef set_functions<value_type> functions_type;"));
    assert!(traits.contains("static const std::size_t cond_column_count = 1UL;"));
    assert!(traits.contains("static const std::size_t data_column_count = 2UL;"));
    assert!(!traits.contains("index_type"));
    assert!(!traits.contains("key_type"));
    assert!(traits.contains("static const char* const insert_one_statement;"));
    assert!(traits.contains("insert_one (const value_type&, void*);"));
    assert!(traits.contains("load_all (value_type&, void*);"));
}

#[test]
fn ordered_containers_pass_their_index() {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let names = b.container(
        "::std::vector< ::std::string >",
        Container::ordered(long, string),
    );
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "names_", names);
    let unit = b.build().unwrap();

    let out = generate(&unit, &sqlite());
    let traits = block(&out.header, "struct names_traits");

    assert!(traits.contains("typedef container_traits::index_type index_type;"));
    assert!(traits.contains("typedef ordered_functions<index_type, value_type> functions_type;"));
    assert!(traits.contains("init (data_image_type&, index_type, const value_type&);"));
    assert!(traits.contains("insert_one (index_type, const value_type&, void*);"));
    assert!(traits.contains("static const std::size_t data_column_count = 3UL;"));
}

#[test]
fn abstract_objects_have_no_static_data() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let tags = b.container("::std::set< ::std::string >", Container::set(string));
    let base = b.object("Base").abstract_().build();
    b.member(base, "id_", long).id();
    b.member(base, "tags_", tags);
    let unit = b.build().unwrap();

    let out = generate(&unit, &sqlite());
    let traits = block(&out.header, "class access::object_traits< ::Base >");

    assert!(!traits.contains("column_count"));
    assert!(!traits.contains("_statement;"));
    assert!(!traits.contains("persist ("));
    assert!(!traits.contains("find_ ("));
    assert!(traits.contains("struct tags_traits"));
    assert!(traits.contains("init (id_image_type&, const id_type&);"));
}

#[test]
fn derived_objects_extend_the_base_image() {
    let mut b = Unit::builder("t.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let base = b.object("Person").abstract_().build();
    let derived = b.object("Employee").base(base).build();
    b.member(base, "id_", long).id();
    b.member(derived, "title_", string);
    let unit = b.build().unwrap();

    let out = generate(&unit, &sqlite().generate_query(true));
    let traits = block(&out.header, "class access::object_traits< ::Employee >");

    assert!(traits.contains("typedef object_traits< ::Person >::id_type id_type;"));
    assert!(traits.contains(
        "struct image_type: object_traits< ::Person >::image_type"
    ));
    assert!(traits.contains(
        "struct query_columns: object_traits< ::Person >::query_columns"
    ));
}

#[test]
fn inverse_containers_are_read_only() {
    let out = generate(&company_with_inverse(), &sqlite());
    let traits = block(&out.header, "struct employees_traits");

    assert!(traits.contains("select_all_statement;"));
    assert!(traits.contains("load (container_type&,"));
    for name in ["insert_one", "delete_all", "persist", "update", "erase"] {
        assert!(!traits.contains(&format!("{name} (")), "{name} declared");
    }
}

#[test]
fn query_columns_of_pointing_objects_are_deferred() {
    let out = generate(&company(), &sqlite().generate_query(true));

    let employee = block(&out.header, "class access::object_traits< ::Employee >");
    assert!(employee.contains("struct query_columns;"));
    assert!(employee.contains("struct query_type;"));

    assert!(contains(
        &out.header,
        "struct access::object_traits< ::Employee >::query_columns"
    ));
    assert!(contains(
        &out.header,
        "struct access::object_traits< ::Employee >::query_type: query_base_type, query_columns"
    ));
    assert!(contains(&out.header, "object_traits< ::Employer >::id_type,"));

    // Employer has no pointer members, so its columns stay inline.
    assert!(!contains(
        &out.header,
        "struct access::object_traits< ::Employer >::query_columns"
    ));
    let employer = block(&out.header, "class access::object_traits< ::Employer >");
    assert!(employer.contains("struct query_type: query_base_type, query_columns"));
}

#[test]
fn containers_of_pointers_defer_their_owner() {
    let out = generate(&company_with_inverse(), &sqlite().generate_query(true));

    assert!(contains(
        &out.header,
        "struct access::object_traits< ::Employer >::query_columns"
    ));
}

#[test]
fn nothing_is_deferred_without_pointers() {
    let out = generate(&person(), &sqlite().generate_query(true));

    assert!(!contains(&out.header, "// Query columns of objects that point to other objects."));
    assert!(contains(&out.header, "static const char* const query_clause;"));
    assert!(contains(&out.header, "#include <odb/sqlite/query.hxx>"));

    let columns = block(&out.header, "struct query_columns");
    assert!(columns.contains("static const char table[];"));
    assert!(columns.contains("// name\n//\nstatic const sqlite::query_column<"));
}

#[test]
fn classes_from_other_files_are_not_emitted() {
    let mut b = Unit::builder("derived.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let base = b.object("Base").abstract_().file("base.hxx").build();
    b.object("Derived").base(base).build();
    b.member(base, "id_", long).id();
    let unit = b.build().unwrap();

    let out = generate(&unit, &sqlite());

    assert!(!contains(&out.header, "class access::object_traits< ::Base >"));
    assert!(contains(&out.header, "class access::object_traits< ::Derived >"));
    assert!(!contains(&out.source, "access::object_traits< ::Base >::\ngrow"));
}

#[test]
fn composite_values_have_no_version() {
    let out = generate(&addressed_person(), &sqlite());
    let image = block(
        &block(&out.header, "class access::composite_value_traits< ::Address >"),
        "struct image_type",
    );

    assert!(image.contains("details::buffer street_value;"));
    assert!(!image.contains("version"));

    let person = block(&out.header, "class access::object_traits< ::Person >");
    assert!(person.contains("composite_value_traits< ::Address >::image_type addr_value;"));
}

#[test]
fn views_aggregate_their_objects() {
    let out = generate(&employee_view(), &sqlite().generate_query(true));
    let traits = block(&out.header, "class access::view_traits< ::EmployeeName >");

    assert!(traits.contains(
        "typedef object_traits< ::Employee >::query_columns Employee;"
    ));
    assert!(traits.contains("struct boss_alias_tag;"));
    assert!(traits.contains(
        "typedef sqlite::alias_query_columns< ::Employer, boss_alias_tag > boss;"
    ));
    assert!(traits.contains("static const std::size_t column_count = 2UL;"));
    assert!(traits.contains("static const char* const query_statement;"));
}

#[test]
fn mysql_images_use_native_types() {
    let out = generate(&person(), &options(Database::Mysql));

    assert!(contains(&out.header, "unsigned long long id_value;"));
    assert!(contains(&out.header, "my_bool id_null;"));
    assert!(contains(&out.header, "unsigned long name_size;"));
    assert!(contains(&out.header, "grow (image_type&, my_bool*);"));
}

#[test]
fn map_containers_carry_their_key() {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let phones = b.container(
        "::std::multimap< ::std::string, ::std::string >",
        Container::multimap(string, string),
    );
    let nicknames = b.container("::std::multiset< ::std::string >", Container::multiset(string));
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "phones_", phones);
    b.member(person, "nicknames_", nicknames);
    let unit = b.build().unwrap();

    let out = generate(&unit, &sqlite());

    let phones = block(&out.header, "struct phones_traits");
    assert!(phones.contains("typedef container_traits::key_type key_type;"));
    assert!(phones.contains("typedef map_functions<key_type, value_type> functions_type;"));
    assert!(phones.contains("static const std::size_t data_column_count = 3UL;"));
    assert!(phones.contains("insert_one (const key_type&, const value_type&, void*);"));

    let nicknames = block(&out.header, "struct nicknames_traits");
    assert!(nicknames.contains("typedef set_functions<value_type> functions_type;"));
    assert!(!nicknames.contains("key_type"));
}

#[test]
fn objects_without_default_constructor_are_only_found_into_an_instance() {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let person = b.object("Person").no_default_ctor().build();
    b.member(person, "id_", long).id();
    let unit = b.build().unwrap();

    let out = generate(&unit, &sqlite());

    assert!(!contains(&out.header, "static pointer_type\nfind (database&, const id_type&);"));
    assert!(contains(&out.header, "static bool\nfind (database&, const id_type&, object_type&);"));
    assert!(contains(&out.header, "static void\npersist (database&, const object_type&);"));
}
