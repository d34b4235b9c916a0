#![allow(dead_code)]

use relgen_codegen::Output;
use relgen_core::graph::{Container, Scalar, Unit};
use relgen_core::{Database, Options};

pub fn options(database: Database) -> Options {
    Options::new().database(database)
}

pub fn sqlite() -> Options {
    options(Database::Sqlite)
}

pub fn generate(unit: &Unit, options: &Options) -> Output {
    relgen_codegen::generate(unit, options).unwrap()
}

/// Trims every line, so that expectations do not depend on indentation.
pub fn lines(text: &str) -> String {
    text.lines().map(str::trim).collect::<Vec<_>>().join("\n")
}

pub fn contains(text: &str, needle: &str) -> bool {
    lines(text).contains(&lines(needle))
}

/// The brace-delimited declaration or definition starting at the first line
/// equal to `head`, trimmed with [`lines`].
pub fn block(text: &str, head: &str) -> String {
    let text = lines(text);
    let mut ret = vec![];
    let mut depth = 0;
    let mut found = false;

    for line in text.lines() {
        if !found {
            if line != head {
                continue;
            }
            found = true;
        }

        ret.push(line);
        depth += line.matches('{').count();
        depth -= line.matches('}').count().min(depth);

        if depth == 0 && line.starts_with('}') {
            break;
        }
    }

    assert!(found, "no `{head}` in:\n{text}");
    ret.join("\n")
}

pub fn person() -> Unit {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "name_", string);
    b.build().unwrap()
}

pub fn tagged_person() -> Unit {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let tags = b.container("::std::set< ::std::string >", Container::set(string));
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "name_", string);
    b.member(person, "tags_", tags);
    b.build().unwrap()
}

/// `Employee` points at its employer.
pub fn company() -> Unit {
    let mut b = Unit::builder("company.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let employer = b.object("Employer").build();
    let employee = b.object("Employee").build();
    let employer_ptr = b.pointer(employer);
    b.member(employer, "id_", long).id().auto();
    b.member(employer, "name_", string);
    b.member(employee, "id_", long).id().auto();
    b.member(employee, "employer_", employer_ptr);
    b.build().unwrap()
}

/// As [`company`], with `Employer` listing its employees through the other
/// side of the pointer.
pub fn company_with_inverse() -> Unit {
    let mut b = Unit::builder("company.hxx");
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
    b.build().unwrap()
}

pub fn addressed_person() -> Unit {
    let mut b = Unit::builder("person.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let address = b.composite("Address").build();
    let address_ty = b.class_type(address);
    b.member(address, "street_", string);
    b.member(address, "city_", string);
    let person = b.object("Person").build();
    b.member(person, "id_", long).id().auto();
    b.member(person, "addr_", address_ty);
    b.build().unwrap()
}

pub fn employee_view() -> Unit {
    let mut b = Unit::builder("employee.hxx");
    let long = b.fundamental("unsigned long", Scalar::UInt64);
    let string = b.fundamental("::std::string", Scalar::String);
    let employee = b.object("Employee").build();
    let employer = b.object("Employer").build();
    let employer_ptr = b.pointer(employer);
    b.member(employee, "id_", long).id();
    b.member(employee, "first_", string);
    b.member(employee, "employer_", employer_ptr);
    b.member(employer, "id_", long).id();
    b.member(employer, "name_", string);

    let view = b
        .view("EmployeeName")
        .view_object(employee)
        .view_alias(employer, "boss", Some("employer = boss.id"))
        .build();
    b.member(view, "first_", string);
    b.member(view, "company_", string).column("boss.name");
    b.build().unwrap()
}
