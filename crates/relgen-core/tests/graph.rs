use relgen_core::graph::{MemberId, Scalar, TypeKind, Unit};

#[test]
fn fq_name_follows_namespace_chain() {
    let mut b = Unit::builder("hr.hxx");
    let hr = b.namespace("hr");
    let payroll = b.nested_namespace(hr, "payroll");
    let top = b.object("Top").build();
    let nested = b.object("Slip").namespace(payroll).build();
    let unit = b.build().unwrap();

    assert_eq!(unit.fq_name(unit.class(top)), "::Top");
    assert_eq!(unit.fq_name(unit.class(nested)), "::hr::payroll::Slip");
}

#[test]
fn id_member_is_found_in_persistent_base() {
    let mut b = Unit::builder("hr.hxx");
    let int = b.fundamental("int", Scalar::Int32);
    let base = b.object("Base").abstract_().build();
    let derived = b.object("Derived").base(base).build();
    b.member(base, "id_", int).id();
    b.member(derived, "age_", int);
    let unit = b.build().unwrap();

    let id = unit.id_member(unit.class(derived)).unwrap();
    assert_eq!(id.name, "id_");
    assert_eq!(id.scope, base);
}

#[test]
fn find_member_skips_transient_and_searches_bases() {
    let mut b = Unit::builder("hr.hxx");
    let int = b.fundamental("int", Scalar::Int32);
    let base = b.object("Base").abstract_().build();
    let derived = b.object("Derived").base(base).build();
    b.member(base, "id_", int).id();
    b.member(base, "age_", int);
    b.member(derived, "age_", int).transient();
    let unit = b.build().unwrap();

    let class = unit.class(derived);
    let age = unit.find_member(class, "age_").unwrap();
    assert_eq!(age.scope, base);
    assert!(unit.find_member(class, "salary_").is_none());
}

#[test]
fn unwrap_reports_nullable_wrappers() {
    let mut b = Unit::builder("hr.hxx");
    let string = b.fundamental("::std::string", Scalar::String);
    let nullable = b.wrapper("::odb::nullable< ::std::string >", string, true);
    let outer = b.wrapper("::holder< ::odb::nullable< ::std::string > >", nullable, false);
    let unit = b.build().unwrap();

    let (ty, null) = unit.unwrap(outer);
    assert_eq!(ty.id, string);
    assert!(null);
    assert!(matches!(ty.kind, TypeKind::Fundamental(Scalar::String)));

    let (_, null) = unit.unwrap(string);
    assert!(!null);
}

#[test]
fn classes_from_other_files_are_not_emitted() {
    let mut b = Unit::builder("person.hxx");
    let own = b.object("Person").build();
    let other = b.object("Base").file("base.hxx").build();
    let fwd = b.object("Later").incomplete().build();
    let plain = b.plain("Helper").build();
    let unit = b.build().unwrap();

    assert!(unit.is_emitted(unit.class(own)));
    assert!(!unit.is_emitted(unit.class(other)));
    assert!(!unit.is_emitted(unit.class(fwd)));
    assert!(!unit.is_emitted(unit.class(plain)));
}

#[test]
fn verify_rejects_dangling_member_id() {
    let mut b = Unit::builder("t.hxx");
    let class = b.object("A").build();
    let mut unit = b.build().unwrap();

    unit.classes[class.0].members.push(MemberId(42));

    let err = unit.verify().unwrap_err();
    assert!(err.is_invariant_violation());
    assert!(err.to_string().contains("member id 42"), "got: {err}");
}

#[test]
fn verify_rejects_inheritance_cycle() {
    let mut b = Unit::builder("t.hxx");
    let a = b.object("A").build();
    let c = b.object("C").base(a).build();
    let mut unit = b.build().unwrap();

    unit.classes[a.0].bases.push(relgen_core::graph::Inherits {
        base: c,
        is_virtual: false,
    });

    let err = unit.verify().unwrap_err();
    assert!(err.is_invariant_violation());
}

#[test]
fn unit_loads_from_json() {
    let mut b = Unit::builder("t.hxx");
    let int = b.fundamental("int", Scalar::Int32);
    let a = b.object("A").build();
    b.member(a, "id_", int).id().auto();
    let unit = b.build().unwrap();

    let json = serde_json::to_string(&unit).unwrap();
    let loaded: Unit = serde_json::from_str(&json).unwrap();
    loaded.verify().unwrap();

    assert_eq!(loaded.classes.len(), 1);
    assert!(loaded.member(loaded.class(a).members[0]).auto);
}
