use relgen_core::graph::{Class, DataMember, Scalar, Unit};
use relgen_core::mapping::{ContainerDesc, Pointer, Simple};
use relgen_core::visit::{
    self, walk_members, BaseClauses, DeclVisitor, Descend, MemberCx, MemberVisitor,
    MembersVisitor,
};
use relgen_core::Result;

use pretty_assertions::assert_eq;

#[derive(Default)]
struct ClassNames(Vec<String>);

impl DeclVisitor for ClassNames {
    fn visit_class(&mut self, unit: &Unit, class: &Class) -> Result<()> {
        self.0.push(unit.fq_name(class));
        Ok(())
    }
}

#[derive(Default)]
struct Trace {
    events: Vec<String>,
    skip_composites: bool,
}

impl MembersVisitor for Trace {
    fn base(&mut self, _cx: &MemberCx<'_>, base: &Class) -> Result<Descend> {
        self.events.push(format!("base {}", base.name));
        Ok(Descend::Members)
    }

    fn simple(&mut self, cx: &MemberCx<'_>, member: &DataMember, _simple: &Simple) -> Result<()> {
        self.events.push(format!("simple {}", cx.column_name(member)));
        Ok(())
    }

    fn pointer(&mut self, cx: &MemberCx<'_>, member: &DataMember, _pointer: &Pointer) -> Result<()> {
        self.events.push(format!("pointer {}", cx.column_name(member)));
        Ok(())
    }

    fn composite(&mut self, _cx: &MemberCx<'_>, member: &DataMember, _class: &Class) -> Result<Descend> {
        self.events.push(format!("composite {}", member.name));
        Ok(if self.skip_composites {
            Descend::Skip
        } else {
            Descend::Members
        })
    }

    fn container(
        &mut self,
        cx: &MemberCx<'_>,
        member: &DataMember,
        _desc: &ContainerDesc,
    ) -> Result<()> {
        self.events.push(format!("container {}", cx.var_name(member)));
        Ok(())
    }
}

#[test]
fn decls_are_visited_in_declaration_order() {
    let mut b = Unit::builder("t.hxx");
    let first = b.object("First").build();
    let ns = b.namespace("inner");
    b.composite("Second").namespace(ns).build();
    b.view("Third").view_object(first).build();
    let unit = b.build().unwrap();

    let mut names = ClassNames::default();
    visit::visit_unit(&mut names, &unit).unwrap();

    assert_eq!(names.0, ["::First", "::inner::Second", "::Third"]);
}

#[test]
fn base_clauses_skip_transient_bases() {
    let mut b = Unit::builder("t.hxx");
    let plain = b.plain("Plain").build();
    let one = b.object("One").abstract_().build();
    let two = b.composite("Two").build();
    let derived = b.object("Derived").base(plain).base(one).base(two).build();
    let unit = b.build().unwrap();

    let mut clauses = BaseClauses::new(|unit: &Unit, base: &Class| unit.fq_name(base));
    let first = visit::inherits(&mut clauses, &unit, unit.class(derived)).unwrap();
    assert_eq!(first, [": ::One", ", ::Two"]);

    // The same visitor starts from fresh state on every walk.
    let second = visit::inherits(&mut clauses, &unit, unit.class(derived)).unwrap();
    assert_eq!(second, first);

    let none = visit::inherits(&mut clauses, &unit, unit.class(plain)).unwrap();
    assert!(none.is_empty());
}

#[test]
fn repeated_bases_are_each_visited() {
    let mut b = Unit::builder("t.hxx");
    let base = b.composite("Base").build();
    let derived = b.composite("Derived").base(base).virtual_base(base).build();
    let unit = b.build().unwrap();

    let mut clauses = BaseClauses::new(|_: &Unit, base: &Class| base.name.clone());
    let clauses = visit::inherits(&mut clauses, &unit, unit.class(derived)).unwrap();
    assert_eq!(clauses, [": Base", ", virtual Base"]);
}

#[test]
fn members_walk_bases_first_and_flattens_composites() {
    let mut b = Unit::builder("t.hxx");
    let int = b.fundamental("int", Scalar::Int32);
    let string = b.fundamental("::std::string", Scalar::String);
    let tags = b.container(
        "::std::set< ::std::string >",
        relgen_core::graph::Container::set(string),
    );

    let address = b.composite("Address").build();
    let address_ty = b.class_type(address);
    let base = b.object("Base").abstract_().build();
    let person = b.object("Person").base(base).build();
    let person_ptr = b.pointer(person);

    b.member(address, "street_", string);
    b.member(address, "tags_", tags);
    b.member(base, "id_", int).id();
    b.member(person, "addr_", address_ty);
    b.member(person, "cache_", int).transient();
    b.member(person, "boss_", person_ptr);
    let unit = b.build().unwrap();

    let mut trace = Trace::default();
    walk_members(&mut trace, &unit, unit.class(person)).unwrap();
    assert_eq!(
        trace.events,
        [
            "base Base",
            "simple id",
            "composite addr_",
            "simple addr_street",
            "container addr_tags_",
            "pointer boss",
        ]
    );

    let mut trace = Trace {
        skip_composites: true,
        ..Trace::default()
    };
    walk_members(&mut trace, &unit, unit.class(person)).unwrap();
    assert_eq!(
        trace.events,
        ["base Base", "simple id", "composite addr_", "pointer boss"]
    );
}

#[test]
fn members_walk_visits_a_shared_virtual_base_once() {
    let mut b = Unit::builder("t.hxx");
    let int = b.fundamental("int", Scalar::Int32);
    let root = b.composite("Root").build();
    let left = b.composite("Left").virtual_base(root).build();
    let right = b.composite("Right").virtual_base(root).build();
    let plain = b.composite("Plain").base(left).base(right).build();

    b.member(root, "x_", int);
    b.member(left, "l_", int);
    b.member(right, "r_", int);
    let unit = b.build().unwrap();

    let mut trace = Trace::default();
    walk_members(&mut trace, &unit, unit.class(plain)).unwrap();
    assert_eq!(
        trace.events,
        [
            "base Left",
            "base Root",
            "simple x",
            "simple l",
            "base Right",
            "simple r",
        ]
    );
}

#[derive(Default)]
struct Declared(Vec<String>);

impl MemberVisitor for Declared {
    fn visit_member(&mut self, _unit: &Unit, member: &DataMember) -> Result<()> {
        self.0.push(member.name.clone());
        Ok(())
    }
}

#[test]
fn names_visits_own_members_transient_included() {
    let mut b = Unit::builder("t.hxx");
    let int = b.fundamental("int", Scalar::Int32);
    let base = b.object("Base").abstract_().build();
    let person = b.object("Person").base(base).build();

    b.member(base, "id_", int).id();
    b.member(person, "age_", int);
    b.member(person, "cache_", int).transient();
    b.member(person, "rank_", int);
    let unit = b.build().unwrap();

    let mut declared = Declared::default();
    visit::names(&mut declared, &unit, unit.class(person)).unwrap();
    assert_eq!(declared.0, ["age_", "cache_", "rank_"]);
}

#[test]
fn members_walk_rejects_forward_declared_class() {
    let mut b = Unit::builder("t.hxx");
    let fwd = b.object("Later").incomplete().build();
    let unit = b.build().unwrap();

    let err = walk_members(&mut Trace::default(), &unit, unit.class(fwd)).unwrap_err();
    assert!(err.is_invariant_violation());
}
