use crate::graph::{ClassId, ContainerKind, DataMember, Scalar, TypeId, TypeKind, Unit};
use crate::{Error, Result};

/// What a data member maps to, derived from its declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Simple(Simple),
    Composite(ClassId),
    Pointer(Pointer),
    Container(ContainerDesc),
}

/// A value bound to a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Simple {
    /// The type after stripping wrappers
    pub ty: TypeId,
    pub scalar: Scalar,

    /// The value went through a nullable wrapper
    pub nullable: bool,
}

/// A pointer to a persistent object, stored as the pointee's id.
#[derive(Debug, Clone, PartialEq)]
pub struct Pointer {
    pub class: ClassId,
    pub ty: TypeId,
}

/// Shape of a container member.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDesc {
    pub ty: TypeId,
    pub kind: ContainerKind,

    /// Ordered container that keeps its index column
    pub ordered: bool,

    /// Loaded from the other side of the relation and never written
    pub inverse: bool,

    pub index: Option<Element>,
    pub key: Option<Element>,
    pub value: Element,
}

/// Index, key or value of a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Simple(Simple),
    Composite(ClassId),
    Pointer(Pointer),
}

impl ContainerDesc {
    /// Runtime algorithm family handling this container shape.
    pub fn functions(&self) -> &'static str {
        match self.kind {
            ContainerKind::Ordered => "ordered_functions",
            ContainerKind::Map | ContainerKind::Multimap => "map_functions",
            ContainerKind::Set | ContainerKind::Multiset => "set_functions",
        }
    }
}

impl Element {
    pub fn pointer(&self) -> Option<&Pointer> {
        match self {
            Element::Pointer(pointer) => Some(pointer),
            _ => None,
        }
    }

    pub fn composite(&self) -> Option<ClassId> {
        match self {
            Element::Composite(class) => Some(*class),
            _ => None,
        }
    }
}

/// Classifies a data member by its declared type.
pub fn classify(unit: &Unit, member: &DataMember) -> Result<MemberKind> {
    let (ty, nullable) = unit.unwrap(member.ty);

    let kind = match &ty.kind {
        TypeKind::Fundamental(scalar) => MemberKind::Simple(Simple {
            ty: ty.id,
            scalar: *scalar,
            nullable,
        }),
        TypeKind::Class(id) => {
            let class = unit.class(*id);

            if !class.is_composite() {
                let msg = if class.is_object() {
                    format!(
                        "member `{}` holds object `{}` by value; use an object pointer",
                        member.name,
                        unit.fq_name(class)
                    )
                } else {
                    format!(
                        "type `{}` of member `{}` is not a persistent class",
                        unit.fq_name(class),
                        member.name
                    )
                };
                return Err(Error::unsupported_construct(&member.location, msg));
            }

            if ty.id != member.ty {
                return Err(Error::unsupported_construct(
                    &member.location,
                    format!("composite value member `{}` cannot be wrapped", member.name),
                ));
            }

            MemberKind::Composite(*id)
        }
        TypeKind::Pointer(id) => {
            if member.inverse.is_some() {
                return Err(Error::unsupported_construct(
                    &member.location,
                    format!(
                        "inverse member `{}` must be a container of object pointers",
                        member.name
                    ),
                ));
            }
            MemberKind::Pointer(pointer(unit, member, ty.id, *id)?)
        }
        TypeKind::Container(container) => {
            if ty.id != member.ty {
                return Err(Error::unsupported_construct(
                    &member.location,
                    format!("container member `{}` cannot be wrapped", member.name),
                ));
            }

            let index = match container.index {
                Some(index) => match element(unit, member, index)? {
                    Element::Simple(simple) => Some(Element::Simple(simple)),
                    _ => {
                        return Err(Error::unsupported_construct(
                            &member.location,
                            format!("index type of container `{}` must be a simple value", member.name),
                        ))
                    }
                },
                None => None,
            };
            let key = container
                .key
                .map(|key| element(unit, member, key))
                .transpose()?;
            let value = element(unit, member, container.value)?;

            let inverse = member.inverse.is_some();
            if inverse && value.pointer().is_none() {
                return Err(Error::unsupported_construct(
                    &member.location,
                    format!(
                        "inverse member `{}` must be a container of object pointers",
                        member.name
                    ),
                ));
            }

            let ordered = container.kind == ContainerKind::Ordered && !member.unordered;

            MemberKind::Container(ContainerDesc {
                ty: ty.id,
                kind: container.kind,
                ordered,
                inverse,
                index: if ordered { index } else { None },
                key,
                value,
            })
        }
        TypeKind::Wrapper { .. } => unreachable!("unwrap strips every wrapper"),
    };

    log::trace!("classified `{}` as {:?}", member.name, kind);
    Ok(kind)
}

fn element(unit: &Unit, member: &DataMember, ty: TypeId) -> Result<Element> {
    let (ty, nullable) = unit.unwrap(ty);

    match &ty.kind {
        TypeKind::Fundamental(scalar) => Ok(Element::Simple(Simple {
            ty: ty.id,
            scalar: *scalar,
            nullable,
        })),
        TypeKind::Class(id) if unit.class(*id).is_composite() => Ok(Element::Composite(*id)),
        TypeKind::Class(id) => Err(Error::unsupported_construct(
            &member.location,
            format!(
                "element type `{}` of container `{}` is not a composite value",
                unit.fq_name(unit.class(*id)),
                member.name
            ),
        )),
        TypeKind::Pointer(id) => Ok(Element::Pointer(pointer(unit, member, ty.id, *id)?)),
        TypeKind::Container(_) => Err(Error::unsupported_construct(
            &member.location,
            format!("container `{}` holds another container", member.name),
        )),
        TypeKind::Wrapper { .. } => unreachable!("unwrap strips every wrapper"),
    }
}

fn pointer(unit: &Unit, member: &DataMember, ty: TypeId, class: ClassId) -> Result<Pointer> {
    let pointee = unit.class(class);

    if !pointee.is_object() {
        return Err(Error::unsupported_construct(
            &member.location,
            format!(
                "member `{}` points to `{}` which is not a persistent object",
                member.name,
                unit.fq_name(pointee)
            ),
        ));
    }

    Ok(Pointer { class, ty })
}
