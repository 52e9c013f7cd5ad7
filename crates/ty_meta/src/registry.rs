// ==============================================================================
// TypeRegistry - the queryable type-metadata model
// ==============================================================================
//
// Runtime types are opaque to the binder: everything it needs to know about
// them (generic identity, array shape, ancestors, implemented interfaces,
// constructibility) lives here as plain data, built once by the host through
// `TypeRegistryBuilder` and read-only afterwards. Introspection questions
// like "which closed forms of this generic contract does type X expose"
// become lookups against this structure.

use std::{iter, ops};

use la_arena::{Arena, Idx as Id};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;

pub type TypeId = Id<TypeInfo>;
pub type GenericDefId = Id<GenericDefInfo>;

/// An open generic type definition, e.g. "sequence of T".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericDefInfo {
    pub name: SmolStr,
    pub arity: usize,
}

/// Structural identity of a registered concrete type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Plain nominal type with no generic or array structure.
    Opaque,
    /// A generic definition closed over concrete arguments.
    Instance {
        def: GenericDefId,
        args: Vec<TypeId>,
    },
    /// An array of `elem`. `jagged` marks the vector (array-of-arrays
    /// capable) form; multi-dimensional blocks carry their rank instead.
    Array { elem: TypeId, rank: u32, jagged: bool },
}

/// Everything the binder can ask about one concrete runtime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: SmolStr,
    pub kind: TypeKind,
    /// Nominal ancestor, if any.
    pub base: Option<TypeId>,
    /// Directly implemented interfaces, each a registered closed type.
    pub ifaces: Vec<TypeId>,
    /// Whether the host can construct this type with no arguments.
    pub constructible: bool,
}

impl TypeInfo {
    pub fn opaque(name: impl Into<SmolStr>) -> Self {
        TypeInfo {
            name: name.into(),
            kind: TypeKind::Opaque,
            base: None,
            ifaces: Vec::new(),
            constructible: false,
        }
    }

    pub fn with_base(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_iface(mut self, iface: TypeId) -> Self {
        self.ifaces.push(iface);
        self
    }

    pub fn constructible(mut self) -> Self {
        self.constructible = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("definition `{def}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        def: SmolStr,
        expected: usize,
        got: usize,
    },

    #[error("closed instance `{0}` is already registered")]
    DuplicateInstance(SmolStr),

    #[error("array `{0}` is already registered")]
    DuplicateArray(SmolStr),

    #[error("invalid array shape: rank {rank}, jagged {jagged}")]
    InvalidArrayShape { rank: u32, jagged: bool },
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Arena<TypeInfo>,
    defs: Arena<GenericDefInfo>,

    /// (definition, closed argument list) -> registered instance.
    instance_index: FxHashMap<(GenericDefId, Vec<TypeId>), TypeId>,
    /// (element, rank, jagged) -> registered array type.
    array_index: FxHashMap<(TypeId, u32, bool), TypeId>,
}

impl ops::Index<TypeId> for TypeRegistry {
    type Output = TypeInfo;
    fn index(&self, index: TypeId) -> &Self::Output {
        &self.types[index]
    }
}

impl ops::Index<GenericDefId> for TypeRegistry {
    type Output = GenericDefInfo;
    fn index(&self, index: GenericDefId) -> &Self::Output {
        &self.defs[index]
    }
}

impl TypeRegistry {
    pub fn info(&self, id: TypeId) -> &TypeInfo {
        &self.types[id]
    }

    pub fn def(&self, id: GenericDefId) -> &GenericDefInfo {
        &self.defs[id]
    }

    /// The registered closed form of `def` over exactly `args`, if any.
    pub fn lookup_instance(&self, def: GenericDefId, args: &[TypeId]) -> Option<TypeId> {
        self.instance_index.get(&(def, args.to_vec())).copied()
    }

    /// The registered array of `elem` with the given shape, if any.
    pub fn lookup_array(&self, elem: TypeId, rank: u32, jagged: bool) -> Option<TypeId> {
        self.array_index.get(&(elem, rank, jagged)).copied()
    }

    /// `id` followed by its base-chain ancestors, innermost first.
    pub fn supertypes(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        iter::successors(Some(id), |&t| self.types[t].base)
    }

    /// All interfaces reachable from `id`: interfaces of the type and its
    /// ancestors, plus interfaces those interfaces implement, transitively.
    pub fn all_ifaces(&self, id: TypeId) -> Vec<TypeId> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut stack: Vec<TypeId> = self
            .supertypes(id)
            .flat_map(|t| self.types[t].ifaces.iter().copied())
            .collect();

        while let Some(iface) = stack.pop() {
            if !seen.insert(iface) {
                continue;
            }
            out.push(iface);
            for t in self.supertypes(iface) {
                stack.extend(self.types[t].ifaces.iter().copied());
            }
        }

        out
    }

    /// Every closed implementation of `def` exposed by `id`: the type itself
    /// or one of its ancestors when it is a closed form of `def`, plus every
    /// reachable interface closing `def`. Argument lists reached through more
    /// than one path are reported once.
    pub fn implementations_of(&self, id: TypeId, def: GenericDefId) -> Vec<(TypeId, &[TypeId])> {
        let mut out: Vec<(TypeId, &[TypeId])> = Vec::new();

        let candidates = self.supertypes(id).chain(self.all_ifaces(id));
        for cand in candidates {
            if let TypeKind::Instance { def: d, args } = &self.types[cand].kind {
                if *d == def && !out.iter().any(|(_, seen)| *seen == args.as_slice()) {
                    out.push((cand, args.as_slice()));
                }
            }
        }

        out
    }

    /// Whether `sub` can stand where `target` is expected: identical, a
    /// descendant, or an implementer.
    pub fn is_assignable(&self, sub: TypeId, target: TypeId) -> bool {
        self.supertypes(sub).any(|t| t == target) || self.all_ifaces(sub).contains(&target)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistryBuilder {
    registry: TypeRegistry,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_generic(&mut self, name: impl Into<SmolStr>, arity: usize) -> GenericDefId {
        self.registry.defs.alloc(GenericDefInfo {
            name: name.into(),
            arity,
        })
    }

    /// Register a type, validating and indexing its structural identity.
    pub fn add(&mut self, info: TypeInfo) -> Result<TypeId, RegistryError> {
        match &info.kind {
            TypeKind::Opaque => {}
            TypeKind::Instance { def, args } => {
                let def_info = &self.registry.defs[*def];
                if args.len() != def_info.arity {
                    return Err(RegistryError::ArityMismatch {
                        def: def_info.name.clone(),
                        expected: def_info.arity,
                        got: args.len(),
                    });
                }
                if self.registry.lookup_instance(*def, args).is_some() {
                    return Err(RegistryError::DuplicateInstance(info.name));
                }
            }
            TypeKind::Array { elem, rank, jagged } => {
                if *rank == 0 || (*jagged && *rank != 1) {
                    return Err(RegistryError::InvalidArrayShape {
                        rank: *rank,
                        jagged: *jagged,
                    });
                }
                if self.registry.lookup_array(*elem, *rank, *jagged).is_some() {
                    return Err(RegistryError::DuplicateArray(info.name));
                }
            }
        }

        let key = match &info.kind {
            TypeKind::Instance { def, args } => Some((*def, args.clone())),
            _ => None,
        };
        let array_key = match &info.kind {
            TypeKind::Array { elem, rank, jagged } => Some((*elem, *rank, *jagged)),
            _ => None,
        };

        let id = self.registry.types.alloc(info);
        if let Some(key) = key {
            self.registry.instance_index.insert(key, id);
        }
        if let Some(key) = array_key {
            self.registry.array_index.insert(key, id);
        }
        Ok(id)
    }

    /// Register a closed form of `def`, named after the definition and its
    /// arguments (e.g. `Seq<int>`).
    pub fn add_instance(
        &mut self,
        def: GenericDefId,
        args: impl Into<Vec<TypeId>>,
    ) -> Result<TypeId, RegistryError> {
        let args = args.into();
        let name = self.instance_name(def, &args);
        self.add(TypeInfo {
            name,
            kind: TypeKind::Instance { def, args },
            base: None,
            ifaces: Vec::new(),
            constructible: false,
        })
    }

    /// Register an array type, named after its element and shape
    /// (e.g. `int[]`, `int[,]`).
    pub fn add_array(
        &mut self,
        elem: TypeId,
        rank: u32,
        jagged: bool,
    ) -> Result<TypeId, RegistryError> {
        let name = self.array_name(elem, rank, jagged);
        self.add(TypeInfo {
            name,
            kind: TypeKind::Array { elem, rank, jagged },
            base: None,
            ifaces: Vec::new(),
            constructible: false,
        })
    }

    pub fn set_base(&mut self, ty: TypeId, base: TypeId) {
        self.registry.types[ty].base = Some(base);
    }

    pub fn add_iface(&mut self, ty: TypeId, iface: TypeId) {
        self.registry.types[ty].ifaces.push(iface);
    }

    pub fn set_constructible(&mut self, ty: TypeId) {
        self.registry.types[ty].constructible = true;
    }

    pub fn finish(self) -> TypeRegistry {
        self.registry
    }

    fn instance_name(&self, def: GenericDefId, args: &[TypeId]) -> SmolStr {
        let args = args
            .iter()
            .map(|&a| self.registry.types[a].name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        SmolStr::from(format!("{}<{}>", self.registry.defs[def].name, args))
    }

    fn array_name(&self, elem: TypeId, rank: u32, jagged: bool) -> SmolStr {
        let elem = &self.registry.types[elem].name;
        if jagged {
            SmolStr::from(format!("{elem}[]"))
        } else if rank == 1 {
            // Distinguish the rank-1 block form from the vector form.
            SmolStr::from(format!("{elem}[*]"))
        } else {
            SmolStr::from(format!("{elem}[{}]", ",".repeat(rank.saturating_sub(1) as usize)))
        }
    }
}
