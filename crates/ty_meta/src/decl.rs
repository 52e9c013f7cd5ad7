use derive_more::From;
use smol_str::SmolStr;

use crate::{GenericDefId, TypeId};

/// A declared (possibly open) type expression as it appears in an
/// operation's signature. Variables are referenced by name; resolution to
/// `TypeVarId` happens during shape extraction.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum DeclaredTy {
    Var(SmolStr),
    #[from]
    Type(TypeId),
    App {
        def: GenericDefId,
        args: Vec<DeclaredTy>,
    },
    Array {
        elem: Box<DeclaredTy>,
        rank: u32,
        jagged: bool,
    },
}

impl DeclaredTy {
    pub fn var(name: impl Into<SmolStr>) -> Self {
        DeclaredTy::Var(name.into())
    }

    pub fn app(def: GenericDefId, args: impl Into<Vec<DeclaredTy>>) -> Self {
        DeclaredTy::App {
            def,
            args: args.into(),
        }
    }

    /// The vector (array-of-arrays capable) form, `T[]`.
    pub fn vector(elem: DeclaredTy) -> Self {
        DeclaredTy::Array {
            elem: Box::new(elem),
            rank: 1,
            jagged: true,
        }
    }

    /// The multi-dimensional block form, `T[,..]` with `rank` dimensions.
    pub fn grid(elem: DeclaredTy, rank: u32) -> Self {
        DeclaredTy::Array {
            elem: Box::new(elem),
            rank,
            jagged: false,
        }
    }

    /// Whether any type variable occurs in this expression.
    pub fn mentions_vars(&self) -> bool {
        match self {
            DeclaredTy::Var(_) => true,
            DeclaredTy::Type(_) => false,
            DeclaredTy::App { args, .. } => args.iter().any(DeclaredTy::mentions_vars),
            DeclaredTy::Array { elem, .. } => elem.mentions_vars(),
        }
    }
}

/// A requirement on the type a variable resolves to. Multiple constraints
/// on one variable are conjunctive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// The resolved type must be usable where the target is expected. The
    /// target may mention other variables of the same operation, in which
    /// case checking the constraint can bind them.
    Assignable(DeclaredTy),
    /// The resolved type must support parameterless construction.
    Constructible,
}

/// One type variable of an operation, with its declared constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVar {
    pub name: SmolStr,
    pub constraints: Vec<Constraint>,
}

impl TypeVar {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        TypeVar {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    pub fn assignable_to(mut self, target: impl Into<DeclaredTy>) -> Self {
        self.constraints.push(Constraint::Assignable(target.into()));
        self
    }

    pub fn constructible(mut self) -> Self {
        self.constraints.push(Constraint::Constructible);
        self
    }
}

/// An open generic operation: ordered type variables and the formal
/// parameter types referencing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericOp {
    pub name: SmolStr,
    pub vars: Vec<TypeVar>,
    pub params: Vec<DeclaredTy>,
}

impl GenericOp {
    pub fn new(
        name: impl Into<SmolStr>,
        vars: impl Into<Vec<TypeVar>>,
        params: impl Into<Vec<DeclaredTy>>,
    ) -> Self {
        GenericOp {
            name: name.into(),
            vars: vars.into(),
            params: params.into(),
        }
    }
}
