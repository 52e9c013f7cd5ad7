mod decl;
mod pattern;
mod registry;

#[cfg(feature = "proptest_support")]
pub mod arbitrary;

#[cfg(test)]
mod tests;

pub use decl::{Constraint, DeclaredTy, GenericOp, TypeVar};
pub use pattern::Pattern;
pub use registry::{
    GenericDefId, GenericDefInfo, RegistryError, TypeId, TypeInfo, TypeKind, TypeRegistry,
    TypeRegistryBuilder,
};

use derive_more::Debug;

/// Index of a type variable within one operation, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
#[debug("TypeVarId({_0:?})")]
pub struct TypeVarId(u32);

impl From<u32> for TypeVarId {
    #[inline]
    fn from(value: u32) -> Self {
        TypeVarId(value)
    }
}

impl From<usize> for TypeVarId {
    #[inline]
    fn from(value: usize) -> Self {
        u32::try_from(value).expect("TypeVarId overflow").into()
    }
}

impl From<TypeVarId> for usize {
    #[inline]
    fn from(value: TypeVarId) -> Self {
        value.0 as usize
    }
}
