//! Runtime binding of open generic operations.
//!
//! Given an operation whose parameter types mention type variables, and the
//! concrete runtime types observed for its inputs, [`try_bind`] either
//! closes every variable to a unique concrete type or reports that the
//! operation does not apply. The four stages (shape extraction,
//! unification, constraint validation, instantiation) are pure functions
//! over a read-only [`TypeRegistry`]; all mutable state is one
//! [`Substitution`] owned by the attempt.

mod constraints;
mod extract;
mod unify;


#[cfg(test)]
mod pbt;

pub use constraints::validate;
pub use extract::extract;
pub use unify::unify;

use derive_more::Debug;
use log::debug;
use smol_str::SmolStr;
use ty_meta::{GenericOp, TypeId, TypeRegistry, TypeVarId};

/// The mapping from type variables to concrete types discovered during one
/// binding attempt. Created empty, extended by unification and constraint
/// checking, discarded on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    slots: Vec<Option<TypeId>>,
}

impl Substitution {
    pub fn new(var_count: usize) -> Self {
        Substitution {
            slots: vec![None; var_count],
        }
    }

    pub fn get(&self, var: TypeVarId) -> Option<TypeId> {
        self.slots[usize::from(var)]
    }

    /// Bind `var` to `ty`. Rebinding succeeds only when both occurrences
    /// agree on the same concrete type.
    pub fn bind(&mut self, var: TypeVarId, ty: TypeId) -> bool {
        match &mut self.slots[usize::from(var)] {
            Some(existing) => *existing == ty,
            slot @ None => {
                *slot = Some(ty);
                true
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

/// A fully-closed operation reference: every type variable replaced by its
/// resolved concrete type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[debug("BoundOp({name}, {type_args:?})")]
pub struct BoundOp {
    pub name: SmolStr,
    pub type_args: Vec<TypeId>,
}

/// Resolve the type variables of `op` against the runtime types of its
/// inputs, one per formal parameter.
///
/// Returns `None` when the operation does not apply: a structural mismatch,
/// an inconsistent variable binding, an ambiguous contract implementation,
/// and a failed constraint all look the same from the outside. Callers are
/// expected to move on to another candidate, not to treat this as an error.
///
/// Supplying the wrong number of runtime types is a caller defect and
/// panics.
pub fn try_bind(
    registry: &TypeRegistry,
    op: &GenericOp,
    actuals: &[TypeId],
) -> Option<BoundOp> {
    assert_eq!(
        actuals.len(),
        op.params.len(),
        "try_bind: operation `{}` has {} parameter(s), got {} runtime type(s)",
        op.name,
        op.params.len(),
        actuals.len(),
    );

    let mut subst = Substitution::new(op.vars.len());

    for (param, &actual) in op.params.iter().zip(actuals) {
        let pattern = extract(registry, &op.vars, param);
        if !unify(registry, &pattern, actual, &mut subst) {
            debug!(
                "`{}`: `{}` does not unify with `{}`",
                op.name,
                pattern.display(registry),
                registry[actual].name,
            );
            return None;
        }
    }

    if !validate(registry, &op.vars, &mut subst) {
        debug!("`{}`: constraint validation failed", op.name);
        return None;
    }

    Some(instantiate(op, &subst))
}

/// Close `op` over a validated substitution. Pure rewrite; cannot fail once
/// validation has passed.
pub fn instantiate(op: &GenericOp, subst: &Substitution) -> BoundOp {
    let type_args = (0..op.vars.len())
        .map(|i| {
            subst
                .get(i.into())
                .expect("validated substitution binds every variable")
        })
        .collect();

    BoundOp {
        name: op.name.clone(),
        type_args,
    }
}
