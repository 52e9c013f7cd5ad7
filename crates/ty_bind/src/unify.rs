// ==============================================================================
// Core Unification - matching a pattern against one concrete runtime type
// ==============================================================================
//
// unify(pattern, actual) extends the attempt's substitution so that the
// pattern, fully substituted, is satisfied by the runtime type. Rules in
// precedence order:
//
//   1. Variable vs T: already bound means the binding must equal T exactly;
//      unbound means bind now. One variable, one concrete type, everywhere.
//   2. Exact leaf vs T: id equality.
//   3. Array pattern vs T: T must be an array with the same rank and
//      jaggedness, then the element pattern recurses.
//   4. Open application vs T: T need not be a closed form of the definition
//      itself. Every closed implementation the registry exposes on T is a
//      candidate; each is tried against a scratch clone of the substitution.
//      Exactly one surviving extension commits. Several that disagree mean
//      the match is ambiguous and the whole attempt fails rather than guess.
//
// Failed attempts must stay invisible: nothing is written to the caller's
// substitution until a candidate has fully succeeded.

use itertools::Itertools;
use log::trace;
use ty_meta::{GenericDefId, Pattern, TypeId, TypeKind, TypeRegistry};

use crate::Substitution;

/// Extend `subst` so that `pattern` is satisfied by `actual`. On failure the
/// substitution is left exactly as it was.
pub fn unify(
    registry: &TypeRegistry,
    pattern: &Pattern,
    actual: TypeId,
    subst: &mut Substitution,
) -> bool {
    match pattern {
        Pattern::Var(var) => subst.bind(*var, actual),

        Pattern::Exact(id) => *id == actual,

        Pattern::Array { elem, rank, jagged } => match &registry[actual].kind {
            TypeKind::Array {
                elem: actual_elem,
                rank: actual_rank,
                jagged: actual_jagged,
            } if actual_rank == rank && actual_jagged == jagged => {
                unify(registry, elem, *actual_elem, subst)
            }
            _ => {
                trace!(
                    "`{}` is not an array of rank {rank} (jagged: {jagged})",
                    registry[actual].name,
                );
                false
            }
        },

        Pattern::App { def, args } => unify_app(registry, *def, args, actual, subst),
    }
}

/// Rule 4: try every closed implementation of `def` exposed by `actual`.
fn unify_app(
    registry: &TypeRegistry,
    def: GenericDefId,
    args: &[Pattern],
    actual: TypeId,
    subst: &mut Substitution,
) -> bool {
    let candidates = registry.implementations_of(actual, def);
    if candidates.is_empty() {
        trace!(
            "`{}` exposes no closed form of `{}`",
            registry[actual].name,
            registry[def].name,
        );
        return false;
    }

    let mut survivors: Vec<Substitution> = Vec::new();
    for (impl_ty, impl_args) in candidates {
        debug_assert_eq!(impl_args.len(), args.len());

        let mut scratch = subst.clone();
        let matched = args
            .iter()
            .zip(impl_args)
            .all(|(arg, &impl_arg)| unify(registry, arg, impl_arg, &mut scratch));

        if matched {
            survivors.push(scratch);
        } else {
            trace!(
                "candidate `{}` on `{}` rejected",
                registry[impl_ty].name,
                registry[actual].name,
            );
        }
    }

    // Candidates that failed structurally are simply discarded; ambiguity is
    // about survivors that disagree. Agreeing survivors (the same closed form
    // reached through two paths) collapse to one.
    if survivors.is_empty() {
        return false;
    }
    if !survivors.iter().all_equal() {
        trace!(
            "`{}` implements `{}` in {} disagreeing ways",
            registry[actual].name,
            registry[def].name,
            survivors.len(),
        );
        return false;
    }

    *subst = survivors.pop().expect("survivors is non-empty");
    true
}
