// ==============================================================================
// Constraint Validation
// ==============================================================================
//
// Runs after unification over the attempt's substitution. A constraint can
// only be checked once its subject variable is bound, and checking an
// assignability constraint whose target mentions other variables can bind
// those variables in turn. Constraints are therefore retried in passes
// until a pass makes no progress; the pass count is bounded by the variable
// count, since every productive pass checks at least one constraint.

use log::trace;
use ty_meta::{Constraint, Pattern, TypeId, TypeRegistry, TypeVar, TypeVarId};

use crate::{extract, unify, Substitution};

/// Check every constraint of every variable against the substitution built
/// by unification. On success the substitution binds every declared
/// variable, including those only reachable through constraint targets.
pub fn validate(registry: &TypeRegistry, vars: &[TypeVar], subst: &mut Substitution) -> bool {
    let mut pending: Vec<(TypeVarId, &Constraint)> = vars
        .iter()
        .enumerate()
        .flat_map(|(i, var)| var.constraints.iter().map(move |c| (i.into(), c)))
        .collect();

    while !pending.is_empty() {
        let mut deferred = Vec::new();
        let mut progressed = false;

        for (var, constraint) in pending {
            let Some(subject) = subst.get(var) else {
                // Nothing bound this variable yet; a constraint on another
                // variable may still do so.
                deferred.push((var, constraint));
                continue;
            };
            if !check(registry, vars, subject, constraint, subst) {
                trace!(
                    "`{}` violates a constraint of `{}`",
                    registry[subject].name,
                    vars[usize::from(var)].name,
                );
                return false;
            }
            progressed = true;
        }

        if !deferred.is_empty() && !progressed {
            // Constraints stuck on variables nothing will ever bind.
            return false;
        }
        pending = deferred;
    }

    subst.is_complete()
}

fn check(
    registry: &TypeRegistry,
    vars: &[TypeVar],
    subject: TypeId,
    constraint: &Constraint,
    subst: &mut Substitution,
) -> bool {
    match constraint {
        Constraint::Constructible => registry[subject].constructible,

        Constraint::Assignable(target) => match extract(registry, vars, target) {
            // Closed target: plain assignability, no inference. A type
            // implementing the same contract several ways is fine as long
            // as the required closing is among them.
            Pattern::Exact(target_id) => registry.is_assignable(subject, target_id),

            // Bare variable target: an already-bound target degrades to
            // assignability; an unbound one binds to the subject's type.
            Pattern::Var(target_var) => match subst.get(target_var) {
                Some(bound) => registry.is_assignable(subject, bound),
                None => subst.bind(target_var, subject),
            },

            // Structured target still mentioning variables: this is
            // inference, with the unifier's ambiguity rule.
            pattern @ (Pattern::App { .. } | Pattern::Array { .. }) => {
                unify(registry, &pattern, subject, subst)
            }
        },
    }
}
