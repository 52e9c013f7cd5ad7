use ty_meta::{DeclaredTy, Pattern, TypeId, TypeRegistry, TypeVar};

/// Convert a declared parameter type into its structural pattern.
///
/// Variable names resolve against the operation's variable list; a subtree
/// with no variables collapses to a concrete leaf through the registry's
/// reverse indexes. Extraction has no failure mode: an unknown variable
/// name, an argument count disagreeing with the definition's arity, or a
/// variable-free closed form missing from the registry is a defect in the
/// operation description or the registry, not a bind failure, and panics.
pub fn extract(registry: &TypeRegistry, vars: &[TypeVar], declared: &DeclaredTy) -> Pattern {
    match declared {
        DeclaredTy::Var(name) => {
            let idx = vars
                .iter()
                .position(|v| v.name == *name)
                .unwrap_or_else(|| panic!("extract: unknown type variable `{name}`"));
            Pattern::Var(idx.into())
        }

        DeclaredTy::Type(id) => Pattern::Exact(*id),

        DeclaredTy::App { def, args } => {
            let arity = registry[*def].arity;
            assert_eq!(
                args.len(),
                arity,
                "extract: `{}` expects {arity} argument(s), got {}",
                registry[*def].name,
                args.len(),
            );
            if declared.mentions_vars() {
                Pattern::App {
                    def: *def,
                    args: args.iter().map(|a| extract(registry, vars, a)).collect(),
                }
            } else {
                Pattern::Exact(closed_id(registry, declared))
            }
        }

        DeclaredTy::Array { elem, rank, jagged } => {
            if declared.mentions_vars() {
                Pattern::Array {
                    elem: Box::new(extract(registry, vars, elem)),
                    rank: *rank,
                    jagged: *jagged,
                }
            } else {
                Pattern::Exact(closed_id(registry, declared))
            }
        }
    }
}

/// Resolve a variable-free declared type to its registered id.
fn closed_id(registry: &TypeRegistry, declared: &DeclaredTy) -> TypeId {
    match declared {
        DeclaredTy::Var(name) => panic!("closed_id: variable `{name}` in a closed subtree"),

        DeclaredTy::Type(id) => *id,

        DeclaredTy::App { def, args } => {
            let arg_ids: Vec<TypeId> = args.iter().map(|a| closed_id(registry, a)).collect();
            registry.lookup_instance(*def, &arg_ids).unwrap_or_else(|| {
                panic!(
                    "extract: closed form of `{}` over {} argument(s) is not registered",
                    registry[*def].name,
                    arg_ids.len(),
                )
            })
        }

        DeclaredTy::Array { elem, rank, jagged } => {
            let elem_id = closed_id(registry, elem);
            registry
                .lookup_array(elem_id, *rank, *jagged)
                .unwrap_or_else(|| {
                    panic!(
                        "extract: array of `{}` (rank {rank}, jagged {jagged}) is not registered",
                        registry[elem_id].name,
                    )
                })
        }
    }
}
