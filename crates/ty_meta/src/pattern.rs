use std::fmt;

use derive_more::Debug;

use crate::{GenericDefId, TypeId, TypeRegistry, TypeVarId};

/// The structural shape of a declared type, with variable names resolved
/// and variable-free subtrees collapsed to concrete leaves. Patterns are
/// derived fresh per binding attempt and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    #[debug("Var({_0:?})")]
    Var(TypeVarId),

    #[debug("Exact({_0:?})")]
    Exact(TypeId),

    #[debug("App({def:?}, {args:?})")]
    App {
        def: GenericDefId,
        args: Vec<Pattern>,
    },

    #[debug("Array({elem:?}, rank={rank}, jagged={jagged})")]
    Array {
        elem: Box<Pattern>,
        rank: u32,
        jagged: bool,
    },
}

impl Pattern {
    /// Human-readable rendering with type and definition names resolved
    /// through the registry. Variables print positionally as `?N`.
    pub fn display<'a>(&'a self, registry: &'a TypeRegistry) -> impl fmt::Display + 'a {
        PatternDisplay {
            pattern: self,
            registry,
        }
    }
}

struct PatternDisplay<'a> {
    pattern: &'a Pattern,
    registry: &'a TypeRegistry,
}

impl fmt::Display for PatternDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pattern(f, self.pattern, self.registry)
    }
}

fn write_pattern(f: &mut fmt::Formatter<'_>, pattern: &Pattern, reg: &TypeRegistry) -> fmt::Result {
    match pattern {
        Pattern::Var(v) => write!(f, "?{}", usize::from(*v)),
        Pattern::Exact(id) => write!(f, "{}", reg[*id].name),
        Pattern::App { def, args } => {
            write!(f, "{}<", reg[*def].name)?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_pattern(f, arg, reg)?;
            }
            write!(f, ">")
        }
        Pattern::Array { elem, rank, jagged } => {
            write_pattern(f, elem, reg)?;
            if *jagged {
                write!(f, "[]")
            } else if *rank == 1 {
                write!(f, "[*]")
            } else {
                write!(f, "[{}]", ",".repeat(rank.saturating_sub(1) as usize))
            }
        }
    }
}
