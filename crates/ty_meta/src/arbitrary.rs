use proptest::prelude::{Arbitrary, BoxedStrategy, Just, Strategy};
use proptest::strategy::Union;
use smol_str::SmolStr;

use crate::{DeclaredTy, GenericDefId};

/// Parameters for generating open declared shapes.
#[derive(Debug, Clone)]
pub struct OpenShapeParams {
    /// The variable name every generated shape mentions at its leaf.
    pub var: SmolStr,
    /// Single-argument definitions the shape may apply.
    pub unary_defs: Vec<GenericDefId>,
    pub depth: u32,
    pub desired_size: u32,
    pub expected_branch_size: u32,
}

impl Default for OpenShapeParams {
    fn default() -> Self {
        Self {
            var: "T".into(),
            unary_defs: Vec::new(),
            depth: 3,
            desired_size: 8,
            expected_branch_size: 1,
        }
    }
}

/// An open shape that always mentions the parameter variable at its leaf:
/// the bare variable wrapped in some nesting of generic applications and
/// array forms. Because the variable is always present, no generated
/// subtree is variable-free, so extraction never needs a registered closed
/// form.
pub fn arb_open_shape(params: OpenShapeParams) -> impl Strategy<Value = DeclaredTy> {
    let defs = params.unary_defs;
    let leaf = Just(DeclaredTy::Var(params.var));

    leaf.prop_recursive(
        params.depth,
        params.desired_size,
        params.expected_branch_size,
        move |inner| {
            let mut choices: Vec<BoxedStrategy<DeclaredTy>> = vec![
                inner.clone().prop_map(DeclaredTy::vector).boxed(),
                inner.clone().prop_map(|d| DeclaredTy::grid(d, 2)).boxed(),
            ];
            for &def in &defs {
                choices.push(
                    inner
                        .clone()
                        .prop_map(move |d| DeclaredTy::app(def, [d]))
                        .boxed(),
                );
            }
            Union::new(choices)
        },
    )
}

impl Arbitrary for DeclaredTy {
    type Parameters = OpenShapeParams;
    type Strategy = BoxedStrategy<DeclaredTy>;

    fn arbitrary_with(args: Self::Parameters) -> Self::Strategy {
        arb_open_shape(args).boxed()
    }
}
