// ==============================================================================
// Property-Based Tests for Binding
// ==============================================================================
//
// Generates random open parameter shapes (via ty_meta's proptest_support
// strategies) over the shared fixture registry and random runtime types,
// then checks the properties that hold for every input: binding is a pure
// function (same inputs, same result), a successful bind closes every
// declared variable, and a declared constraint is never violated by a
// successful bind.

use std::sync::OnceLock;

use proptest::prelude::{prop_assert, prop_assert_eq, proptest, Strategy};
use proptest::sample::select;
use ty_meta::arbitrary::{arb_open_shape, OpenShapeParams};
use ty_meta::{DeclaredTy, GenericOp, TypeId, TypeVar};

use crate::tests::Fixture;
use crate::try_bind;

fn fx() -> &'static Fixture {
    static FX: OnceLock<Fixture> = OnceLock::new();
    FX.get_or_init(Fixture::new)
}

/// An open parameter shape mentioning the single variable `T`, built from
/// the fixture's sequence/list definitions and both array forms.
fn arb_param_shape() -> impl Strategy<Value = DeclaredTy> {
    arb_open_shape(OpenShapeParams {
        unary_defs: vec![fx().seq, fx().list],
        ..OpenShapeParams::default()
    })
}

fn arb_runtime_type() -> impl Strategy<Value = TypeId> {
    select(fx().all_types.clone())
}

fn op_with(param: DeclaredTy, constrained: bool) -> GenericOp {
    let var = if constrained {
        TypeVar::new("T").constructible()
    } else {
        TypeVar::new("T")
    };
    GenericOp::new("probe", [var], [param])
}

proptest! {
    #[test]
    fn binding_is_deterministic(param in arb_param_shape(), actual in arb_runtime_type()) {
        let fx = fx();
        let op = op_with(param, false);
        let first = try_bind(&fx.reg, &op, &[actual]);
        let second = try_bind(&fx.reg, &op, &[actual]);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn successful_binds_close_every_var(
        param in arb_param_shape(),
        actual in arb_runtime_type(),
    ) {
        let fx = fx();
        let op = op_with(param, false);
        if let Some(bound) = try_bind(&fx.reg, &op, &[actual]) {
            prop_assert_eq!(bound.type_args.len(), op.vars.len());
        }
    }

    #[test]
    fn constraints_hold_on_success(
        param in arb_param_shape(),
        actual in arb_runtime_type(),
    ) {
        let fx = fx();
        let op = op_with(param, true);
        if let Some(bound) = try_bind(&fx.reg, &op, &[actual]) {
            prop_assert!(fx.reg[bound.type_args[0]].constructible);
        }
    }

    /// Adding a constraint can only narrow the outcome: anything that binds
    /// under the constrained variable also binds, to the same arguments,
    /// without the constraint.
    #[test]
    fn constraints_only_narrow(
        param in arb_param_shape(),
        actual in arb_runtime_type(),
    ) {
        let fx = fx();
        let constrained = try_bind(&fx.reg, &op_with(param.clone(), true), &[actual]);
        let unconstrained = try_bind(&fx.reg, &op_with(param, false), &[actual]);
        if let Some(bound) = &constrained {
            prop_assert_eq!(
                unconstrained.as_ref().map(|b| &b.type_args),
                Some(&bound.type_args)
            );
        }
    }
}
