//! Implementations of [`Arbitrary`] for core types.
//!
//! [`Arbitrary`]: proptest::arbitrary::Arbitrary
use crate::{Fe, Point, Scalar, keys::SecretKey};
use ::proptest::prelude::*;

impl Arbitrary for Scalar {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // insert some pathological cases
            1 => Just(Scalar::ZERO),
            1 => Just(Scalar::ONE),
            1 => Just(Scalar::minus_one()),
            27 => any::<[u8; 32]>().prop_map(Scalar::from_bytes_mod_order),
        ]
        .boxed()
    }
}

impl Arbitrary for Fe {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            1 => Just(Fe::ZERO),
            1 => Just(Fe::ONE),
            1 => Just(-Fe::ONE),
            27 => any::<[u8; 32]>().prop_map(|bytes| Fe::from_bytes_mod_order(bytes).normalize()),
        ]
        .boxed()
    }
}

impl Arbitrary for SecretKey {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        any::<Scalar>()
            .prop_filter_map("zero is not a secret key", |scalar| {
                SecretKey::from_scalar(scalar).ok()
            })
            .boxed()
    }
}

impl Arbitrary for Point {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            1 => Just(Point::identity()),
            9 => any::<SecretKey>().prop_map(|sk| Point::from(sk.as_scalar())),
        ]
        .boxed()
    }
}
