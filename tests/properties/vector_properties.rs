use proptest::prelude::*;

use fastembed_native::vector::{self, Backend, Kernel};

/// Finite values across the whole f32 range, subnormals included.
fn finite_vector(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f32>> {
    use prop::num::f32::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    prop::collection::vec(POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO, len)
}

fn moderate_vector(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, len)
}

proptest! {
    #[test]
    fn self_similarity_is_exactly_one(v in finite_vector(1..300)) {
        prop_assume!(v.iter().any(|x| *x != 0.0));
        prop_assert_eq!(vector::cosine_similarity(&v, &v).unwrap(), 1.0);
    }

    #[test]
    fn cosine_stays_in_range(pair in (1usize..200).prop_flat_map(|n| (finite_vector(n..n + 1), finite_vector(n..n + 1)))) {
        let (a, b) = pair;
        let cosine = vector::cosine_similarity(&a, &b).unwrap();
        prop_assert!((-1.0..=1.0).contains(&cosine));
    }

    #[test]
    fn normalized_vectors_have_unit_norm(v in finite_vector(1..300)) {
        prop_assume!(v.iter().any(|x| *x != 0.0));
        let mut n = v.clone();
        vector::normalize(&mut n);
        prop_assert!((vector::vector_norm(&n) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn moderate_self_similarity(v in moderate_vector(1..64)) {
        prop_assume!(v.iter().any(|x| *x != 0.0));
        prop_assert_eq!(vector::cosine_similarity(&v, &v).unwrap(), 1.0);
    }

    #[test]
    fn backends_are_bit_identical(pair in (1usize..200).prop_flat_map(|n| (finite_vector(n..n + 1), finite_vector(n..n + 1)))) {
        let (a, b) = pair;
        let simd = Kernel::new(Backend::Simd);
        let scalar = Kernel::new(Backend::Scalar);
        prop_assert_eq!(
            simd.dot_product(&a, &b).unwrap().to_bits(),
            scalar.dot_product(&a, &b).unwrap().to_bits()
        );
        prop_assert_eq!(
            simd.cosine_similarity(&a, &b).unwrap().to_bits(),
            scalar.cosine_similarity(&a, &b).unwrap().to_bits()
        );
    }
}
