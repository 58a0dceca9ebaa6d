use fastembed_native::test_utils::{TestCase, run_table_tests};
use fastembed_native::vector::{self, Backend, Kernel};

#[test]
fn cosine_similarity_table() -> Result<(), String> {
    let cases = vec![
        TestCase::new("identical", (vec![1.0f32, 2.0, 3.0], vec![1.0f32, 2.0, 3.0]), 1.0f32),
        TestCase::new("opposite", (vec![1.0, 0.0], vec![-1.0, 0.0]), -1.0),
        TestCase::new("orthogonal", (vec![1.0, 0.0], vec![0.0, 1.0]), 0.0),
        TestCase::new("zero_left", (vec![0.0, 0.0], vec![1.0, 1.0]), 0.0),
        TestCase::new("zero_both", (vec![0.0; 9], vec![0.0; 9]), 0.0),
        TestCase::new("scaled", (vec![2.0, 4.0], vec![1.0, 2.0]), 1.0),
    ];

    run_table_tests(cases, |(a, b)| vector::cosine_similarity(&a, &b).unwrap())
}

#[test]
fn length_mismatch_is_invalid() {
    assert!(vector::dot_product(&[1.0, 2.0], &[1.0]).is_err());
    assert!(vector::cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    let mut out = [0.0f32; 3];
    assert!(vector::add_vectors(&[1.0, 2.0], &[1.0, 2.0], &mut out).is_err());
}

#[test]
fn normalize_yields_unit_norm_across_lane_boundaries() {
    for len in [1usize, 7, 8, 9, 15, 16, 17, 128, 1000] {
        let mut v: Vec<f32> = (0..len).map(|i| (i as f32).mul_add(0.37, 1.0)).collect();
        vector::normalize(&mut v);
        let norm = vector::vector_norm(&v);
        assert!((norm - 1.0).abs() < 1e-5, "len {len}: norm {norm}");
    }
}

#[test]
fn zero_vector_survives_normalize() {
    let mut v = vec![0.0f32; 33];
    vector::normalize(&mut v);
    assert!(v.iter().all(|x| *x == 0.0));
    assert_eq!(vector::vector_norm(&v), 0.0);
}

#[test]
fn backends_agree_bit_for_bit() {
    let simd = Kernel::new(Backend::Simd);
    let scalar = Kernel::new(Backend::Scalar);
    let a: Vec<f32> = (0..131).map(|i| ((i * 7919) % 1000) as f32 / 997.0 - 0.5).collect();
    let b: Vec<f32> = (0..131).map(|i| ((i * 104_729) % 1000) as f32 / 991.0 - 0.5).collect();

    assert_eq!(
        simd.dot_product(&a, &b).unwrap().to_bits(),
        scalar.dot_product(&a, &b).unwrap().to_bits()
    );
    assert_eq!(simd.vector_norm(&a).to_bits(), scalar.vector_norm(&a).to_bits());

    let mut x = a.clone();
    let mut y = a.clone();
    simd.normalize(&mut x);
    scalar.normalize(&mut y);
    assert_eq!(x, y);

    let mut sum_simd = vec![0.0f32; 131];
    let mut sum_scalar = vec![0.0f32; 131];
    simd.add_vectors(&a, &b, &mut sum_simd).unwrap();
    scalar.add_vectors(&a, &b, &mut sum_scalar).unwrap();
    assert_eq!(sum_simd, sum_scalar);
}
