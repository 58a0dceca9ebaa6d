use proptest::prelude::*;

use fastembed_native::core::SUPPORTED_DIMENSIONS;
use fastembed_native::embed::{HashEmbedder, generate};

fn dimension() -> impl Strategy<Value = usize> {
    prop::sample::select(SUPPORTED_DIMENSIONS.to_vec())
}

proptest! {
    #[test]
    fn hash_embedding_is_deterministic(text in ".{1,200}", dim in dimension()) {
        let embedder = HashEmbedder::with_dimension(dim).unwrap();
        let first = embedder.embed(&text).unwrap();
        let second = embedder.embed(&text).unwrap();
        let first_bits: Vec<u32> = first.iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u32> = second.iter().map(|v| v.to_bits()).collect();
        prop_assert_eq!(first_bits, second_bits);
    }

    #[test]
    fn hash_embedding_has_requested_length_and_range(
        text in prop::collection::vec(any::<u8>(), 1..512),
        dim in dimension(),
    ) {
        let mut out = vec![f32::NAN; dim];
        let written = generate(&text, &mut out, dim).unwrap();
        prop_assert_eq!(written.get(), dim);
        prop_assert!(out.iter().all(|v| v.is_finite() && (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn oversized_text_is_always_rejected(extra in 1usize..64) {
        let text = vec![b'z'; 8192 + extra];
        let mut out = vec![0.0f32; 128];
        prop_assert!(generate(&text, &mut out, 128).is_err());
    }
}
