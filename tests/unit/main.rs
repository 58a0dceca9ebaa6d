mod dimension_tests;
mod hash_embed_tests;
mod neural_tests;
mod tokenizer_tests;
mod vector_tests;
