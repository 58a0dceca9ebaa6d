mod determinism_tests;
mod vector_properties;
