//! Property-based tests for title generation guarantees

mod title_generation;
