//! End-to-end scenarios: event in, index tree out

mod pipeline_tests;
