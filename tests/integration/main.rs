//! Integration tests for Clinic-Probe
//!
//! These tests use wiremock to stand in for clinic websites and tempfile for
//! input, output and configuration files.

mod crawl_tests;
mod fetch_tests;
mod pipeline_tests;
