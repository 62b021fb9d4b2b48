//! Integration tests for the wlr library and binary

mod cli_test;
mod helpers;
mod rewrite_test;
mod stats_test;
