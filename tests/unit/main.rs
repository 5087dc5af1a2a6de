//! Unit test modules.

mod advisor_test;
mod e1rm_test;
