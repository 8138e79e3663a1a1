//! Integration test suite for the dojo runner.
//!
//! These tests drive `TaskRunner` end to end against stub interpreter
//! scripts that stand in for the external framework, so nothing beyond a
//! POSIX shell needs to be installed.
//!
//! # Test Categories
//!
//! - `dispatch`: single-target execution, argv fidelity, exit passthrough
//! - `run_pair`: the background/foreground pair behind `run`


mod dispatch;
mod run_pair;
