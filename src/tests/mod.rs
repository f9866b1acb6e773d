//! Scenario tests run against the library through the binary's test harness.
