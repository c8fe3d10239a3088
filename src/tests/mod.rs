//! Scenario tests driving the paginator against a simulated editor

mod viewport_properties;
