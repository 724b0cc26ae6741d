/// Whole check cycles against scripted collaborators
pub mod scenario_tests;
