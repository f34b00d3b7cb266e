// Test modules for emotibot-analysis
//
// Each source unit has a corresponding test file that focuses on behaviour
// verification. HTTP-level provider tests live in the crate's tests/ directory.

// Test helper utilities (stub providers, registries)
pub mod helpers;

pub mod registry;
