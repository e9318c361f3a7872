/*
[INPUT]:  Orchestrator handle from the binary entry point
[OUTPUT]: Interactive and scripted front-ends
[POS]:    CLI layer - module wiring
[UPDATE]: When adding new front-end modes
*/

pub mod demo;
pub mod interactive;

pub use demo::run_demo;
pub use interactive::run_interactive;
