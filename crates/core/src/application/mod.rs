// Application Layer - Use Cases

pub mod build_script;
pub mod catalog;
pub mod constants;
pub mod monitor;
pub mod report;
pub mod runner;
pub mod settings;

// Re-exports
pub use build_script::BuildScriptGenerator;
pub use monitor::{stop_channel, Monitor, StopHandle, StopSignal};
pub use report::ReportService;
pub use runner::{FullSuiteOutcome, SuiteOutcome, SuiteRunner};
pub use settings::SettingsService;
