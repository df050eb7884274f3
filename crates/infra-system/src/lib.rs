// Server Toolkit Infrastructure - System Adapters
// Implements: CommandRunner, SystemProbe

pub mod shell_command_runner;
pub mod sysinfo_probe;

pub use shell_command_runner::ShellCommandRunner;
pub use sysinfo_probe::SysinfoProbe;
