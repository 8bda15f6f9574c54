//! Command-line composition for rendering binaries.

use super::options::CommandOptions;

/// Renders each option as a `--name=value` token, in insertion order.
#[must_use]
pub fn option_flags(options: &CommandOptions) -> Vec<String> {
    options
        .iter()
        .map(|(name, value)| format!("--{name}={value}"))
        .collect()
}

/// Joins the option flags with single spaces.
///
/// Values are not quoted or escaped. The process runner passes flags as
/// separate arguments, so this string is for display and logging.
#[must_use]
pub fn mount_command_options(options: &CommandOptions) -> String {
    option_flags(options).join(" ")
}
