//! Usage text and extended help
//!
//! The usage block keeps the classic three-option layout; `--help` appends
//! the additional options and environment variables.

use crate::config::env::EnvManager;
use colored::*;

/// Usage block printed on argument errors and help requests
pub fn usage_text(progname: &str) -> String {
    let mut usage = format!("Usage: {} [-h HAMMERS -t THROWS] URL\n", progname);
    usage.push_str("    -h  HAMMERS     Number of hammers to utilize (1)\n");
    usage.push_str("    -t  THROWS      Number of throws per hammer  (1)\n");
    usage.push_str("    -v              Display verbose output\n");
    usage
}

/// Help text beyond the basic usage block
pub struct HelpSystem {
    progname: String,
}

impl HelpSystem {
    pub fn new<S: Into<String>>(progname: S) -> Self {
        Self {
            progname: progname.into(),
        }
    }

    /// Full help: usage block, extra options and environment variables
    pub fn display_main_help(&self, use_colors: bool) -> String {
        let mut help = usage_text(&self.progname);
        help.push('\n');
        help.push_str(&self.format_options_section(use_colors));
        help.push('\n');
        help.push_str(&self.format_environment_section(use_colors));
        help
    }

    fn format_header(&self, title: &str, use_colors: bool) -> String {
        if use_colors {
            title.bright_green().bold().to_string()
        } else {
            title.to_string()
        }
    }

    fn format_options_section(&self, use_colors: bool) -> String {
        let options = [
            OptionHelp {
                long: "timeout",
                value: "SECONDS",
                description: "Per-request timeout (1-3600, default: none)",
            },
            OptionHelp {
                long: "no-color",
                value: "",
                description: "Disable colored diagnostics",
            },
            OptionHelp {
                long: "debug",
                value: "",
                description: "Log run details to stderr",
            },
            OptionHelp {
                long: "help",
                value: "",
                description: "Show this help",
            },
        ];

        let mut output = format!("{}\n", self.format_header("Additional options:", use_colors));
        for option in &options {
            output.push_str(&option.format(use_colors));
            output.push('\n');
        }
        output
    }

    fn format_environment_section(&self, use_colors: bool) -> String {
        let mut output = format!("{}\n", self.format_header("Environment:", use_colors));

        for (var_name, description, _example) in EnvManager::get_supported_env_vars() {
            if use_colors {
                output.push_str(&format!("    {:<16}{}\n", var_name.bright_yellow(), description));
            } else {
                output.push_str(&format!("    {:<16}{}\n", var_name, description));
            }
        }
        output.push_str("\nVariables may also be set in a .env file in the working directory.\n");
        output
    }
}

/// One long-only option line
struct OptionHelp {
    long: &'static str,
    value: &'static str,
    description: &'static str,
}

impl OptionHelp {
    fn format(&self, use_colors: bool) -> String {
        let flag = if self.value.is_empty() {
            format!("--{}", self.long)
        } else {
            format!("--{} {}", self.long, self.value)
        };

        if use_colors {
            format!("    {:<20}{}", flag.bright_cyan(), self.description)
        } else {
            format!("    {:<20}{}", flag, self.description)
        }
    }
}
