//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Default state directory
pub const DEFAULT_STATE_DIR: &str = ".healing-buds";

fn url_arg() -> Arg {
    Arg::new("url")
        .long("url")
        .required(true)
        .help("Page URL the visitor opened, e.g. https://healingbuds.pt/?region=GB")
}

/// Build the `healing-buds` command tree
#[must_use]
pub fn build() -> Command {
    Command::new("healing-buds")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Healing Buds region gate")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .global(true)
                .default_value(DEFAULT_STATE_DIR)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding durable.json and session.json"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Region rules TOML file"),
        )
        .arg(
            Arg::new("policy")
                .long("policy")
                .global(true)
                .value_parser(["stealth", "dismissible"])
                .help("Override the configured gate policy"),
        )
        .arg(
            Arg::new("dev")
                .long("dev")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Treat the build as a development build"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve the region and print the gate status")
                .arg(url_arg()),
        )
        .subcommand(
            Command::new("join")
                .about("Submit the pre-launch gate waitlist form")
                .arg(url_arg())
                .arg(
                    Arg::new("email")
                        .long("email")
                        .required(true)
                        .help("Email address to sign up"),
                )
                .arg(
                    Arg::new("user-agent")
                        .long("user-agent")
                        .help("User agent recorded with the signup"),
                ),
        )
        .subcommand(
            Command::new("dismiss")
                .about("Try to dismiss the pre-launch gate")
                .arg(url_arg()),
        )
        .subcommand(
            Command::new("override")
                .about("Force a region for this session (dev mode only)")
                .arg(url_arg())
                .arg(
                    Arg::new("code")
                        .help("Country code; omit to clear the override"),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Clear the override and gate flags (dev mode only)")
                .arg(url_arg()),
        )
        .subcommand(
            Command::new("regions")
                .about("List selectable regions (dev mode only)")
                .arg(url_arg()),
        )
        .subcommand(
            Command::new("password")
                .about("Check password strength")
                .arg(Arg::new("password").required(true).help("Password to check"))
                .arg(
                    Arg::new("check-breach")
                        .long("check-breach")
                        .action(ArgAction::SetTrue)
                        .help("Also look the password up in the breach database"),
                )
                .arg(
                    Arg::new("hibp-url")
                        .long("hibp-url")
                        .help("Range API root for the breach lookup"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = build()
            .try_get_matches_from([
                "healing-buds",
                "override",
                "--url",
                "https://healingbuds.co.za",
                "TH",
                "--dev",
            ])
            .unwrap();

        assert!(matches.get_flag("dev"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "override");
        assert_eq!(args.get_one::<String>("code").map(String::as_str), Some("TH"));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = build().try_get_matches_from([
            "healing-buds",
            "--policy",
            "lenient",
            "resolve",
            "--url",
            "https://healingbuds.pt",
        ]);
        assert!(result.is_err());
    }
}
