use crate::CLAP_STYLING;
use casteradm_client::config::DEFAULT_SERVER;
use casteradm_core::Page;
use casteradm_core::storage::DEFAULT_SESSION_PATH;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("casteradm")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("casteradm")
        .about("Administration client for the caster's web admin API")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-s --"server" <URL>)
                .required(false)
                .global(true)
                .help("Origin of the caster's admin interface")
                .value_parser(clap::value_parser!(Url))
                .default_value(DEFAULT_SERVER),
        )
        .arg(
            arg!(--"session" <PATH>)
                .required(false)
                .global(true)
                .help("File holding the stored credentials between invocations")
                .default_value(DEFAULT_SESSION_PATH),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .global(true)
                .help("Request timeout in seconds (default: wait until the server answers)")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            arg!(-v --"verbose" ...)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            arg!(-q --"quiet" "Suppress spinners and non-essential output")
                .required(false)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("login")
                .about("Stores credentials for subsequent calls")
                .arg(
                    arg!(-u --"user" <USER>)
                        .required(true)
                        .help("Admin user name"),
                )
                .arg(
                    arg!(-p --"password" <PASSWORD>)
                        .required(false)
                        .env("CASTERADM_PASSWORD")
                        .hide_env_values(true)
                        .help("Admin password, read from the first line of stdin when omitted"),
                )
                .arg(
                    arg!(--"check")
                        .required(false)
                        .help("Verify the credentials against the server, forgetting them if rejected")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(command!("logout").about("Forgets the stored credentials"))
        .subcommand(command!("status").about("Shows whether credentials are stored"))
        .subcommand(
            command!("get")
                .about("Calls an admin API endpoint with GET")
                .arg(arg!(<ENDPOINT>).help("Endpoint name, e.g. net, mem, livesources"))
                .arg(
                    arg!(--"raw")
                        .required(false)
                        .help("Print compact JSON instead of pretty printing it")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("post")
                .about("Calls an admin API endpoint with POST")
                .arg(arg!(<ENDPOINT>).help("Endpoint name, e.g. reload, drop"))
                .arg(
                    arg!([FIELDS] ...)
                        .required(false)
                        .help("Additional form fields as key=value"),
                )
                .arg(
                    arg!(--"raw")
                        .required(false)
                        .help("Print compact JSON instead of pretty printing it")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(command!("endpoints").about("Lists the admin API endpoints the server knows"))
        .subcommand(
            command!("ui")
                .about("Launches the interactive admin console")
                .arg(
                    arg!(-P --"page" <PAGE>)
                        .required(false)
                        .help("Page to open first")
                        .value_parser(Page::ALL.map(|p| p.as_str())),
                ),
        )
}
