use crate::CLAP_STYLING;
use clap::{arg, value_parser};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("page-loader")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("page-loader")
        .about("Download a web page and its local assets for offline viewing")
        .styles(CLAP_STYLING)
        .arg(
            arg!(<URL>)
                .required(true)
                .help("The page to download"),
        )
        .arg(
            arg!(-o --"output" <DIR>)
                .required(false)
                .help("Existing directory to save the page into")
                .default_value("."),
        )
        .arg(
            arg!(--"connect-timeout" <SECONDS>)
                .required(false)
                .help("Seconds to wait for each connection to be established")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("3"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Seconds to wait between reads of a response before giving up")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Result format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-q --"quiet" "Suppress the progress bar and informational logs")
                .required(false)
                .conflicts_with("verbose"),
        )
        .arg(
            arg!(-v --"verbose" ... "Increase log verbosity (-v debug, -vv trace)")
                .required(false),
        )
}
