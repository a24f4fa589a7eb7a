use commands::command_argument_builder;
use page_loader::handle_download;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    handle_download(&matches).await;
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
