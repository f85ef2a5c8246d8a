use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "converter-lsp")]
#[command(version, about = "Language Server for template-driven data conversion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    // Future subcommands will be added here
    // e.g., History { #[command(subcommand)] action: HistoryAction }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(converter_lsp::lsp::server::run_server()),
    }
}
