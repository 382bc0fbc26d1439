use clap::{Parser, Subcommand};
use relm4::prelude::*;
use speedial::config;
use speedial::events::Command;
use speedial::gui::app::AppModel;
use speedial::sys::{runtime, server::SOCKET_PATH};
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "speedial", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Open the dial if closed, close it if open.
    Toggle,
    /// Open the dial.
    Expand,
    /// Close the dial.
    Collapse,
    /// Write the default config file and print its path.
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        None => run_daemon(),
        Some(Commands::Toggle) => send_command(Command::Toggle),
        Some(Commands::Expand) => send_command(Command::Expand),
        Some(Commands::Collapse) => send_command(Command::Collapse),
        Some(Commands::InitConfig) => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_daemon() -> anyhow::Result<()> {
    let config = config::load_or_setup();

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.speedial.speedial");
    app.run::<AppModel>((config, rx));
    Ok(())
}

fn send_command(cmd: Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to speedial daemon at {}: {}. Is speedial running?",
            SOCKET_PATH,
            e
        )
    })?;
    writeln!(stream, "{}", cmd)?;
    Ok(())
}
