use agent_check::client::{self, ClientError};
use agent_check::state::SetOutcome;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agent-check-cli")]
#[command(about = "Operator CLI for the agent-check sidecar", long_about = None)]
struct Cli {
    /// Host running the agent
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Report channel port
    #[arg(long, env = "AC_LISTEN_PORT")]
    listen_port: Option<u16>,

    /// Control channel port
    #[arg(long, env = "AC_TALK_PORT")]
    talk_port: Option<u16>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the reported state and CPU idle figure
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the operational state (READY, DRAIN, MAINT, DOWN, FAILED, STOPPED, UP)
    Set {
        state: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { json } => {
            let port = cli.listen_port.ok_or("report port required: --listen-port or AC_LISTEN_PORT")?;
            let report = client::fetch_report((cli.host.as_str(), port)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} {}%", report.state, report.idle_percent);
            }
        }
        Commands::Set { state } => {
            let port = cli.talk_port.ok_or("control port required: --talk-port or AC_TALK_PORT")?;
            match client::send_state((cli.host.as_str(), port), &state).await {
                Ok(outcome @ SetOutcome::Applied(_)) => println!("{}", outcome),
                Ok(SetOutcome::Rejected) => {
                    eprintln!("Error: agent rejected state {:?}", state);
                    std::process::exit(1);
                }
                Err(ClientError::NoReply) => {
                    eprintln!("Error: agent closed the connection without replying");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
