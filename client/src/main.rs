use clap::Parser;
use client::ai::ComputerPlayer;
use client::decision::DecisionSource;
use client::input::{self, HumanPlayer};
use client::network::Client;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:25500")]
    server: String,

    /// Player name, 1 to 12 letters or digits
    #[arg(short = 'n', long)]
    name: String,

    /// Let the computer play this seat
    #[arg(long)]
    ai: bool,

    /// Leave after the first game instead of waiting for the next
    #[arg(long)]
    once: bool,

    /// Seed for the computer player's choices
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if !shared::is_valid_name(&args.name) {
        eprintln!("Names are 1 to {} letters or digits", shared::MAX_NAME_LEN);
        std::process::exit(2);
    }

    let source: Box<dyn DecisionSource + Send> = if args.ai {
        info!("Computer is playing as {}", args.name);
        Box::new(ComputerPlayer::new(args.seed))
    } else {
        println!("{}", input::HELP);
        Box::new(HumanPlayer::new())
    };

    let mut client = Client::new(&args.server, &args.name, source)
        .await?
        .with_input(input::stdin_lines());
    if args.once {
        client = client.leave_after_game();
    }

    client.run().await?;

    Ok(())
}
