use clap::Parser;
use dice_engine::RollRecord;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Seed the RNG so a session can be replayed
    #[arg(short, long)]
    seed: Option<u64>,
    /// Print each roll as a JSON roll record
    #[arg(short, long, action)]
    json: bool,
    /// Enable Debug logging
    #[arg(short, long, action)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(if args.debug {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    print!("> ");
    io::stdout().flush()?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let notation = line.trim();
        if !notation.is_empty() {
            match dice_engine::roll_with(notation, &mut rng) {
                Ok(result) if args.json => {
                    println!("{}", serde_json::to_string(&RollRecord::from(result))?)
                }
                Ok(result) => println!("{}", result),
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
