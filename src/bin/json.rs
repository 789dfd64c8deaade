use std::error;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut data = Vec::new();
    match std::env::args().nth(1) {
        Some(path) => data = std::fs::read(path)?,
        None => {
            io::stdin().read_to_end(&mut data)?;
        }
    }

    let grid = mirmap::decode(&data)?;
    let stdout = io::stdout();
    serde_json::to_writer(stdout.lock(), &grid)?;
    Ok(())
}
