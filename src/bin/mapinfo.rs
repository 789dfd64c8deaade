use std::error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = args.get(1).ok_or("usage: mapinfo <file>")?;
    let data = std::fs::read(path)?;
    let grid = mirmap::decode(&data)?;

    let (mut blocked, mut doors) = (0usize, 0usize);
    for cell in grid.cells() {
        blocked += usize::from(cell.is_blocked());
        doors += usize::from(cell.has_door());
    }

    println!("format: {}", grid.format());
    println!("bytes: {}", data.len());
    println!("width: {}", grid.width());
    println!("height: {}", grid.height());
    println!("fishing zones: {}", grid.fishing_zones());
    println!("blocked: {}", blocked);
    println!("doors: {}", doors);
    Ok(())
}
