use mirmap::{FormatTag, MapEncoder};
use std::error;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (input, output) = match (args.get(1), args.get(2)) {
        (Some(input), Some(output)) => (input, output),
        _ => return Err("usage: convert <input> <output> [tag]".into()),
    };

    let format = match args.get(3) {
        Some(tag) => FormatTag::try_from(tag.parse::<u16>()?)?,
        None => FormatTag::Native,
    };

    let grid = mirmap::read_map(input)?;
    let mut writer = BufWriter::new(File::create(output)?);
    MapEncoder::new().format(format).encode_to(&grid, &mut writer)?;
    writer.flush()?;
    tracing::info!(from = %grid.format(), to = %format, "converted map");
    Ok(())
}
