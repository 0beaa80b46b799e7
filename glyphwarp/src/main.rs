use std::io::Write;

use clap::Parser;
use glyphwarp::{run, Args, Error};

fn main() -> Result<(), Error> {
    env_logger::builder()
        .format(|buf, record| {
            let ts = buf.timestamp_micros();
            let level_style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{}: {level_style}{}{level_style:#}: {}",
                ts,
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    let summary = run(&args)?;
    println!("{summary}");
    Ok(())
}
