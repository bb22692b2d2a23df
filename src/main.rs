use anyhow::Result;
use fengli::cli;

fn main() -> Result<()> {
    cli::run()
}
