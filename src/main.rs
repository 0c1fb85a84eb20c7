use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let app = galley::default()?;
    app.run();
    Ok(())
}
