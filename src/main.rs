fn main() -> anyhow::Result<()> {
    screenglow::run()?;
    Ok(())
}
