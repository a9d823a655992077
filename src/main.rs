use anyhow::Result;

fn main() -> Result<()> {
    blobfield::app::run()
}
