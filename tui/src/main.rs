use anyhow::Result;

mod app;
mod state;
mod ui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    app::setup::init_logging()?;
    let config = app::setup::load_config()?;
    app::run::run(config).await
}
