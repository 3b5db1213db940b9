// This main function is the entry point when running `cargo run -p web-server`.
// It loads `config.toml` / `CRYPTOSTATS__*` settings and hands over to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config(None)?;
    let _log_guard = configuration::init_tracing(&config.logging)?;
    web_server::run_server(config).await
}
