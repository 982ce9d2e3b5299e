//! `waltz-selector` binary entry point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = waltz_cli::cli().get_matches();
    waltz_cli::init_tracing(matches.get_flag("log-json"));

    let output = waltz_cli::run(&matches).await?;
    println!("{output}");
    Ok(())
}
