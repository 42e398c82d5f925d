use rotato_ui_terminal::cli::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    cli::run(Cli::parse_args()).await
}
