use automark_server::cli::{dispatch, Cli};
use automark_server::logging;
use clap::Parser;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init_tracing(cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }
    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            2
        }
    };
    std::process::exit(code);
}
