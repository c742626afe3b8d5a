// src/main.rs

use sitepipe::engine::HostEnv;
use sitepipe::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("sitepipe error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    let env = HostEnv::from_process();
    logging::init_logging(args.log_level, &env)?;
    run(args, env).await
}
