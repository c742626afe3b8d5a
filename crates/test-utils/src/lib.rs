pub mod builders;
pub mod fakes;

use std::path::Path;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Budget for a single async test, generous enough for spawned processes.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Initialise tracing for tests, once per binary.
///
/// Output goes through `with_test_writer()`, so the harness only shows it for
/// failing tests (or with `-- --nocapture`). The filter comes from
/// `SITEPIPE_LOG`, then `RUST_LOG`, then `sitepipe=debug,warn`:
/// `SITEPIPE_LOG=sitepipe::exec=trace cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("SITEPIPE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("sitepipe=debug,warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test after [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .expect("test exceeded TEST_TIMEOUT")
}

/// Create `files` (relative path, contents) under `root`, with parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture directory");
        }
        std::fs::write(&path, contents).expect("write fixture file");
    }
}

/// Contents of `root/rel` as a string.
pub fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel))
        .unwrap_or_else(|e| panic!("reading {}: {e}", root.join(rel).display()))
}
