use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// ログをファイルに出す (画面はエディタが使うため)
///
/// レベルは `RUST_LOG` で指定できる。未指定なら debug build は `debug`、それ以外は `info`
pub fn init<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let default_level = if cfg!(debug_assertions) { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)
}
