use std::io::Write;

use env_logger::{Env, WriteStyle};

/// Install the binary's logger; `RUST_LOG` overrides the default `info` level
pub(crate) fn try_init() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[RACETRACK | {}] {}", record.level(), record.args()))
        .write_style(WriteStyle::Auto)
        .try_init()
}
