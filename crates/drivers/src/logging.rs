use std::io::Write;

use env_logger::{Builder, Env};

const DEFAULT_FILTER: &str = "info";
const QUIET_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

/// Compact `[HH:MM:SS LEVEL file:line] message` lines on stderr.
///
/// Defaults to `info`; `RUST_LOG` overrides it, including the wgpu modules
/// that are otherwise held at `warn`.
pub fn init_logging() {
    logging_builder(Env::default().default_filter_or(DEFAULT_FILTER)).init();
}

fn logging_builder(env: Env<'_>) -> Builder {
    let mut builder = Builder::new();
    for module in QUIET_MODULES {
        builder.filter_module(module, log::LevelFilter::Warn);
    }
    // Parsed last so same-module directives from the environment win.
    builder.parse_env(env);
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "[{} {style}{}{style:#} {}:{}] {}",
            chrono::Local::now().format("%H:%M:%S"),
            record.level(),
            record
                .file()
                .and_then(|file| file.rsplit('/').next())
                .unwrap_or("?"),
            record.line().unwrap_or(0),
            record.args()
        )
    });
    builder
}
