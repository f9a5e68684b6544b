//! CLI for the wisp text browser.

mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use wisp_core::config::{self, WispConfig};

/// Sample page shown when neither a URI nor `default_file` is given.
const DEFAULT_SAMPLE: &str = "test-content/sample.txt";

/// Fetch a URI and print it as text.
#[derive(Debug, Parser)]
#[command(name = "wisp")]
#[command(about = "wisp: fetch http, https, file, data and view-source URIs as text", long_about = None)]
pub struct Cli {
    /// URI to load, e.g. https://example.org/ or view-source:http://example.org/.
    /// Defaults to the configured sample file.
    pub uri: Option<String>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let raw = match cli.uri {
            Some(uri) => uri,
            None => default_uri(&cfg, &std::env::current_dir()?),
        };
        tracing::info!("load uri={}", raw);

        let result = wisp_core::fetch_uri(&raw, &cfg.fetch_options())
            .with_context(|| format!("failed to load {}", raw))?;

        let mut out = io::stdout().lock();
        render::show(&result, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

/// `file://` URI of the configured default file, else of the bundled sample under `cwd`.
fn default_uri(cfg: &WispConfig, cwd: &Path) -> String {
    let path: PathBuf = match &cfg.default_file {
        Some(p) if p.is_absolute() => p.clone(),
        Some(p) => cwd.join(p),
        None => cwd.join(DEFAULT_SAMPLE),
    };
    format!("file://{}", path.display())
}
