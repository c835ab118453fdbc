use anyhow::{bail, Context, Result};
use ornament_core::SceneConfig;
use std::path::PathBuf;

/// Command-line options.
///
/// ```text
/// ornament [--config scene.json] [--memories DIR] [--tracker "CMD ARGS"] [--seed N]
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub memories: Option<String>,
    pub tracker: Option<String>,
    pub seed: Option<u64>,
}

impl Args {
    /// Parse everything after the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut out = Args::default();
        let mut it = args.into_iter();
        while let Some(flag) = it.next() {
            let mut value = || {
                it.next()
                    .with_context(|| format!("{flag} expects a value"))
            };
            match flag.as_str() {
                "--config" => out.config = Some(PathBuf::from(value()?)),
                "--memories" => out.memories = Some(value()?),
                "--tracker" => out.tracker = Some(value()?),
                "--seed" => {
                    let v = value()?;
                    out.seed = Some(v.parse().with_context(|| format!("bad seed {v:?}"))?);
                }
                other => bail!("unknown argument {other:?}"),
            }
        }
        Ok(out)
    }

    pub fn from_env() -> Result<Self> {
        Self::parse(std::env::args().skip(1))
    }

    /// Load the config file if one was given, then apply overrides.
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                SceneConfig::from_json(&text)?
            }
            None => SceneConfig::default(),
        };
        if let Some(dir) = &self.memories {
            cfg.photos.directory = dir.trim_end_matches('/').to_string();
        }
        Ok(cfg)
    }
}
