use clap::Parser;

/// Flags that may be given with a single leading dash
const LEGACY_FLAGS: [&str; 4] = ["source", "type", "output", "config"];

#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(
    name = "shipment-updater",
    version,
    about = "Set delivery appointments on shipments found by purchase order"
)]
pub struct CliArgs {
    /// CSV file for processing
    #[arg(long, value_name = "INPUT_CSV")]
    pub source: Option<String>,

    /// Type of operation: create or update
    #[arg(long = "type", value_name = "TYPE")]
    pub operation: Option<String>,

    /// Output directory path
    #[arg(long, value_name = "OUTPUT_DIR")]
    pub output: Option<String>,

    /// Path to config.json
    #[arg(long, value_name = "CONFIG_PATH")]
    pub config: Option<String>,
}

impl CliArgs {
    /// Parse arguments (program name excluded), accepting `-source` as well
    /// as `--source`.
    pub fn try_parse_args<I>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = String>,
    {
        let argv = std::iter::once("shipment-updater".to_string()).chain(normalize_flags(args));
        Self::try_parse_from(argv)
    }

    /// True when `-source`, `-type` and `-output` are all present and non-empty
    pub fn has_required(&self) -> bool {
        [&self.source, &self.operation, &self.output]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

/// Rewrite `-source`, `-type`, `-output` and `-config` (optionally with
/// `=value`) into their double-dash form.
pub fn normalize_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            let Some(rest) = arg.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LEGACY_FLAGS.contains(&name) {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}
