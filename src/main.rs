use clap::{Parser, Subcommand};
use std::path::PathBuf;
use transform_url::config::Config;
use transform_url::logging::{init_subscriber, LogFormat};
use transform_url::{Attributes, DescriptorArgs, Field, SharedRegistry, ShortcutArg, Value};

/// Transform URL - build and check signed descriptor URLs
#[derive(Parser, Debug)]
#[command(name = "transform-url")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the URL for a uid
    Encode {
        uid: String,

        /// Shortcut arguments (`thumb`, `300x200#`, `:png`); field flags are ignored when given
        #[arg(long, num_args = 1.., value_parser = parse_shortcut_arg)]
        shortcut: Vec<ShortcutArg>,

        /// Processing method
        #[arg(long)]
        method: Option<String>,

        /// Processing option as key=value (repeatable)
        #[arg(long = "option", value_parser = parse_pair)]
        options: Vec<(String, String)>,

        /// Output format
        #[arg(long)]
        format: Option<String>,

        /// Encoding option as key=value (repeatable)
        #[arg(long = "encoding", value_parser = parse_pair)]
        encoding: Vec<(String, String)>,

        /// Fallback value
        #[arg(long)]
        default: Option<String>,
    },

    /// Decode a URL (path and query) and print its descriptor
    Decode { url: String },

    /// Validate the configuration and exit
    Check,
}

fn parse_shortcut_arg(raw: &str) -> Result<ShortcutArg, String> {
    raw.parse::<ShortcutArg>().map_err(|e| e.to_string())
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn field_args(
    method: Option<String>,
    options: Vec<(String, String)>,
    format: Option<String>,
    encoding: Vec<(String, String)>,
    default: Option<String>,
) -> DescriptorArgs {
    let mut attributes = Attributes::new();
    if let Some(method) = method {
        attributes.insert(Field::ProcessingMethod, Some(Value::from(method)));
    }
    if !options.is_empty() {
        attributes.insert(Field::ProcessingOptions, Some(Value::map(options)));
    }
    if let Some(format) = format {
        attributes.insert(Field::Format, Some(Value::from(format)));
    }
    if !encoding.is_empty() {
        attributes.insert(Field::Encoding, Some(Value::map(encoding)));
    }
    if let Some(default) = default {
        attributes.insert(Field::Default, Some(Value::from(default)));
    }

    if attributes.is_empty() {
        DescriptorArgs::Empty
    } else {
        DescriptorArgs::Attributes(attributes)
    }
}

fn run(args: Args) -> transform_url::Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let registry = SharedRegistry::new(config.build_registry());
    let codec = config.build_codec(registry)?;

    tracing::debug!(
        config_file = ?args.config,
        path_prefix = %config.url.path_prefix,
        protect_from_tampering = config.url.protect_from_tampering,
        shortcuts = config.shortcuts.len(),
        "Configuration loaded successfully"
    );

    match args.command {
        Command::Encode {
            uid,
            shortcut,
            method,
            options,
            format,
            encoding,
            default,
        } => {
            let call = if shortcut.is_empty() {
                field_args(method, options, format, encoding, default)
            } else {
                DescriptorArgs::Shortcut(shortcut)
            };
            println!("{}", codec.url_for(&uid, call)?);
        }
        Command::Decode { url } => {
            let descriptor = codec.decode_url(&url)?;
            let rendered = serde_json::to_string_pretty(&descriptor)
                .unwrap_or_else(|_| format!("{:?}", descriptor));
            println!("{}", rendered);
        }
        Command::Check => {
            println!("configuration OK");
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let log_format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_subscriber(log_format).expect("Failed to initialize logging subsystem");

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
