use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use bridge::{BridgeConfig, ConversionContext, NativeFeature, ShapeRecord, native_to_shape, shape_to_native};
use clap::{Parser, Subcommand};
use foundation::{Coordinate, NumberFormat, View, decode};
use layers::StyleDefaults;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and convert map shapes")]
struct Args {
    /// JSON file with `bridge` and `style` sections
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a nested coordinate array and print its kind, size and extent
    Decode {
        /// JSON file, or `-` for stdin
        input: String,
    },

    /// Parse a textual coordinate such as `12.5/41.9`
    ParseCoord {
        text: String,

        /// Treat `,` as the decimal separator
        #[arg(long)]
        decimal_comma: bool,
    },

    /// Great-circle distance in kilometres between two lon/lat coordinates
    Distance { from: String, to: String },

    /// Convert shape records to renderer features
    ToNative {
        /// JSON file, or `-` for stdin
        input: String,
    },

    /// Convert renderer features back to shape records
    FromNative {
        /// JSON file, or `-` for stdin
        input: String,
    },
}

/// Contents of the `--config` file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ToolConfig {
    bridge: BridgeConfig,
    style: StyleDefaults,
}

impl ToolConfig {
    fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("read config {}: {e}", path.display()))?;
                serde_json::from_str(&text)?
            }
            None => Self::default(),
        };
        Ok(Self {
            bridge: config.bridge.with_env_overrides(),
            ..config
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = ToolConfig::load(args.config.as_deref())?;
    let view = View::default();
    let ctx = ConversionContext {
        view: &view,
        defaults: &config.style,
        serialization_limit: config.bridge.serialization_limit,
    };

    let output = match args.command {
        Command::Decode { input } => decode_summary(&read_json(&input)?)?,
        Command::ParseCoord {
            text,
            decimal_comma,
        } => parse_coord(&text, decimal_comma)?,
        Command::Distance { from, to } => distance(&from, &to)?,
        Command::ToNative { input } => to_native(read_json(&input)?, &ctx)?,
        Command::FromNative { input } => from_native(read_json(&input)?, &ctx)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_json(input: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input).map_err(|e| format!("read {input}: {e}"))?
    };
    Ok(serde_json::from_str(&text)?)
}

fn decode_summary(value: &Value) -> Result<Value, Box<dyn std::error::Error>> {
    let set = decode(value)?;
    let extent = set.extent().map(|e| serde_json::json!({ "min": e.min, "max": e.max }));
    Ok(serde_json::json!({
        "kind": format!("{:?}", set.kind()),
        "coordinates": set.coordinate_count(),
        "extent": extent,
    }))
}

fn parse_coord(text: &str, decimal_comma: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let format = if decimal_comma {
        NumberFormat::decimal_comma()
    } else {
        NumberFormat::invariant()
    };
    let c = Coordinate::parse(text, &format)?;
    Ok(serde_json::json!({
        "coordinate": c,
        "text": c.format(&format),
    }))
}

fn distance(from: &str, to: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let format = NumberFormat::invariant();
    let a = Coordinate::parse(from, &format)?;
    let b = Coordinate::parse(to, &format)?;
    Ok(serde_json::json!({ "km": a.distance_to(&b) }))
}

/// Accepts a single object or an array of them.
fn many<T: for<'de> Deserialize<'de>>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

fn to_native(value: Value, ctx: &ConversionContext<'_>) -> Result<Value, Box<dyn std::error::Error>> {
    let records: Vec<ShapeRecord> = many(value)?;
    let mut features = Vec::with_capacity(records.len());
    for record in records {
        let shape = record.into_shape();
        features.push(shape_to_native(&shape, ctx)?);
    }
    info!(count = features.len(), "converted shapes");
    Ok(serde_json::to_value(features)?)
}

fn from_native(value: Value, ctx: &ConversionContext<'_>) -> Result<Value, Box<dyn std::error::Error>> {
    let features: Vec<NativeFeature> = many(value)?;
    let mut records = Vec::with_capacity(features.len());
    for feature in &features {
        let translation = native_to_shape(feature, ctx);
        for issue in &translation.issues {
            warn!(id = %feature.id, %issue, "feature translated with issue");
        }
        records.push(ShapeRecord::from_shape(&translation.shape, ctx.defaults));
    }
    Ok(serde_json::to_value(records)?)
}
