//! AtlasWire CLI
//!
//! Offline inspection tool: encodes options and mutations, evaluates
//! mutation rules against sample values, prepares versionstamp transforms
//! and classifies engine error codes. Useful for building test vectors.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use atlaswire::options::OptionId;
use atlaswire::versionstamp::{prepare_versionstamped, OffsetConvention, StampTarget, Versionstamp};
use atlaswire::{
    apply_mutation, classify, ClientConfig, MutationEncoder, MutationOutcome,
    OptionEncoder, OptionParam, ParamKind, Result, Scope, StreamingMode, WireError,
};

/// AtlasWire CLI
#[derive(Parser, Debug)]
#[command(name = "atlaswire-cli")]
#[command(about = "Inspect the AtlasWire option, mutation and error encodings")]
#[command(version)]
struct Args {
    /// Negotiated API version (selects the versionstamp offset convention)
    #[arg(long, default_value_t = ClientConfig::DEFAULT_API_VERSION)]
    api_version: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode an option
    Option {
        /// network | database | transaction
        scope: Scope,

        /// Option name (snake_case)
        name: String,

        /// Integer parameter
        #[arg(long, conflicts_with_all = ["string", "hex"])]
        int: Option<i64>,

        /// String parameter
        #[arg(long, conflicts_with = "hex")]
        string: Option<String>,

        /// Byte parameter as hex
        #[arg(long)]
        hex: Option<String>,
    },

    /// List the options of a scope
    Options {
        /// network | database | transaction
        scope: Scope,
    },

    /// Encode an atomic mutation and optionally evaluate it
    Mutate {
        /// Mutation name or legacy alias
        kind: String,

        /// Key as hex
        key: String,

        /// Parameter as hex
        param: String,

        /// Existing value as hex; evaluates the rule when given
        #[arg(long)]
        existing: Option<String>,

        /// Treat the existing value as absent and evaluate the rule
        #[arg(long, conflicts_with = "existing")]
        absent: bool,
    },

    /// Prepare a versionstamped buffer
    Versionstamp {
        /// Buffer as hex, including the offset suffix
        buffer: String,

        /// Treat the buffer as a value instead of a key
        #[arg(long)]
        value: bool,

        /// Commit version to substitute
        #[arg(long)]
        commit_version: Option<u64>,

        /// Batch order to substitute
        #[arg(long, default_value_t = 0)]
        batch: u16,
    },

    /// Classify an engine error code
    Classify {
        #[arg(allow_negative_numbers = true)]
        code: i32,
    },

    /// List streaming modes
    Streaming,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,atlaswire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::builder().api_version(args.api_version).build();

    if let Err(e) = run(&config, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &ClientConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Option {
            scope,
            name,
            int,
            string,
            hex,
        } => {
            let param = match (int, string, hex) {
                (Some(v), _, _) => OptionParam::Int(v),
                (_, Some(s), _) => OptionParam::String(s),
                (_, _, Some(h)) => OptionParam::from(parse_hex(&h)?),
                _ => OptionParam::None,
            };
            let encoded = OptionEncoder::new(config).encode_by_name(scope, &name, param)?;
            println!("scope:   {}", encoded.scope);
            println!("code:    {}", encoded.code);
            match &encoded.payload {
                Some(p) => println!("payload: {}", hex::encode(p)),
                None => println!("payload: (absent)"),
            }
        }
        Commands::Options { scope } => {
            for option in OptionId::all(scope) {
                let d = option.descriptor();
                let kind = match d.kind {
                    ParamKind::None => "-",
                    ParamKind::Int64 => "int64",
                    ParamKind::Bytes => "bytes",
                    ParamKind::String => "string",
                };
                let flag = if d.deprecated { " (deprecated)" } else { "" };
                println!("{:>5}  {:<40} {:<7}{}", d.code, d.name, kind, flag);
            }
        }
        Commands::Mutate {
            kind,
            key,
            param,
            existing,
            absent,
        } => {
            let key = parse_hex(&key)?;
            let param = parse_hex(&param)?;
            let op = MutationEncoder::new(config).encode_named(&kind, &key, &param)?;
            println!("opcode:  {} ({})", op.opcode(), op.kind);
            println!("key:     {}", hex::encode(&op.key));
            println!("param:   {}", hex::encode(&op.param));
            if let Some(pos) = op.versionstamp_pos {
                println!("offset:  {}", pos);
            }

            let existing = existing.map(|h| parse_hex(&h)).transpose()?;
            if existing.is_some() || absent {
                let outcome = apply_mutation(op.kind, existing.as_deref(), &param, config.max_value_size)?;
                match outcome {
                    MutationOutcome::Set(v) => println!("result:  {}", hex::encode(v)),
                    MutationOutcome::Clear => println!("result:  (cleared)"),
                    MutationOutcome::Unchanged => println!("result:  (unchanged)"),
                }
            }
        }
        Commands::Versionstamp {
            buffer,
            value,
            commit_version,
            batch,
        } => {
            let buffer = parse_hex(&buffer)?;
            let target = if value { StampTarget::Value } else { StampTarget::Key };
            let convention = config.offset_convention();
            let transform = prepare_versionstamped(&buffer, target, convention)?;
            let label = match convention {
                OffsetConvention::Legacy => "legacy",
                OffsetConvention::Current => "current",
            };
            println!("convention: {}", label);
            println!("payload:    {}", hex::encode(transform.payload()));
            println!("window:     {:?}", transform.window());
            if let Some(version) = commit_version {
                let stamped = transform.apply(&Versionstamp::new(version, batch));
                println!("stamped:    {}", hex::encode(stamped));
            }
        }
        Commands::Classify { code } => {
            let c = classify(code);
            let name = atlaswire::classify::error_name(code).unwrap_or("unknown");
            println!("code:                    {} ({})", code, name);
            println!("retryable:               {}", c.retryable);
            println!("maybe_committed:         {}", c.maybe_committed);
            println!("retryable_not_committed: {}", c.retryable_not_committed);
        }
        Commands::Streaming => {
            for mode in StreamingMode::ALL {
                println!("{:>3}  {}", mode.value(), mode);
            }
        }
    }

    Ok(())
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| WireError::Protocol(format!("Invalid hex '{}': {}", s, e)))
}
