use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use evm_tx_signer::{
    log_warn, ErrorReport, KeyPair, RequestStrings, SignerError, SignerSettings, SigningContext,
    StaticProvider, TransactionRequest,
};

#[derive(Parser)]
#[command(name = "evm-tx-signer")]
#[command(about = "Offline signer for legacy EIP-155 Ethereum transactions")]
#[command(version)]
struct Cli {
    /// Print results and errors as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log each signing stage to stderr (secrets are redacted)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign a transaction and print the raw signed bytes
    Sign(SignArgs),

    /// Derive the address controlled by a private key
    Address {
        /// 32-byte private key, 64 hex chars with optional 0x
        #[arg(long)]
        private_key: String,

        /// Print the EIP-55 mixed-case form
        #[arg(long)]
        checksum: bool,
    },

    /// Generate a fresh key pair
    Keygen,
}

#[derive(Args)]
struct SignArgs {
    /// 32-byte private key, 64 hex chars with optional 0x
    #[arg(long)]
    private_key: String,

    /// Recipient address
    #[arg(long)]
    to: String,

    /// Gas limit (decimal or 0x-hex)
    #[arg(long)]
    gas_limit: String,

    /// Sender nonce; taken from --state when omitted
    #[arg(long)]
    nonce: Option<String>,

    /// Gas price in wei; taken from --state when omitted
    #[arg(long)]
    gas_price: Option<String>,

    /// Value in wei
    #[arg(long)]
    value: Option<String>,

    /// Call data as hex
    #[arg(long)]
    input: Option<String>,

    /// Chain id; taken from --state when omitted
    #[arg(long)]
    chain_id: Option<String>,

    /// JSON file with nonce, gasPrice and chainId defaults
    #[arg(long)]
    state: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_output = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, json_output);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = SignerSettings::from_env();
    if cli.debug {
        settings.debug = true;
    }
    for problem in settings.validate() {
        log_warn!("cli", "settings", problem = problem);
    }

    match cli.command {
        Command::Sign(args) => sign(args, settings, cli.json),
        Command::Address {
            private_key,
            checksum,
        } => address(&private_key, checksum || settings.checksum_addresses, cli.json),
        Command::Keygen => keygen(cli.json),
    }
}

fn sign(args: SignArgs, settings: SignerSettings, json_output: bool) -> Result<()> {
    let ctx = SigningContext::from_hex(&args.private_key)?.with_settings(settings);

    let request = TransactionRequest::from_strings(&RequestStrings {
        nonce: args.nonce.as_deref(),
        gas_price: args.gas_price.as_deref(),
        gas_limit: Some(&args.gas_limit),
        to: Some(&args.to),
        value: args.value.as_deref(),
        input: args.input.as_deref(),
        chain_id: args.chain_id.as_deref(),
    })?;

    let provider = match &args.state {
        Some(path) => StaticProvider::from_file(path)?,
        None => StaticProvider::new(),
    };

    let signed = ctx.sign_request(request, &provider)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&signed)?);
    } else {
        println!("{}", signed.raw_transaction_hex());
    }
    Ok(())
}

fn address(private_key: &str, checksum: bool, json_output: bool) -> Result<()> {
    let pair = KeyPair::from_hex(private_key)?;

    if json_output {
        let body = json!({
            "address": pair.address_hex(),
            "checksumAddress": pair.checksum_address(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if checksum {
        println!("{}", pair.checksum_address());
    } else {
        println!("{}", pair.address_hex());
    }
    Ok(())
}

fn keygen(json_output: bool) -> Result<()> {
    let exported = KeyPair::generate()?.export();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&exported)?);
    } else {
        println!("Private key (hex): {}", exported.private_key);
        println!("Public key (uncompressed hex): 0x{}", hex::encode(exported.public_key));
        println!("Address: {}", exported.checksum_address);
    }
    Ok(())
}

fn report_error(e: &anyhow::Error, json_output: bool) {
    let report = match e.downcast_ref::<SignerError>() {
        Some(signer_error) => serde_json::to_value(ErrorReport::from(signer_error)).ok(),
        None => None,
    };

    if json_output {
        let error = report.unwrap_or_else(|| {
            json!({
                "code": "internal",
                "message": e.to_string(),
            })
        });
        println!("{}", json!({ "error": error }));
    } else {
        eprintln!("error: {:#}", e);
    }
}
