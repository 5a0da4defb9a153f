use std::path::PathBuf;

use cert_lookup_core::contract::{CallbackResponse, CallbackTarget};
use cert_lookup_lambda::adapters::acm::AcmCertificateInventory;
use cert_lookup_lambda::adapters::callback::{HttpCallbackNotifier, OutcomeNotifier};
use cert_lookup_lambda::adapters::inventory::{CertificateInventory, FileCertificateInventory};
use cert_lookup_lambda::config::{CALLBACK_TIMEOUT_ENV, DEFAULT_CALLBACK_TIMEOUT_SECS};
use cert_lookup_lambda::handlers::lookup::{handle_lookup_event, InvocationContext};
use cert_lookup_lambda::observability::{init_logging, LogFormat};
use clap::Parser;
use serde_json::{json, Value};

const FAKE_STACK_ID: &str =
    "arn:aws:cloudformation:us-east-1:123456789012:stack/my-stack/abcdef01-2345-6789-abcd-ef0123456789";
const FAKE_LOG_STREAM: &str = "2024/11/01/[$LATEST]abcdef1234567890";

/// Runs the lookup handler once against a fabricated custom-resource event.
#[derive(Parser, Debug)]
#[command(name = "local_invoke")]
struct Cli {
    /// Domain name placed in ResourceProperties.DomainName
    #[arg(long, default_value = "gokanmalkoc.click")]
    domain_name: String,
    /// Callback URL the response is PUT to
    #[arg(long, default_value = "http://example.com")]
    response_url: String,
    /// RequestType of the fabricated event
    #[arg(long, default_value = "Create")]
    request_type: String,
    /// Read certificates from a JSON file instead of ACM
    #[arg(long, env = "CERT_LOOKUP_INVENTORY_FILE")]
    inventory_file: Option<PathBuf>,
    /// Print the callback body instead of sending it
    #[arg(long)]
    print_only: bool,
    /// Log output format (json or pretty)
    #[arg(long, env = "CERT_LOOKUP_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
    /// Callback HTTP timeout in seconds
    #[arg(
        long,
        env = CALLBACK_TIMEOUT_ENV,
        default_value_t = DEFAULT_CALLBACK_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    callback_timeout_secs: u64,
}

struct StdoutNotifier;

impl OutcomeNotifier for StdoutNotifier {
    fn notify_outcome(
        &self,
        target: &CallbackTarget,
        response: &CallbackResponse,
    ) -> Result<(), String> {
        let body = serde_json::to_string_pretty(response)
            .map_err(|error| format!("failed to serialize callback response: {error}"))?;
        println!("PUT {}\n{body}", target.response_url);
        Ok(())
    }
}

fn fabricated_event(cli: &Cli) -> Value {
    json!({
        "RequestType": cli.request_type,
        "ResponseURL": cli.response_url,
        "StackId": FAKE_STACK_ID,
        "RequestId": "unique-request-id",
        "LogicalResourceId": "MyResource",
        "ResourceType": "Custom::CertificateLookup",
        "ResourceProperties": {
            "DomainName": cli.domain_name,
        },
    })
}

fn fabricated_context() -> InvocationContext {
    InvocationContext {
        request_id: "test_request_id".to_string(),
        log_stream_name: FAKE_LOG_STREAM.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let inventory: Box<dyn CertificateInventory> = match &cli.inventory_file {
        Some(path) => Box::new(FileCertificateInventory::new(path)),
        None => {
            let aws_config =
                aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Box::new(AcmCertificateInventory::new(aws_sdk_acm::Client::new(
                &aws_config,
            )))
        }
    };
    let notifier: Box<dyn OutcomeNotifier> = if cli.print_only {
        Box::new(StdoutNotifier)
    } else {
        Box::new(HttpCallbackNotifier::new(std::time::Duration::from_secs(
            cli.callback_timeout_secs,
        ))?)
    };

    let report = handle_lookup_event(
        &fabricated_event(&cli),
        &fabricated_context(),
        inventory.as_ref(),
        notifier.as_ref(),
    )?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
