use cert_lookup_lambda::adapters::acm::AcmCertificateInventory;
use cert_lookup_lambda::adapters::callback::HttpCallbackNotifier;
use cert_lookup_lambda::config::RuntimeConfig;
use cert_lookup_lambda::handlers::lookup::{handle_lookup_event, InvocationContext, LookupReport};
use cert_lookup_lambda::observability::init_logging;
use lambda_runtime::{service_fn, Context, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    inventory: AcmCertificateInventory,
    notifier: HttpCallbackNotifier,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<LookupReport, Error> {
    let context = invocation_context(&event.context);
    handle_lookup_event(&event.payload, &context, &deps.inventory, &deps.notifier)
        .map_err(|error| Error::from(error.to_string()))
}

fn invocation_context(context: &Context) -> InvocationContext {
    InvocationContext {
        request_id: context.request_id.clone(),
        log_stream_name: context.env_config.log_stream.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = RuntimeConfig::from_env()?;
    init_logging(config.log_format);

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        inventory: AcmCertificateInventory::new(aws_sdk_acm::Client::new(&aws_config)),
        notifier: HttpCallbackNotifier::new(config.callback_timeout).map_err(Error::from)?,
    };
    let deps = &deps;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handle_request(event, deps).await
    }))
    .await
}
