use clap::Parser;

use insurio::client::{FormUi, SubmissionClient, SubmitOutcome, ACK_DETAIL, ACK_HEADING};

/// Post a filled form to an Insurio intake endpoint.
#[derive(Parser)]
#[command(name = "submit")]
struct Args {
    /// Intake endpoint URL, e.g. http://localhost:5001/intake/contact
    endpoint: String,

    /// Form fields as name=value pairs
    #[arg(value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Claim success after a fixed delay instead of reading the response
    #[arg(long)]
    optimistic: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got {:?}", raw)),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurio=info".into()),
        )
        .init();

    let args = Args::parse();

    let client = SubmissionClient::new(args.endpoint);
    let mut ui = FormUi::new("Submit", args.fields);

    ui.begin_submit();
    println!("{}", ui.submit_label());

    let outcome = if args.optimistic {
        client.submit_optimistic(ui.fields()).await
    } else {
        client.submit(ui.fields()).await
    };

    ui.apply(&outcome);
    match outcome {
        SubmitOutcome::Accepted => {
            println!("{}", ACK_HEADING);
            println!("{}", ACK_DETAIL);
        }
        SubmitOutcome::Failed { error } => {
            eprintln!("{}", ui.error_notice().unwrap_or_default());
            eprintln!("({})", error);
            std::process::exit(1);
        }
    }
}
