//! Print the OpenAPI document for the fully registered API.

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};

use customer_api::ApiDoc;
use customer_api::domain::CustomerServiceImpl;
use customer_api::domain::ports::FixtureLocationLookup;
use customer_api::inbound::http::build_dispatch_table;
use customer_api::inbound::http::health::HealthState;
use customer_api::inbound::http::state::HttpState;
use customer_api::outbound::persistence::InMemoryCustomerRepository;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(about = "Dump the customer API OpenAPI document")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let service = CustomerServiceImpl::new(
        Arc::new(InMemoryCustomerRepository::new()),
        Arc::new(FixtureLocationLookup),
    );
    let state = HttpState::new(Arc::new(service), Arc::new(HealthState::new()));
    let table = build_dispatch_table(state).wrap_err("endpoint registration failed")?;
    let doc = ApiDoc::with_endpoints(&table);

    let rendered = match cli.format {
        Format::Json => doc.to_pretty_json().wrap_err("serialising OpenAPI as JSON")?,
        Format::Yaml => doc.to_yaml().wrap_err("serialising OpenAPI as YAML")?,
    };
    writeln!(std::io::stdout(), "{rendered}").wrap_err("writing OpenAPI document")?;
    Ok(())
}
