use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lunance_client::cli::{self, Cli, Commands};
use lunance_client::models::transaction::TransactionFilter;
use lunance_client::{startup, ApiClient, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so command output stays pipeable.
    let json_logs = std::env::var("LUNANCE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(json_logs.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json_logs).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    let cli = Cli::parse();
    let api = ApiClient::from_config(&config);
    tracing::debug!("API client initialized with URL: {}", config.api_url);

    match cli.command {
        Commands::Check => {
            let report = startup::validate_environment(&config, &api).await?;
            report.print();
            if !report.is_valid() {
                anyhow::bail!("client check failed");
            }
            Ok(())
        }
        Commands::Config => cli::handle_config(&config),
        Commands::Login {
            email,
            password,
            show_token,
        } => cli::handle_login(&api, &config, &email, &password, show_token).await,
        Commands::Me => cli::handle_me(&api, &config).await,
        Commands::Transactions {
            transaction_type,
            category,
            search,
            page,
            per_page,
            sort,
        } => {
            let filter = TransactionFilter {
                transaction_type,
                category_id: category,
                search,
                page: Some(page),
                per_page: Some(per_page),
                ..TransactionFilter::default()
            };
            cli::handle_transactions(&api, filter, sort).await
        }
        Commands::Summary { start, end } => cli::handle_summary(&api, start, end).await,
        Commands::Categories => cli::handle_categories(&api).await,
        Commands::Dashboard => cli::handle_dashboard(&api).await,
        Commands::Predict { kind, days } => cli::handle_predict(&api, kind, days).await,
        Commands::BudgetHealth => cli::handle_budget_health(&api).await,
        Commands::Universities { search } => {
            cli::handle_universities(&api, search.as_deref()).await
        }
        Commands::Chat {
            message,
            conversation,
        } => cli::handle_chat(&api, &message, conversation.as_deref()).await,
    }
}
