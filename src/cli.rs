use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::api::ApiClient;
use crate::config::Config;
use crate::models::transaction::{TransactionFilter, TransactionSortOrder, TransactionType};
use crate::providers::{
    AuthProvider, CategoryProvider, ChatProvider, DashboardProvider, PredictionProvider,
    TransactionProvider, UniversityProvider,
};
use crate::services::predictions::{PredictionKind, DEFAULT_PREDICTION_DAYS};
use crate::utils::format::{
    format_compact_currency, format_currency, format_long_date, format_percentage, format_wib,
    DatePattern,
};
use crate::utils::sanitize::mask_secret;

#[derive(Parser)]
#[command(name = "lunance")]
#[command(about = "Lunance - student finance assistant client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check configuration, API reachability and the access token
    Check,

    /// Show the effective configuration
    Config,

    /// Log in and print the access token
    Login {
        #[arg(value_name = "EMAIL")]
        email: String,
        #[arg(long, env = "LUNANCE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Print the full token instead of a masked one
        #[arg(long)]
        show_token: bool,
    },

    /// Show the current user
    Me,

    /// List transactions
    Transactions {
        /// income or expense
        #[arg(long = "type")]
        transaction_type: Option<TransactionType>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        per_page: u32,
        /// newest, oldest, highest or lowest
        #[arg(long, default_value = "newest")]
        sort: TransactionSortOrder,
    },

    /// Income and expense totals
    Summary {
        /// yyyy-MM-dd
        #[arg(long)]
        start: Option<NaiveDate>,
        /// yyyy-MM-dd
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// List global and personal categories
    Categories,

    /// Dashboard summary and 50/30/20 budget
    Dashboard,

    /// Show a forecast
    Predict {
        /// income, expense, budget or savings
        #[arg(value_name = "KIND")]
        kind: PredictionKind,
        #[arg(long, default_value_t = DEFAULT_PREDICTION_DAYS)]
        days: u32,
    },

    /// Show budget health
    BudgetHealth,

    /// List universities
    Universities {
        #[arg(long)]
        search: Option<String>,
    },

    /// Send a message to the assistant
    Chat {
        #[arg(value_name = "MESSAGE")]
        message: String,
        /// Existing conversation; a new one is started when omitted
        #[arg(long)]
        conversation: Option<String>,
    },
}

pub fn handle_config(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  API URL: {}", config.api_url);
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!(
        "  Access token: {}",
        config
            .access_token
            .as_deref()
            .map(mask_secret)
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("  Academic email only: {}", config.academic_email_only);

    println!("✓ Configuration is valid");
    Ok(())
}

pub async fn handle_login(
    api: &ApiClient,
    config: &Config,
    email: &str,
    password: &str,
    show_token: bool,
) -> anyhow::Result<()> {
    let auth = AuthProvider::new(api.clone(), config.email_policy());
    let user = auth.login(email, password).await.map_err(anyhow::Error::msg)?;

    let token = auth
        .state()
        .data
        .tokens
        .map(|t| t.access_token)
        .unwrap_or_default();

    println!("✓ Logged in as {} ({})", user.display_name(), user.email);
    if show_token {
        println!("LUNANCE_ACCESS_TOKEN={}", token);
    } else {
        println!("Access token: {}", mask_secret(&token));
        println!("Re-run with --show-token to print it in full.");
    }
    Ok(())
}

pub async fn handle_me(api: &ApiClient, config: &Config) -> anyhow::Result<()> {
    let auth = AuthProvider::new(api.clone(), config.email_policy());
    let user = auth.load_current_user().await.map_err(anyhow::Error::msg)?;

    println!("{} [{}]", user.display_name(), user.initials());
    println!("  Email: {}", user.email);
    println!("  Role: {}", user.role.display_name());
    if let Some(university) = &user.profile.university_name {
        println!("  University: {}", university);
    }
    if user.financial_settings.is_configured() {
        println!(
            "  Monthly budget: {}",
            format_currency(user.financial_settings.monthly_budget)
        );
        println!(
            "  Savings progress: {}",
            format_percentage(user.financial_settings.savings_progress(), 1)
        );
    }
    if !user.has_completed_profile() {
        println!("  ⚠️  Profile incomplete: choose university, faculty and major");
    }
    Ok(())
}

pub async fn handle_transactions(
    api: &ApiClient,
    filter: TransactionFilter,
    sort: TransactionSortOrder,
) -> anyhow::Result<()> {
    let provider = TransactionProvider::new(api.clone());
    provider.set_sort_order(sort);
    provider.load(filter).await.map_err(anyhow::Error::msg)?;

    let state = provider.state().data;
    if state.items.is_empty() {
        println!("No transactions found");
        return Ok(());
    }

    println!("{:<18} {:<12} {:<20} {:>16}", "Date (WIB)", "Type", "Category", "Amount");
    println!("{}", "-".repeat(70));
    for tx in &state.items {
        println!(
            "{:<18} {:<12} {:<20} {:>16}",
            format_wib(tx.transaction_date, DatePattern::DateTime),
            tx.transaction_type.display_name(),
            tx.category_label(),
            tx.formatted_amount()
        );
    }
    println!(
        "\nPage {} · {} transactions total{}",
        state.page,
        state.total,
        if state.has_next { " · more available" } else { "" }
    );
    Ok(())
}

pub async fn handle_summary(
    api: &ApiClient,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let provider = TransactionProvider::new(api.clone());
    let summary = provider
        .load_summary(start, end)
        .await
        .map_err(anyhow::Error::msg)?;

    println!("Income:   {}", format_currency(summary.total_income));
    println!("Expense:  {}", format_currency(summary.total_expense));
    println!("Net:      {}", format_currency(summary.net_amount));
    println!("Savings rate: {}", format_percentage(summary.savings_rate(), 1));
    println!(
        "Transactions: {} ({} income, {} expense)",
        summary.transaction_count, summary.income_count, summary.expense_count
    );
    Ok(())
}

pub async fn handle_categories(api: &ApiClient) -> anyhow::Result<()> {
    let provider = CategoryProvider::new(api.clone());
    provider.load().await.map_err(anyhow::Error::msg)?;

    let (global, personal) = provider.by_scope();
    for (label, list) in [("Global", global), ("Pribadi", personal)] {
        println!("{} ({}):", label, list.len());
        for category in list {
            println!("  {:<24} {:<20} {}", category.name, category.icon, category.color);
        }
    }
    Ok(())
}

pub async fn handle_dashboard(api: &ApiClient) -> anyhow::Result<()> {
    let provider = DashboardProvider::new(api.clone());
    let result = provider.refresh().await;
    let state = provider.state().data;

    if let Some(summary) = &state.summary {
        println!("Balance: {}", format_currency(summary.current_balance));
        println!(
            "This month: {} in, {} out ({} saved)",
            format_compact_currency(summary.monthly_income),
            format_compact_currency(summary.monthly_expense),
            format_percentage(summary.savings_rate(), 1)
        );
    }
    if let Some(budget) = &state.budget {
        println!("\n50/30/20 budget:");
        for bucket in budget.buckets() {
            println!(
                "  {:<10} {:>14} / {:<14} {:>7}{}",
                bucket.budget_type_name(),
                format_currency(bucket.spent),
                format_currency(bucket.allocated),
                format_percentage(bucket.usage_percentage(), 0),
                if bucket.is_over_budget() { "  ⚠️" } else { "" }
            );
        }
    }
    result.map_err(anyhow::Error::msg)
}

pub async fn handle_predict(api: &ApiClient, kind: PredictionKind, days: u32) -> anyhow::Result<()> {
    let provider = PredictionProvider::new(api.clone());
    match kind {
        PredictionKind::Income | PredictionKind::Expense => {
            let result = if kind == PredictionKind::Income {
                provider.load_income(days).await
            } else {
                provider.load_expense(days).await
            }
            .map_err(anyhow::Error::msg)?;

            println!("{} forecast, {} days", kind, result.period_days);
            for point in &result.predictions {
                println!(
                    "  {:<16} {:>16}  ({})",
                    format_long_date(&point.date),
                    point.display_value(),
                    point.display_range()
                );
            }
            println!("Total: {}", format_currency(result.total_predicted()));
            println!(
                "Confidence: {} (accuracy {})",
                result.model_performance.confidence_level().display_name(),
                result.model_performance.formatted_accuracy()
            );
        }
        PredictionKind::Budget => {
            let result = provider.load_budget(days).await.map_err(anyhow::Error::msg)?;
            println!("Budget forecast, {} days", result.period_days);
            for point in &result.predictions {
                println!(
                    "  {:<16} {:>16} / {:<16} {}",
                    format_long_date(&point.date),
                    point.point().display_value(),
                    format_currency(point.daily_budget),
                    point.budget_status.display_name()
                );
            }
            println!(
                "Overall: {} ({} days over budget)",
                result.overall_status().display_name(),
                result.days_over_budget()
            );
            for recommendation in &result.recommendations {
                println!("  • {}", recommendation);
            }
        }
        PredictionKind::Savings => {
            let result = provider.load_savings(days).await.map_err(anyhow::Error::msg)?;
            println!(
                "Savings: {} of {} ({})",
                format_currency(result.current_savings),
                format_currency(result.target_amount),
                format_percentage(result.progress_percentage(), 1)
            );
            println!("Predicted: {}", format_currency(result.predicted_savings));
            if let Some(months) = result.months_to_target {
                println!("Months to target: {:.1}", months);
            }
            println!("Achievable: {}", if result.is_achievable { "yes" } else { "no" });
            for recommendation in &result.recommendations {
                println!("  • {}", recommendation);
            }
        }
    }
    Ok(())
}

pub async fn handle_budget_health(api: &ApiClient) -> anyhow::Result<()> {
    let provider = PredictionProvider::new(api.clone());
    let health = provider
        .load_budget_health()
        .await
        .map_err(anyhow::Error::msg)?;

    println!(
        "Budget health: {} ({:.0}/100)",
        health.health_level.display_name(),
        health.health_score
    );
    for (category, variance) in health.overspent_categories() {
        println!("  {:<20} +{}", category, format_percentage(variance, 1));
    }
    for recommendation in &health.recommendations {
        println!("  • {}", recommendation);
    }
    Ok(())
}

pub async fn handle_universities(api: &ApiClient, search: Option<&str>) -> anyhow::Result<()> {
    let provider = UniversityProvider::new(api.clone());
    provider.load().await.map_err(anyhow::Error::msg)?;

    let items = provider.search(search.unwrap_or(""));
    println!("{:<40} {:>10} {:>10}", "University", "Faculties", "Majors");
    println!("{}", "-".repeat(62));
    for item in items {
        println!(
            "{:<40} {:>10} {:>10}",
            item.name, item.faculty_count, item.major_count
        );
    }
    Ok(())
}

pub async fn handle_chat(
    api: &ApiClient,
    message: &str,
    conversation: Option<&str>,
) -> anyhow::Result<()> {
    let chat = ChatProvider::new(api.clone());
    chat.connect().await.map_err(anyhow::Error::msg)?;

    let opened = match conversation {
        Some(id) => chat.open_conversation(id).await,
        None => chat.start_conversation(None).await.map(|_| ()),
    };
    opened.map_err(anyhow::Error::msg)?;

    chat.send_message(message).await.map_err(anyhow::Error::msg)?;

    let state = chat.state().data;
    if let Some(id) = &state.active_conversation_id {
        println!("Conversation: {}", id);
    }
    for entry in state.messages.iter().rev().take(2).rev() {
        let who = if entry.is_from_user() { "You" } else { "Luna" };
        println!("[{}] {}: {}", entry.time_label(), who, entry.content);
    }
    chat.disconnect();
    Ok(())
}
