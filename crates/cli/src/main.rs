mod args;
mod terminal;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use stockguard_client::render::CardTemplate;
use stockguard_client::{
    AccountService, ApiClient, ChartPanel, ClientConfig, CycleOutcome, DashboardRefresher, DateRange,
    DialogNotifier, FileSessionStore, InventoryApi, InventoryCardTemplate, InventoryFilter,
    MemoryResults, QueryCycle, ReportRequest, SearchPanel, SearchQuery, SessionContext, routes,
};
use stockguard_core::{Credentials, ProfileUpdate, Registration};

use args::{Cli, Command};
use terminal::{BarCharts, PageHint, StatusLine, SummaryLine};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    stockguard_observability::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("invalid StockGuard configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    let session = open_session(&config)?;
    let client = ApiClient::new(config.api_url.clone(), session);
    tracing::debug!(api_url = %config.api_url, "client ready");

    run(cli.command, &config, client).await
}

fn open_session(config: &ClientConfig) -> anyhow::Result<SessionContext> {
    let path = config
        .session_file
        .clone()
        .or_else(FileSessionStore::default_path)
        .context("no configuration directory for the session file; set STOCKGUARD_SESSION_FILE")?;
    Ok(SessionContext::new(FileSessionStore::new(path)))
}

fn accounts(config: &ClientConfig, client: ApiClient) -> AccountService {
    AccountService::new(
        client,
        Arc::new(PageHint),
        Arc::new(DialogNotifier::new(std::io::stdout())),
        Arc::new(StatusLine),
    )
    .with_encoding(config.login_encoding)
}

/// Account failures have already been printed; only the exit code is left.
fn exit_code<T, E>(result: Result<T, E>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn cycle_exit(outcome: &CycleOutcome, view: &MemoryResults) -> ExitCode {
    match outcome {
        CycleOutcome::Rendered(_) => {
            terminal::print_cards(&view.cards());
            ExitCode::SUCCESS
        }
        CycleOutcome::Superseded => ExitCode::SUCCESS,
        CycleOutcome::Rejected { .. } | CycleOutcome::Failed(_) => ExitCode::FAILURE,
    }
}

async fn run(command: Command, config: &ClientConfig, client: ApiClient) -> anyhow::Result<ExitCode> {
    let code = match command {
        Command::Login { username, password } => {
            let credentials = Credentials::new(username, password);
            exit_code(accounts(config, client).login(&credentials).await)
        }
        Command::Logout => exit_code(accounts(config, client).logout().await),
        Command::Register {
            username,
            email,
            password,
            confirm_password,
            role,
        } => {
            let registration = Registration {
                username,
                email,
                password,
                confirm_password,
                role,
            };
            exit_code(accounts(config, client).register(&registration).await)
        }
        Command::ResetRequest { email } => {
            exit_code(accounts(config, client).request_password_reset(&email).await)
        }
        Command::ResetPassword { token, password } => {
            exit_code(accounts(config, client).reset_password(&token, &password).await)
        }
        Command::Profile {
            username,
            email,
            password,
        } => {
            let update = ProfileUpdate {
                username,
                email,
                password,
            };
            exit_code(accounts(config, client).update_profile(&update).await)
        }

        Command::Search { query, rich } => {
            let view = MemoryResults::new();
            let query = SearchQuery::new(query);
            let outcome = if rich {
                QueryCycle::new(client, routes::SEARCH, InventoryCardTemplate)
                    .with_locale(config.locale)
                    .with_network_failures(config.network_failures)
                    .run(query.to_params(), &view, &StatusLine)
                    .await
            } else {
                SearchPanel::new(client, config.locale, config.network_failures)
                    .search(&query, &view, &StatusLine)
                    .await
            };
            cycle_exit(&outcome, &view)
        }
        Command::Filter {
            material,
            product_name,
            location,
            page,
            per_page,
        } => {
            let view = MemoryResults::new();
            let filter = InventoryFilter {
                material,
                product_name,
                location,
                page,
                per_page,
            };
            let outcome = SearchPanel::new(client, config.locale, config.network_failures)
                .filter(&filter, &view, &StatusLine)
                .await;
            cycle_exit(&outcome, &view)
        }

        Command::Dashboard { once: true } => {
            stockguard_client::dashboard::refresh_once(&client, &SummaryLine)
                .await
                .context("failed to fetch dashboard data")?;
            ExitCode::SUCCESS
        }
        Command::Dashboard { once: false } => {
            let handle = DashboardRefresher::with_interval(client, config.refresh_interval)
                .start(Arc::new(SummaryLine));
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;
            handle.stop().await;
            ExitCode::SUCCESS
        }
        Command::Charts => {
            let mut code = ExitCode::SUCCESS;
            for panel in [ChartPanel::EXPIRING_SOON, ChartPanel::BELOW_THRESHOLD] {
                if let Err(e) = panel.load(&client, &BarCharts).await {
                    eprintln!("error: {}: {e}", panel.canvas_id);
                    code = ExitCode::FAILURE;
                }
            }
            code
        }

        Command::Total => {
            let total = InventoryApi::new(client)
                .total()
                .await
                .context("failed to fetch inventory total")?;
            println!("{total}");
            ExitCode::SUCCESS
        }
        Command::Material { code } => {
            let item = InventoryApi::new(client)
                .by_material(&code)
                .await
                .with_context(|| format!("failed to look up material {code}"))?;
            println!("{}", InventoryCardTemplate.card(&item, config.locale));
            ExitCode::SUCCESS
        }
        Command::Report { kind, from, to, out } => {
            let period = from.zip(to).map(|(start, end)| DateRange { start, end });
            let request = ReportRequest::new(kind, period).context("invalid report request")?;
            let bytes = InventoryApi::new(client)
                .download_report(&request)
                .await
                .context("failed to download report")?;
            let path = out.unwrap_or_else(|| kind.file_name().into());
            std::fs::write(&path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Saved {} ({} bytes)", path.display(), bytes.len());
            ExitCode::SUCCESS
        }
        Command::Notifications => {
            let feed = InventoryApi::new(client)
                .notifications()
                .await
                .context("failed to fetch notifications")?;
            if feed.is_empty() {
                println!("No notifications.");
            }
            for entry in feed {
                println!("{}", serde_json::to_string(&entry)?);
            }
            ExitCode::SUCCESS
        }
    };
    Ok(code)
}
