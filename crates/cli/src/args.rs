use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use stockguard_client::ReportKind;
use stockguard_core::Role;

#[derive(Parser, Debug)]
#[command(
    name = "stockguard",
    version,
    about = "Terminal client for the StockGuard inventory service",
    long_about = "Terminal client for the StockGuard inventory service.\n\nExamples:\n  stockguard login jdoe --password secret\n  stockguard filter --material Paint\n  stockguard dashboard --once\n\nSettings come from STOCKGUARD_* environment variables; --api-url overrides STOCKGUARD_API_URL."
)]
pub struct Cli {
    #[arg(
        long = "api-url",
        global = true,
        value_name = "URL",
        help = "Backend base URL (overrides STOCKGUARD_API_URL)."
    )]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Revoke the session and forget it.
    Logout,
    /// Create an account.
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long = "confirm-password")]
        confirm_password: String,
        #[arg(long, default_value = "staff", help = "admin, management or staff.")]
        role: Role,
    },
    /// Free-text product search.
    Search {
        query: String,
        #[arg(long, help = "Show full inventory cards instead of names.")]
        rich: bool,
    },
    /// Filter the inventory by material, product name and location.
    Filter {
        #[arg(long, default_value = "")]
        material: String,
        #[arg(long = "product-name", default_value = "")]
        product_name: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, help = "Page number, starting at 1.")]
        page: Option<u32>,
        #[arg(long = "per-page", help = "Rows per page.")]
        per_page: Option<u32>,
    },
    /// Show the dashboard summary, refreshing until Ctrl-C.
    Dashboard {
        #[arg(long, help = "Fetch once and exit.")]
        once: bool,
    },
    /// Draw the expiring-soon and below-threshold panels.
    Charts,
    /// Print the number of inventory rows.
    Total,
    /// Look up one item by material code.
    Material { code: String },
    /// Download a spreadsheet report.
    Report {
        #[arg(
            help = "expiring_soon, below_threshold, inventory_levels, user_activity or inventory_taken."
        )]
        kind: ReportKind,
        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            requires = "to",
            help = "First day (inventory_taken)."
        )]
        from: Option<NaiveDate>,
        #[arg(
            long,
            value_name = "YYYY-MM-DD",
            requires = "from",
            help = "Last day (inventory_taken)."
        )]
        to: Option<NaiveDate>,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the notification feed.
    Notifications,
    /// Ask for a password reset link.
    ResetRequest { email: String },
    /// Set a new password with a reset token.
    ResetPassword {
        token: String,
        #[arg(long)]
        password: String,
    },
    /// Update the signed-in user's profile.
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}
