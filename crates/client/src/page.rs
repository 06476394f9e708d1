//! Element ids of the dashboard and account pages, and timer conversions for
//! the browser event loop.

use std::time::Duration;

/// Where each input, button and container lives in the page markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub search_input: &'static str,
    pub search_button: &'static str,
    pub results: &'static str,
    pub filter_material: &'static str,
    pub filter_product_name: &'static str,
    pub filter_location: &'static str,
    pub filter_button: &'static str,
    pub login_form: &'static str,
    pub username: &'static str,
    pub password: &'static str,
    pub logout_button: &'static str,
    pub register_form: &'static str,
    pub reg_username: &'static str,
    pub reg_email: &'static str,
    pub reg_password: &'static str,
    pub reg_confirm_password: &'static str,
    pub reg_role: &'static str,
    /// Flash banner element.
    pub flash: &'static str,
    /// Summary fields, in [`DashboardSummary::labels`] order.
    ///
    /// [`DashboardSummary::labels`]: stockguard_core::DashboardSummary::labels
    pub summary_selectors: [&'static str; 4],
}

impl PageLayout {
    pub const STANDARD: PageLayout = PageLayout {
        search_input: "searchInput",
        search_button: "searchButton",
        results: "searchResults",
        filter_material: "filterMaterial",
        filter_product_name: "filterProductName",
        filter_location: "filterLocation",
        filter_button: "filterButton",
        login_form: "loginForm",
        username: "username",
        password: "password",
        logout_button: "logoutButton",
        register_form: "registerForm",
        reg_username: "reg_username",
        reg_email: "reg_email",
        reg_password: "reg_password",
        reg_confirm_password: "reg_confirm_password",
        reg_role: "reg_role",
        flash: "flash",
        summary_selectors: [".total-items", ".pending-tasks", ".new-reports", ".items-to-delete"],
    };
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// `setInterval`/`setTimeout` delay for `period`: at least 1 ms, at most `i32::MAX`.
pub fn timer_millis(period: Duration) -> i32 {
    i32::try_from(period.as_millis()).unwrap_or(i32::MAX).max(1)
}
