//! Page navigation targets.

use std::sync::Mutex;

/// Pages the client can send the user to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Dashboard,
    Inventory,
    AddInventory,
    UpdateInventory,
    DeleteInventory,
    InventoryLevelsReport,
    InventoryTakenReport,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Login,
        Page::Dashboard,
        Page::Inventory,
        Page::AddInventory,
        Page::UpdateInventory,
        Page::DeleteInventory,
        Page::InventoryLevelsReport,
        Page::InventoryTakenReport,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Page::Login => "/login",
            Page::Dashboard => "/dashboard",
            Page::Inventory => "/inventory",
            Page::AddInventory => "/add_inventory",
            Page::UpdateInventory => "/update_inventory",
            Page::DeleteInventory => "/delete_inventory",
            Page::InventoryLevelsReport => "/report/inventory_levels",
            Page::InventoryTakenReport => "/report/inventory_taken",
        }
    }

    pub fn from_path(path: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.path() == path)
    }
}

impl core::fmt::Display for Page {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the user to another page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, page: Page);
}

/// Records navigation instead of performing it.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    visited: Mutex<Vec<Page>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<Page> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn current(&self) -> Option<Page> {
        self.visited().last().copied()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, page: Page) {
        tracing::info!(page = page.path(), "navigate");
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_roundtrip() {
        for page in Page::ALL {
            assert_eq!(Page::from_path(page.path()), Some(page));
        }
        assert_eq!(Page::from_path("/nowhere"), None);
    }

    #[test]
    fn history_records_in_order() {
        let nav = HistoryNavigator::new();
        assert_eq!(nav.current(), None);
        nav.navigate(Page::Dashboard);
        nav.navigate(Page::Login);
        assert_eq!(nav.visited(), vec![Page::Dashboard, Page::Login]);
        assert_eq!(nav.current(), Some(Page::Login));
    }
}
