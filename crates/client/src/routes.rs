//! Endpoint descriptors for the backend routes this client consumes.
//!
//! One canonical route set: the `/auth/*` JSON routes and `/inventory` for
//! filtering.

/// HTTP method of an endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    pub(crate) fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

/// Whether the session token is attached.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Never attach credentials.
    None,
    /// Attach `Authorization: Bearer <token>` when the session holds a token.
    OptionalBearer,
}

/// A backend route: method, path template and auth mode.
///
/// Path templates may contain `{name}` segments, filled by [`Endpoint::resolve`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
    pub auth: Auth,
}

impl Endpoint {
    pub const fn new(method: Method, path: &'static str, auth: Auth) -> Self {
        Self { method, path, auth }
    }

    /// Fill `{name}` segments of the path template.
    ///
    /// Values are percent-encoded as single segments; unknown names are left
    /// in place.
    pub fn resolve(&self, segments: &[(&str, &str)]) -> String {
        let mut path = self.path.to_string();
        for (name, value) in segments {
            path = path.replace(&format!("{{{name}}}"), &urlencoding::encode(value));
        }
        path
    }
}

pub const SEARCH: Endpoint = Endpoint::new(Method::Get, "/search", Auth::None);
pub const INVENTORY: Endpoint = Endpoint::new(Method::Get, "/inventory", Auth::OptionalBearer);
pub const EXPIRING_SOON: Endpoint =
    Endpoint::new(Method::Get, "/inventory/expiring_soon", Auth::OptionalBearer);
pub const BELOW_THRESHOLD: Endpoint =
    Endpoint::new(Method::Get, "/inventory/below_threshold", Auth::None);
pub const INVENTORY_TOTAL: Endpoint =
    Endpoint::new(Method::Get, "/inventory/total", Auth::OptionalBearer);
pub const INVENTORY_BY_MATERIAL: Endpoint =
    Endpoint::new(Method::Post, "/get_inventory_by_material", Auth::OptionalBearer);
pub const REPORT_INVENTORY_LEVELS: Endpoint =
    Endpoint::new(Method::Get, "/report/inventory_levels", Auth::OptionalBearer);
pub const REPORT_INVENTORY_TAKEN: Endpoint =
    Endpoint::new(Method::Post, "/report/inventory_taken", Auth::OptionalBearer);
pub const REPORT_USER_ACTIVITY: Endpoint =
    Endpoint::new(Method::Get, "/report/user_activity", Auth::None);
pub const DASHBOARD_DATA: Endpoint = Endpoint::new(Method::Get, "/dashboard_data", Auth::None);
pub const NOTIFICATIONS: Endpoint = Endpoint::new(Method::Get, "/notifications", Auth::None);

pub const LOGIN: Endpoint = Endpoint::new(Method::Post, "/auth/login", Auth::None);
pub const REGISTER: Endpoint = Endpoint::new(Method::Post, "/auth/register", Auth::None);
pub const LOGOUT: Endpoint = Endpoint::new(Method::Post, "/auth/logout", Auth::OptionalBearer);
pub const REQUEST_PASSWORD_RESET: Endpoint =
    Endpoint::new(Method::Post, "/auth/request_password_reset", Auth::None);
pub const RESET_PASSWORD: Endpoint =
    Endpoint::new(Method::Post, "/auth/reset_password/{token}", Auth::None);
pub const UPDATE_PROFILE: Endpoint =
    Endpoint::new(Method::Put, "/auth/update_profile", Auth::OptionalBearer);
