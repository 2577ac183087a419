//! View Router
//!
//! Maps the closed set of URL paths to route ids, keeps the current route
//! in sync with a history backend and applies the auth guard.
//!
//! Unknown paths resolve to the dashboard. The guard never redirects more
//! than once: the only redirect target is the dashboard, which is not
//! guarded for signed-in users.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteId {
    Login,
    Register,
    Dashboard,
    Orders,
    Products,
    Customers,
    Analytics,
    Ai,
    Settings,
}

impl RouteId {
    pub const ALL: [RouteId; 9] = [
        RouteId::Login,
        RouteId::Register,
        RouteId::Dashboard,
        RouteId::Orders,
        RouteId::Products,
        RouteId::Customers,
        RouteId::Analytics,
        RouteId::Ai,
        RouteId::Settings,
    ];

    /// Sidebar entries, in display order
    pub const NAV: [RouteId; 7] = [
        RouteId::Dashboard,
        RouteId::Orders,
        RouteId::Products,
        RouteId::Customers,
        RouteId::Analytics,
        RouteId::Ai,
        RouteId::Settings,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RouteId::Login => "login",
            RouteId::Register => "register",
            RouteId::Dashboard => "dashboard",
            RouteId::Orders => "orders",
            RouteId::Products => "products",
            RouteId::Customers => "customers",
            RouteId::Analytics => "analytics",
            RouteId::Ai => "ai",
            RouteId::Settings => "settings",
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (RouteId::Login, Locale::ZhCn) => "登录",
            (RouteId::Register, Locale::ZhCn) => "注册",
            (RouteId::Dashboard, Locale::ZhCn) => "仪表盘",
            (RouteId::Orders, Locale::ZhCn) => "订单管理",
            (RouteId::Products, Locale::ZhCn) => "产品管理",
            (RouteId::Customers, Locale::ZhCn) => "客户管理",
            (RouteId::Analytics, Locale::ZhCn) => "数据分析",
            (RouteId::Ai, Locale::ZhCn) => "AI 助手",
            (RouteId::Settings, Locale::ZhCn) => "系统设置",
            (RouteId::Login, Locale::En) => "Sign in",
            (RouteId::Register, Locale::En) => "Sign up",
            (RouteId::Dashboard, Locale::En) => "Dashboard",
            (RouteId::Orders, Locale::En) => "Orders",
            (RouteId::Products, Locale::En) => "Products",
            (RouteId::Customers, Locale::En) => "Customers",
            (RouteId::Analytics, Locale::En) => "Analytics",
            (RouteId::Ai, Locale::En) => "AI Assistant",
            (RouteId::Settings, Locale::En) => "Settings",
        }
    }

    /// Reachable without signing in
    pub fn is_public(&self) -> bool {
        matches!(self, RouteId::Login | RouteId::Register)
    }
}

/// Exact path match; anything else is the dashboard
pub fn route_for(path: &str) -> RouteId {
    match path {
        "/login" => RouteId::Login,
        "/register" => RouteId::Register,
        "/orders" => RouteId::Orders,
        "/products" => RouteId::Products,
        "/customers" => RouteId::Customers,
        "/analytics" => RouteId::Analytics,
        "/ai" => RouteId::Ai,
        "/settings" => RouteId::Settings,
        _ => RouteId::Dashboard,
    }
}

pub fn path_for(route: RouteId) -> String {
    match route {
        RouteId::Dashboard => "/".to_string(),
        other => format!("/{}", other.id()),
    }
}

/// What to show for a requested route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub view: RouteId,
    /// Route to navigate to (pushing history) before rendering
    pub redirect: Option<RouteId>,
}

/// Apply the auth guard to a requested route
pub fn resolve_route(requested: RouteId, authenticated: bool) -> Resolution {
    match (authenticated, requested) {
        (false, RouteId::Register) => Resolution {
            view: RouteId::Register,
            redirect: None,
        },
        (false, _) => Resolution {
            view: RouteId::Login,
            redirect: None,
        },
        (true, RouteId::Login | RouteId::Register) => Resolution {
            view: RouteId::Dashboard,
            redirect: Some(RouteId::Dashboard),
        },
        (true, route) => Resolution {
            view: route,
            redirect: None,
        },
    }
}

pub fn resolve_path(path: &str, authenticated: bool) -> Resolution {
    resolve_route(route_for(path), authenticated)
}

// ============================================
// History
// ============================================

/// Session history the router reads from and pushes to
pub trait HistoryBackend {
    fn current_path(&self) -> String;
    fn push(&mut self, path: &str);
}

/// In-memory history stack with back/forward
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial_path: &str) -> Self {
        Self {
            entries: vec![initial_path.to_string()],
            index: 0,
        }
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryBackend for MemoryHistory {
    fn current_path(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path.to_string());
        self.index = self.entries.len() - 1;
    }
}

/// Whoever knows whether a user is signed in
pub trait AuthContext {
    fn is_authenticated(&self) -> bool;
}

impl AuthContext for bool {
    fn is_authenticated(&self) -> bool {
        *self
    }
}

// ============================================
// Router
// ============================================

#[derive(Debug, Clone)]
pub struct Router<H: HistoryBackend> {
    history: H,
    current: RouteId,
}

impl<H: HistoryBackend> Router<H> {
    /// Derive the initial route from the backend's current path
    pub fn new(history: H) -> Self {
        let current = route_for(&history.current_path());
        Self { history, current }
    }

    pub fn current(&self) -> RouteId {
        self.current
    }

    /// Push the route's path and make it current
    pub fn navigate(&mut self, route: RouteId) {
        let path = path_for(route);
        tracing::debug!(route = route.id(), path = %path, "navigate");
        self.history.push(&path);
        self.current = route;
    }

    /// Re-derive the route after a back/forward traversal
    pub fn sync_from_history(&mut self) -> RouteId {
        self.current = route_for(&self.history.current_path());
        self.current
    }

    /// The view to render for the current route. A signed-in user on a
    /// login/register route is navigated to the dashboard first.
    pub fn resolve(&mut self, auth: &impl AuthContext) -> RouteId {
        let resolution = resolve_route(self.current, auth.is_authenticated());
        if let Some(target) = resolution.redirect {
            self.navigate(target);
        }
        resolution.view
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for_known_paths() {
        assert_eq!(route_for("/"), RouteId::Dashboard);
        assert_eq!(route_for("/orders"), RouteId::Orders);
        assert_eq!(route_for("/ai"), RouteId::Ai);
        assert_eq!(route_for("/login"), RouteId::Login);
    }

    #[test]
    fn test_unknown_path_is_dashboard() {
        assert_eq!(route_for("/nope"), RouteId::Dashboard);
        assert_eq!(route_for("/orders/"), RouteId::Dashboard);
        assert_eq!(route_for(""), RouteId::Dashboard);
    }

    #[test]
    fn test_path_round_trip() {
        for route in RouteId::ALL {
            assert_eq!(route_for(&path_for(route)), route);
        }
        assert_eq!(path_for(RouteId::Dashboard), "/");
        assert_eq!(path_for(RouteId::Settings), "/settings");
    }

    #[test]
    fn test_guard_unauthenticated() {
        assert_eq!(resolve_path("/orders", false).view, RouteId::Login);
        assert_eq!(resolve_path("/register", false).view, RouteId::Register);
        assert_eq!(resolve_path("/login", false).redirect, None);
    }

    #[test]
    fn test_guard_authenticated() {
        let resolution = resolve_path("/login", true);
        assert_eq!(resolution.view, RouteId::Dashboard);
        assert_eq!(resolution.redirect, Some(RouteId::Dashboard));
        assert_eq!(resolve_path("/orders", true).redirect, None);
    }

    #[test]
    fn test_redirect_is_one_hop() {
        for route in RouteId::ALL {
            let first = resolve_route(route, true);
            if let Some(target) = first.redirect {
                assert_eq!(resolve_route(target, true).redirect, None);
            }
        }
    }

    #[test]
    fn test_navigate_pushes_history() {
        let mut router = Router::new(MemoryHistory::new("/"));
        router.navigate(RouteId::Orders);
        router.navigate(RouteId::Products);

        assert_eq!(router.current(), RouteId::Products);
        assert_eq!(router.history().current_path(), "/products");
        assert_eq!(router.history().len(), 3);
    }

    #[test]
    fn test_back_and_forward_rederive_route() {
        let mut router = Router::new(MemoryHistory::new("/"));
        router.navigate(RouteId::Orders);
        router.navigate(RouteId::Customers);

        assert!(router.history_mut().back());
        assert_eq!(router.sync_from_history(), RouteId::Orders);
        assert!(router.history_mut().back());
        assert_eq!(router.sync_from_history(), RouteId::Dashboard);
        assert!(router.history_mut().forward());
        assert_eq!(router.sync_from_history(), RouteId::Orders);
    }

    #[test]
    fn test_navigate_is_idempotent_on_state() {
        let mut router = Router::new(MemoryHistory::new("/"));
        router.navigate(RouteId::Analytics);
        let once = router.current();
        router.navigate(RouteId::Analytics);
        assert_eq!(router.current(), once);
    }

    #[test]
    fn test_signed_in_user_leaves_login() {
        let mut router = Router::new(MemoryHistory::new("/login"));
        assert_eq!(router.resolve(&true), RouteId::Dashboard);
        assert_eq!(router.current(), RouteId::Dashboard);
        assert_eq!(router.history().current_path(), "/");

        // Already on the dashboard: no further navigation
        let len = router.history().len();
        assert_eq!(router.resolve(&true), RouteId::Dashboard);
        assert_eq!(router.history().len(), len);
    }

    #[test]
    fn test_signed_out_user_sees_login() {
        let mut router = Router::new(MemoryHistory::new("/settings"));
        assert_eq!(router.resolve(&false), RouteId::Login);
        assert_eq!(router.current(), RouteId::Settings);
    }
}
