//! Global Application State
//!
//! Reactive state management using Leptos signals. The session, router
//! and authorized gateway live here and are handed to pages explicitly.

use leptos::*;
use shopdesk::router::Router;
use shopdesk::{AuthState, Gateway, Locale, Message, RouteId, Session, SessionResult};
use shopdesk::gateway::SignUpOutcome;

use crate::api::{BrowserHistory, LocalTokenStore};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Display locale
    pub locale: RwSignal<Locale>,
    /// Sign-in state
    pub auth: RwSignal<AuthState>,
    /// Gateway authorized as the current user
    pub gateway: RwSignal<Gateway>,
    /// View to render after the auth guard
    pub route: RwSignal<RouteId>,
    /// Stored session has been checked
    pub ready: RwSignal<bool>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    anonymous: StoredValue<Gateway>,
    router: StoredValue<Router<BrowserHistory>>,
}

/// Provide global state to the component tree
pub fn provide_global_state(gateway: Gateway) -> GlobalState {
    let router = Router::new(BrowserHistory);
    let state = GlobalState {
        locale: create_rw_signal(Locale::default()),
        auth: create_rw_signal(AuthState::Unauthenticated),
        gateway: create_rw_signal(gateway.clone()),
        route: create_rw_signal(router.current()),
        ready: create_rw_signal(false),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
        anonymous: store_value(gateway),
        router: store_value(router),
    };

    provide_context(state);
    state
}

impl GlobalState {
    pub fn text(&self, message: Message) -> String {
        self.locale.get_untracked().text(&message)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth.get_untracked(), AuthState::Authenticated { .. })
    }

    pub fn user_id(&self) -> Option<String> {
        match self.auth.get_untracked() {
            AuthState::Authenticated { user, .. } => Some(user.id),
            AuthState::Unauthenticated => None,
        }
    }

    // ============================================
    // Routing
    // ============================================

    /// Push the route to history and render it
    pub fn navigate(&self, route: RouteId) {
        self.router.update_value(|router| router.navigate(route));
        self.resolve_route();
    }

    /// Pick up a back/forward traversal
    pub fn sync_from_history(&self) {
        self.router.update_value(|router| {
            router.sync_from_history();
        });
        self.resolve_route();
    }

    fn resolve_route(&self) {
        let authenticated = self.is_authenticated();
        if let Some(view) = self
            .router
            .try_update_value(|router| router.resolve(&authenticated))
        {
            self.route.set(view);
        }
    }

    // ============================================
    // Session
    // ============================================

    fn session(&self) -> Session<LocalTokenStore> {
        Session::new(self.anonymous.get_value(), LocalTokenStore)
    }

    fn adopt(&self, session: &Session<LocalTokenStore>) {
        self.auth.set(session.state().clone());
        self.gateway.set(session.gateway().clone());
        self.resolve_route();
    }

    /// Restore a stored sign-in, then render the first route
    pub async fn init_session(self) {
        let mut session = self.session();
        if let Err(e) = session.init().await {
            tracing::warn!(error = %e, "Failed to restore session");
        }
        self.adopt(&session);
        self.ready.set(true);
    }

    pub async fn sign_in(self, email: String, password: String) -> SessionResult<()> {
        let mut session = self.session();
        session.sign_in(&email, &password).await?;
        self.adopt(&session);
        Ok(())
    }

    pub async fn sign_up(self, email: String, password: String) -> SessionResult<SignUpOutcome> {
        let mut session = self.session();
        let outcome = session.sign_up(&email, &password).await?;
        self.adopt(&session);
        Ok(outcome)
    }

    /// Forget the user and return to the login view
    pub async fn sign_out(self) {
        let mut session = match self.auth.get_untracked() {
            AuthState::Authenticated { user, token } => {
                Session::restored(self.anonymous.get_value(), LocalTokenStore, user, token)
            }
            AuthState::Unauthenticated => self.session(),
        };
        if let Err(e) = session.sign_out().await {
            tracing::warn!(error = %e, "Sign-out incomplete");
        }
        self.adopt(&session);
        self.navigate(RouteId::Login);
    }

    // ============================================
    // Notifications
    // ============================================

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }
}
