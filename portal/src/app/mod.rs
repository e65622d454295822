//! # Application Wiring
//!
//! Composition of the flow services, the shared state, and the event
//! channel between spawned work and the single event consumer.

pub mod event_handler;
pub mod events;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use async_channel::{Receiver, Sender};
use lib_identity::{GoogleSignIn, IdentityClient};
use lib_store::StoreClient;
use parking_lot::RwLock;

use crate::auth::{CredentialSubmitter, ProfileWriter};
use crate::config::AppConfig;
use crate::core::service::{ClubsApi, IdentityService, ProfileStore};
use crate::services::{ApiClient, Catalogue, MembershipSync};
use crate::session::{SessionObserver, Subscription};

pub use events::AppEvent;
pub use state::AppState;

/// The flow services handlers spawn work on.
pub struct Services {
    pub observer: SessionObserver,
    pub identity: Arc<dyn IdentityService>,
    pub submitter: CredentialSubmitter,
    pub membership: MembershipSync,
    pub catalogue: Catalogue,
    pub google: Option<Arc<GoogleSignIn>>,
}

impl Services {
    /// Wire the real clients from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let observer = SessionObserver::new();
        let identity: Arc<dyn IdentityService> =
            Arc::new(IdentityClient::new(config.identity.clone()));
        let store = Arc::new(StoreClient::new(config.store.clone()));
        let api: Arc<dyn ClubsApi> = Arc::new(ApiClient::new(config.api_url.clone()));

        let submitter = CredentialSubmitter::new(
            Arc::clone(&identity),
            ProfileWriter::new(Arc::clone(&store) as Arc<dyn ProfileStore>),
            observer.clone(),
        );
        let membership = MembershipSync::new(api, Arc::clone(&identity), observer.clone());
        let catalogue = Catalogue::new(store);
        let google = config.google_sign_in().map(Arc::new);

        Self {
            observer,
            identity,
            submitter,
            membership,
            catalogue,
            google,
        }
    }
}

/// Headless application shell: shared state, the event channel, and the
/// session subscription that keeps [`AppState::session`] current.
pub struct App {
    pub state: Arc<RwLock<AppState>>,
    pub services: Arc<Services>,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    _session_subscription: Subscription,
}

impl App {
    pub fn new(services: Arc<Services>) -> Self {
        let (event_tx, event_rx) = async_channel::unbounded();
        let state = Arc::new(RwLock::new(AppState::default()));

        // Session transitions become events like any other async result;
        // the subscription's immediate fire seeds the initial state
        let tx = event_tx.clone();
        let session_subscription = services
            .observer
            .subscribe(move |session| {
                let _ = tx.try_send(AppEvent::SessionChanged(session));
            });

        Self {
            state,
            services,
            event_tx,
            event_rx,
            _session_subscription: session_subscription,
        }
    }

    /// Wait for the next async result.
    pub async fn next_event(&self) -> Option<AppEvent> {
        self.event_rx.recv().await.ok()
    }

    /// Apply one event to the state.
    pub fn handle_event(&self, event: AppEvent) {
        event_handler::apply_event(&self.state, event);
    }

    /// Apply everything already queued without waiting.
    pub fn drain_pending(&self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    // User actions

    pub fn handle_continue_click(&self, email: String) {
        handlers::auth::handle_continue_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
            email,
        );
    }

    pub fn handle_sign_in_click(&self, email: String, password: String) {
        handlers::auth::handle_sign_in_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
            email,
            password,
        );
    }

    pub fn handle_sign_up_click(
        &self,
        email: String,
        password: String,
        confirm_password: String,
        display_name: Option<String>,
        notify_on_new_post: bool,
    ) {
        handlers::auth::handle_sign_up_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
            email,
            password,
            confirm_password,
            display_name,
            notify_on_new_post,
        );
    }

    pub fn handle_google_click(&self) {
        handlers::auth::handle_google_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
        );
    }

    pub fn handle_reset_click(&self, email: String) {
        handlers::auth::handle_reset_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
            email,
        );
    }

    pub fn handle_back_click(&self) {
        handlers::auth::handle_back_click(Arc::clone(&self.state));
    }

    pub fn handle_sign_out_click(&self) {
        handlers::auth::handle_sign_out_click(Arc::clone(&self.services));
    }

    pub fn handle_join_click(&self, club_id: String) {
        handlers::membership::handle_join_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
            club_id,
        );
    }

    pub fn handle_leave_click(&self, club_id: String) {
        handlers::membership::handle_leave_click(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
            club_id,
        );
    }

    pub fn load_joined_clubs(&self) {
        handlers::membership::load_joined_clubs(
            Arc::clone(&self.state),
            self.event_tx.clone(),
            Arc::clone(&self.services),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mocks::{tokens_for, MockClubsApi, MockIdentity, MockProfileStore};
    use crate::session::Session;
    use lib_store::StoreConfig;

    fn test_services(identity: MockIdentity, api: MockClubsApi) -> (Arc<Services>, Arc<MockClubsApi>, Arc<MockIdentity>) {
        let observer = SessionObserver::new();
        let identity = Arc::new(identity);
        let api = Arc::new(api);
        let store = Arc::new(MockProfileStore::new());

        let submitter = CredentialSubmitter::new(
            Arc::clone(&identity) as Arc<dyn IdentityService>,
            ProfileWriter::new(store as Arc<dyn ProfileStore>),
            observer.clone(),
        );
        let membership = MembershipSync::new(
            Arc::clone(&api) as Arc<dyn ClubsApi>,
            Arc::clone(&identity) as Arc<dyn IdentityService>,
            observer.clone(),
        );
        // Catalogue is unused by these tests; point it at a dummy store
        let catalogue = Catalogue::new(Arc::new(StoreClient::new(StoreConfig::new("test"))));

        let services = Arc::new(Services {
            observer,
            identity: Arc::clone(&identity) as Arc<dyn IdentityService>,
            submitter,
            membership,
            catalogue,
            google: None,
        });
        (services, api, identity)
    }

    fn sign_in(services: &Services) {
        services
            .observer
            .publish(Session::from_tokens(&tokens_for("slug@ucsc.edu")))
            .unwrap();
    }

    async fn next_result_event(app: &App) -> AppEvent {
        loop {
            let event = app.next_event().await.expect("event channel closed");
            match event {
                AppEvent::SessionChanged(_) => app.handle_event(event),
                other => return other,
            }
        }
    }

    #[tokio::test]
    async fn test_failed_join_rolls_back_optimistic_add() {
        let (services, _api, _identity) =
            test_services(MockIdentity::new(), MockClubsApi::new().with_failure("server error"));
        sign_in(&services);
        let app = App::new(services);
        app.drain_pending();

        app.handle_join_click("club123".to_string());
        assert!(app.state.read().my_clubs.contains("club123"));

        let event = next_result_event(&app).await;
        app.handle_event(event);

        let mut state = app.state.write();
        assert!(!state.my_clubs.contains("club123"));
        assert_eq!(state.take_error().as_deref(), Some("Membership update failed: server error"));
        assert!(!state.membership_busy());
    }

    #[tokio::test]
    async fn test_successful_join_keeps_optimistic_state() {
        let (services, api, _identity) = test_services(MockIdentity::new(), MockClubsApi::new());
        sign_in(&services);
        let app = App::new(services);
        app.drain_pending();

        app.handle_join_click("club123".to_string());
        let event = next_result_event(&app).await;
        app.handle_event(event);

        let state = app.state.read();
        assert!(state.my_clubs.contains("club123"));
        assert_eq!(api.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_double_click_sends_one_request() {
        let (services, api, _identity) = test_services(MockIdentity::new(), MockClubsApi::new());
        sign_in(&services);
        let app = App::new(services);
        app.drain_pending();

        app.handle_join_click("club123".to_string());
        app.handle_join_click("club123".to_string());

        let event = next_result_event(&app).await;
        app.handle_event(event);

        assert_eq!(api.calls.lock().len(), 1);
        assert!(app.event_rx.is_empty());
    }

    #[tokio::test]
    async fn test_join_without_session_is_rejected_locally() {
        let (services, api, _identity) = test_services(MockIdentity::new(), MockClubsApi::new());
        let app = App::new(services);
        app.drain_pending();

        app.handle_join_click("club123".to_string());

        let mut state = app.state.write();
        assert!(state.take_error().is_some());
        assert!(!state.my_clubs.contains("club123"));
        assert!(api.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_continue_click_is_busy_gated() {
        let (services, _api, identity) = test_services(MockIdentity::new(), MockClubsApi::new());
        let app = App::new(services);
        app.drain_pending();

        app.handle_continue_click("student@ucsc.edu".to_string());
        app.handle_continue_click("student@ucsc.edu".to_string());

        let event = next_result_event(&app).await;
        app.handle_event(event);

        assert_eq!(identity.method_lookups(), 1);
        assert_eq!(
            app.state.read().auth.state,
            crate::auth::ClassifierState::SignUp
        );
        assert!(!app.state.read().auth_busy);
    }

    #[tokio::test]
    async fn test_sign_out_clears_membership_state() {
        let (services, _api, _identity) = test_services(MockIdentity::new(), MockClubsApi::new());
        sign_in(&services);
        let app = App::new(Arc::clone(&services));
        app.drain_pending();

        app.handle_join_click("club123".to_string());
        let event = next_result_event(&app).await;
        app.handle_event(event);
        assert!(app.state.read().my_clubs.contains("club123"));

        app.handle_sign_out_click();
        app.drain_pending();

        let state = app.state.read();
        assert!(state.session.is_none());
        assert!(state.my_clubs.is_empty());
    }
}
