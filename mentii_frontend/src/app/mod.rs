use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use eframe::egui::{self, Context};
use log::{error, info};

use crate::api::ApiClient;
use crate::models::{AuthResponse, Conversation};
use crate::routes::{guard, show_bottom_nav, Route};
use crate::session::Session;
use crate::theme;

pub mod messages;
pub mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use state::{RetryAction, ViewState, WriteToken};
use ui::ScreenAction;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

pub struct MentiiApp {
    api: ApiClient,
    session: Session,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    view: ViewState,
    in_flight: usize,
    last_write: WriteToken,
}

impl MentiiApp {
    pub fn new(cc: &eframe::CreationContext<'_>, api: ApiClient, session: Session) -> Self {
        theme::apply(&cc.egui_ctx);
        Self::with_client(api, session)
    }

    /// Builds the app without a window; the session decides the initial auth state.
    pub fn with_client(api: ApiClient, session: Session) -> Self {
        let (tx, rx) = mpsc::channel();
        info!(
            "starting on welcome screen ({})",
            if session.is_authenticated() {
                "restored session"
            } else {
                "anonymous"
            }
        );
        Self {
            api,
            session,
            tx,
            rx,
            view: ViewState::Welcome,
            in_flight: 0,
            last_write: 0,
        }
    }

    pub fn route(&self) -> Route {
        self.view.route()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Number of requests whose completion has not been processed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Mounts `requested`, or the login screen when the guard refuses it.
    pub fn navigate(&mut self, requested: Route) {
        let route = guard(requested, self.session.auth_state());
        if route != requested {
            info!("{requested} requires a session, redirecting to {route}");
        }
        self.view = ViewState::for_route(route, self.session.user());
        self.on_mount();
    }

    pub fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        messages::handle_message(self, message);
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.session.clear_session() {
            error!("failed to clear persisted session: {err}");
        }
        info!("signed out");
        self.navigate(Route::Welcome);
    }

    fn establish_session(&mut self, auth: AuthResponse) {
        if let Err(err) = self.session.set_session(auth.access_token, auth.user) {
            error!("failed to persist session: {err}");
        }
        info!("signed in");
        self.navigate(Route::Feed);
    }

    fn on_mount(&mut self) {
        match self.view.route() {
            Route::Feed => self.load_posts(),
            Route::Communities => self.load_communities(),
            Route::CommunityDetail(_) => self.load_community(),
            Route::Chat => self.load_conversations(),
            Route::Resources => self.load_resources(),
            Route::Profile => self.load_profile(),
            _ => {}
        }
    }

    fn track(&mut self) -> (ApiClient, Sender<AppMessage>) {
        self.in_flight += 1;
        (self.api.clone(), self.tx.clone())
    }

    fn submit_login(&mut self) {
        let ViewState::Login(state) = &mut self.view else {
            return;
        };
        let Some((email, password)) = state.begin_submit() else {
            return;
        };
        let (client, tx) = self.track();
        tasks::login(client, tx, email, password);
    }

    fn submit_signup(&mut self) {
        let ViewState::SignUp(state) = &mut self.view else {
            return;
        };
        let Some(request) = state.begin_submit() else {
            return;
        };
        let (client, tx) = self.track();
        tasks::signup(client, tx, request);
    }

    fn load_posts(&mut self) {
        let ViewState::Feed(state) = &mut self.view else {
            return;
        };
        state.load = state::LoadState::Loading;
        let subject = state.subject_query();
        let (client, tx) = self.track();
        tasks::load_posts(client, tx, subject);
    }

    fn toggle_like(&mut self, post_id: i64) {
        let ViewState::Feed(state) = &mut self.view else {
            return;
        };
        state.banner = None;
        if !state.toggle_like(post_id) {
            return;
        }
        self.last_write += 1;
        let token = self.last_write;
        state.pending.begin(token);
        let (client, tx) = self.track();
        tasks::like_post(client, tx, post_id, token);
    }

    fn load_communities(&mut self) {
        let ViewState::Communities(state) = &mut self.view else {
            return;
        };
        state.load = state::LoadState::Loading;
        let level = state.level_query();
        let (client, tx) = self.track();
        tasks::load_communities(client, tx, level);
    }

    fn toggle_join(&mut self, community_id: i64) {
        let token = self.last_write + 1;
        let toggled = match &mut self.view {
            ViewState::Communities(state) => {
                state.banner = None;
                let toggled = state.toggle_join(community_id);
                if toggled {
                    state.pending.begin(token);
                }
                toggled
            }
            ViewState::CommunityDetail(state) if state.community_id == community_id => {
                state.banner = None;
                let toggled = state.toggle_join();
                if toggled {
                    state.pending.begin(token);
                }
                toggled
            }
            _ => false,
        };
        if toggled {
            self.last_write = token;
            let (client, tx) = self.track();
            tasks::join_community(client, tx, community_id, token);
        }
    }

    fn load_community(&mut self) {
        let ViewState::CommunityDetail(state) = &mut self.view else {
            return;
        };
        if state.community.is_none() {
            state.load = state::LoadState::Loading;
        }
        let community_id = state.community_id;
        let (client, tx) = self.track();
        tasks::load_community(client, tx, community_id);
    }

    fn post_to_community(&mut self) {
        let ViewState::CommunityDetail(state) = &mut self.view else {
            return;
        };
        state.banner = None;
        let Some(content) = state.begin_post() else {
            return;
        };
        let community_id = state.community_id;
        let (client, tx) = self.track();
        tasks::create_community_post(client, tx, community_id, content);
    }

    fn load_conversations(&mut self) {
        let ViewState::Chat(state) = &mut self.view else {
            return;
        };
        state.load = state::LoadState::Loading;
        let (client, tx) = self.track();
        tasks::load_conversations(client, tx);
    }

    fn open_conversation(&mut self, conversation: Conversation) {
        let ViewState::Chat(state) = &mut self.view else {
            return;
        };
        let conversation_id = conversation.id;
        state.select(conversation);
        self.load_messages(conversation_id);
    }

    fn load_messages(&mut self, conversation_id: i64) {
        let (client, tx) = self.track();
        tasks::load_messages(client, tx, conversation_id);
    }

    fn send_message(&mut self) {
        let ViewState::Chat(state) = &mut self.view else {
            return;
        };
        state.banner = None;
        let Some((conversation_id, content)) = state.begin_send() else {
            return;
        };
        let (client, tx) = self.track();
        tasks::send_message(client, tx, conversation_id, content);
    }

    fn load_resources(&mut self) {
        let ViewState::Resources(state) = &mut self.view else {
            return;
        };
        state.load = state::LoadState::Loading;
        let kind = state.kind_filter;
        let subject = state.subject_query();
        let (client, tx) = self.track();
        tasks::load_resources(client, tx, kind, subject);
    }

    /// Fetches `/users/me` unless the session already cached the user.
    fn load_profile(&mut self) {
        let ViewState::Profile(state) = &mut self.view else {
            return;
        };
        if !state.needs_fetch() {
            return;
        }
        state.load = state::LoadState::Loading;
        let (client, tx) = self.track();
        tasks::load_profile(client, tx);
    }

    fn submit_post(&mut self) {
        let ViewState::CreatePost(state) = &mut self.view else {
            return;
        };
        let Some(post) = state.begin_submit() else {
            return;
        };
        let (client, tx) = self.track();
        tasks::create_post(client, tx, post);
    }

    fn pick_image(&mut self) {
        let ViewState::CreatePost(state) = &mut self.view else {
            return;
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            state.image = Some(path);
        }
    }

    fn open_resource(&self, url: &str) {
        if url.is_empty() {
            return;
        }
        if let Err(err) = open::that(url) {
            error!("failed to open resource {url}: {err}");
        }
    }

    fn retry(&mut self, action: RetryAction) {
        match action {
            RetryAction::ToggleLike(post_id) => self.toggle_like(post_id),
            RetryAction::ToggleJoin(community_id) => self.toggle_join(community_id),
        }
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::Navigate(route) => self.navigate(route),
            ScreenAction::Login => self.submit_login(),
            ScreenAction::SignUp => self.submit_signup(),
            ScreenAction::Logout => self.logout(),
            ScreenAction::ReloadPosts => self.load_posts(),
            ScreenAction::ToggleLike(post_id) => self.toggle_like(post_id),
            ScreenAction::ReloadCommunities => self.load_communities(),
            ScreenAction::ToggleJoin(community_id) => self.toggle_join(community_id),
            ScreenAction::ReloadCommunity => self.load_community(),
            ScreenAction::PostToCommunity => self.post_to_community(),
            ScreenAction::ReloadConversations => self.load_conversations(),
            ScreenAction::OpenConversation(conversation) => self.open_conversation(conversation),
            ScreenAction::ReloadMessages(conversation_id) => self.load_messages(conversation_id),
            ScreenAction::SendMessage => self.send_message(),
            ScreenAction::ReloadResources => self.load_resources(),
            ScreenAction::OpenResource(url) => self.open_resource(&url),
            ScreenAction::ReloadProfile => self.load_profile(),
            ScreenAction::SubmitPost => self.submit_post(),
            ScreenAction::PickImage => self.pick_image(),
            ScreenAction::Retry(action) => self.retry(action),
        }
    }
}

impl eframe::App for MentiiApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();

        let mut action = None;
        let current = self.route();

        if show_bottom_nav(self.session.auth_state()) {
            egui::TopBottomPanel::bottom("bottom_nav").show(ctx, |ui| {
                if let Some(route) = ui::bottom_nav::render(ui, current) {
                    action = Some(ScreenAction::Navigate(route));
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Some(screen_action) = ui::render_view(ui, &mut self.view) {
                        action = Some(screen_action);
                    }
                });
        });

        if let Some(action) = action {
            self.apply_action(action);
        }

        if self.in_flight > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::ApiError;
    use crate::models::{Community, Post, User};
    use crate::session::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
    use reqwest::StatusCode;

    // Nothing listens on the discard port, so stray background requests fail fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn app_with(storage: Arc<MemoryStorage>) -> MentiiApp {
        let session = Session::load(storage);
        let api = ApiClient::new(UNREACHABLE, session.clone()).unwrap();
        MentiiApp::with_client(api, session)
    }

    fn auth(token: &str) -> AuthResponse {
        AuthResponse {
            access_token: token.into(),
            token_type: Some("bearer".into()),
            user: User {
                id: 42,
                full_name: "Amina Njeri".into(),
                email: "amina@example.com".into(),
                ..Default::default()
            },
        }
    }

    fn rejected(detail: Option<&str>) -> ApiError {
        ApiError::Status {
            status: StatusCode::UNAUTHORIZED,
            detail: detail.map(str::to_string),
        }
    }

    fn sample_post(id: i64) -> Post {
        Post {
            id,
            author_name: "Kevin".into(),
            author_avatar: None,
            subject: "Math".into(),
            content: "Quadratics cheat sheet".into(),
            created_at: String::new(),
            likes_count: 2,
            comments_count: 0,
            liked: false,
            image_url: None,
        }
    }

    #[test]
    fn starts_on_welcome() {
        let app = app_with(Arc::new(MemoryStorage::new()));
        assert_eq!(app.route(), Route::Welcome);
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn protected_route_redirects_to_login_when_anonymous() {
        let mut app = app_with(Arc::new(MemoryStorage::new()));
        for route in [Route::Feed, Route::Profile, Route::CommunityDetail(2), Route::CreatePost] {
            app.navigate(route);
            assert_eq!(app.route(), Route::Login);
        }
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn successful_login_stores_session_and_opens_feed() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = app_with(storage.clone());
        app.navigate(Route::Login);

        app.handle_message(AppMessage::LoggedIn(Ok(auth("tok-123"))));

        assert_eq!(app.route(), Route::Feed);
        assert_eq!(app.session().token().as_deref(), Some("tok-123"));
        assert_eq!(app.session().user().map(|u| u.id), Some(42));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-123"));
        assert!(storage.contains(USER_KEY));
    }

    #[test]
    fn failed_login_shows_detail_or_default() {
        let mut app = app_with(Arc::new(MemoryStorage::new()));
        app.navigate(Route::Login);

        app.handle_message(AppMessage::LoggedIn(Err(rejected(Some("Incorrect email or password")))));
        let ViewState::Login(state) = app.view() else {
            panic!("expected login screen");
        };
        assert_eq!(state.error.as_deref(), Some("Incorrect email or password"));

        app.handle_message(AppMessage::LoggedIn(Err(rejected(None))));
        let ViewState::Login(state) = app.view() else {
            panic!("expected login screen");
        };
        assert_eq!(state.error.as_deref(), Some(state::LOGIN_FAILED));
        assert!(!app.session().is_authenticated());
    }

    #[test]
    fn signup_success_opens_feed() {
        let mut app = app_with(Arc::new(MemoryStorage::new()));
        app.navigate(Route::SignUp);
        app.handle_message(AppMessage::SignedUp(Ok(auth("fresh"))));
        assert_eq!(app.route(), Route::Feed);
        assert!(app.session().is_authenticated());
    }

    #[test]
    fn logout_clears_storage_and_returns_to_welcome() {
        let storage = Arc::new(MemoryStorage::new());
        let mut app = app_with(storage.clone());
        app.handle_message(AppMessage::LoggedIn(Ok(auth("tok"))));
        app.navigate(Route::Profile);
        assert_eq!(app.route(), Route::Profile);

        app.logout();

        assert_eq!(app.route(), Route::Welcome);
        assert!(!storage.contains(TOKEN_KEY));
        assert!(!storage.contains(USER_KEY));
        app.navigate(Route::Feed);
        assert_eq!(app.route(), Route::Login);
    }

    #[test]
    fn restored_session_reaches_protected_routes() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "persisted").unwrap();
        let mut app = app_with(storage);
        app.navigate(Route::Resources);
        assert_eq!(app.route(), Route::Resources);
        assert_eq!(app.in_flight(), 1);
    }

    #[test]
    fn empty_post_issues_no_request() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(storage);
        app.navigate(Route::CreatePost);

        app.apply_action(ScreenAction::SubmitPost);

        let ViewState::CreatePost(state) = app.view() else {
            panic!("expected create post screen");
        };
        assert_eq!(state.error.as_deref(), Some("Post content cannot be empty"));
        assert_eq!(app.in_flight(), 0);
    }

    #[test]
    fn like_flips_before_confirmation_and_reverts_on_failure() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(storage);
        app.navigate(Route::Feed);
        app.handle_message(AppMessage::PostsLoaded {
            subject: None,
            result: Ok(vec![sample_post(1)]),
        });

        app.apply_action(ScreenAction::ToggleLike(1));
        let ViewState::Feed(state) = app.view() else {
            panic!("expected feed");
        };
        assert!(state.posts[0].liked);
        assert_eq!(state.posts[0].likes_count, 3);

        let token = app.last_write;
        app.handle_message(AppMessage::LikeToggled {
            post_id: 1,
            token,
            result: Err(rejected(None)),
        });
        let ViewState::Feed(state) = app.view() else {
            panic!("expected feed");
        };
        assert!(!state.posts[0].liked);
        assert_eq!(state.posts[0].likes_count, 2);
        assert_eq!(
            state.banner.as_ref().and_then(|b| b.retry.clone()),
            Some(RetryAction::ToggleLike(1))
        );
    }

    #[test]
    fn like_failure_from_an_earlier_visit_leaves_reloaded_feed_alone() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(storage);
        app.navigate(Route::Feed);
        app.handle_message(AppMessage::PostsLoaded {
            subject: None,
            result: Ok(vec![sample_post(1)]),
        });
        app.apply_action(ScreenAction::ToggleLike(1));
        let token = app.last_write;

        app.navigate(Route::Chat);
        app.navigate(Route::Feed);
        app.handle_message(AppMessage::PostsLoaded {
            subject: None,
            result: Ok(vec![sample_post(1)]),
        });
        app.handle_message(AppMessage::LikeToggled {
            post_id: 1,
            token,
            result: Err(rejected(None)),
        });

        let ViewState::Feed(state) = app.view() else {
            panic!("expected feed");
        };
        assert!(!state.posts[0].liked);
        assert_eq!(state.posts[0].likes_count, 2);
        assert_eq!(state.banner, None);
    }

    #[test]
    fn join_failure_for_replaced_communities_is_dropped() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(storage);
        let listing = || {
            vec![Community {
                id: 5,
                name: "Calculus Club".into(),
                subject: "Math".into(),
                description: String::new(),
                members_count: 10,
                icon: String::new(),
                joined: false,
            }]
        };
        app.navigate(Route::Communities);
        app.handle_message(AppMessage::CommunitiesLoaded {
            level: None,
            result: Ok(listing()),
        });
        app.apply_action(ScreenAction::ToggleJoin(5));
        let first = app.last_write;

        app.apply_action(ScreenAction::ReloadCommunities);
        app.handle_message(AppMessage::CommunitiesLoaded {
            level: None,
            result: Ok(listing()),
        });
        app.handle_message(AppMessage::JoinToggled {
            community_id: 5,
            token: first,
            result: Err(rejected(None)),
        });
        let ViewState::Communities(state) = app.view() else {
            panic!("expected communities");
        };
        assert_eq!((state.communities[0].joined, state.communities[0].members_count), (false, 10));
        assert_eq!(state.banner, None);

        app.apply_action(ScreenAction::ToggleJoin(5));
        let second = app.last_write;
        assert_ne!(first, second);
        app.handle_message(AppMessage::JoinToggled {
            community_id: 5,
            token: second,
            result: Err(rejected(None)),
        });
        let ViewState::Communities(state) = app.view() else {
            panic!("expected communities");
        };
        assert_eq!((state.communities[0].joined, state.communities[0].members_count), (false, 10));
        assert_eq!(
            state.banner.as_ref().and_then(|b| b.retry.clone()),
            Some(RetryAction::ToggleJoin(5))
        );
    }

    #[test]
    fn stale_completion_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok").unwrap();
        let mut app = app_with(storage);
        app.navigate(Route::Chat);

        app.handle_message(AppMessage::PostsLoaded {
            subject: None,
            result: Ok(vec![sample_post(1)]),
        });
        assert_eq!(app.route(), Route::Chat);

        app.navigate(Route::Feed);
        app.handle_message(AppMessage::PostsLoaded {
            subject: Some("physics".into()),
            result: Ok(vec![sample_post(1)]),
        });
        let ViewState::Feed(state) = app.view() else {
            panic!("expected feed");
        };
        assert!(state.posts.is_empty());
    }
}
