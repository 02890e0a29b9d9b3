use std::path::PathBuf;

use crate::models::{
    Community, CommunityDetail, Conversation, Level, Message, NewPost, Post, Resource,
    ResourceKind, SignUpRequest, User, UserType, FILTER_SUBJECTS, SUBJECTS,
};
use crate::routes::Route;

pub const LOGIN_FAILED: &str = "Login failed. Check your credentials.";
pub const SIGNUP_FAILED: &str = "Sign up failed. Try again.";
pub const CREATE_POST_FAILED: &str = "Failed to create post";
pub const EMPTY_POST: &str = "Post content cannot be empty";
pub const FILL_ALL_FIELDS: &str = "Please fill all fields";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MIN_PASSWORD_LEN: usize = 6;
pub const SIGNUP_STEPS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Error(String),
}

/// What a list screen should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Ready,
    Empty,
    Error,
}

impl LoadState {
    pub fn status(&self, is_empty: bool) -> ViewStatus {
        match self {
            LoadState::Loading => ViewStatus::Loading,
            LoadState::Error(_) => ViewStatus::Error,
            LoadState::Ready if is_empty => ViewStatus::Empty,
            LoadState::Ready => ViewStatus::Ready,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryAction {
    ToggleLike(i64),
    ToggleJoin(i64),
}

/// A failed write, shown inline with an optional retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub retry: Option<RetryAction>,
}

/// Case-insensitive substring match; an empty query matches everything.
pub fn matches_query(query: &str, fields: &[&str]) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || fields
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
}

/// Flips a membership-style flag and moves its counter by one.
fn flip(flag: &mut bool, count: &mut u32) {
    if *flag {
        *count = count.saturating_sub(1);
    } else {
        *count += 1;
    }
    *flag = !*flag;
}

/// Identifies one optimistic write so its answer can be matched to the data it changed.
pub type WriteToken = u64;

/// Optimistic writes still waiting for the server on the currently loaded data.
///
/// A reload replaces the data the writes were applied to, so it forgets them;
/// answers for forgotten writes must not touch the fresh data.
#[derive(Debug, Default)]
pub struct PendingWrites {
    tokens: Vec<WriteToken>,
}

impl PendingWrites {
    pub fn begin(&mut self, token: WriteToken) {
        self.tokens.push(token);
    }

    /// Consumes `token`; false when it no longer belongs to the loaded data.
    pub fn settle(&mut self, token: WriteToken) -> bool {
        match self.tokens.iter().position(|pending| *pending == token) {
            Some(index) => {
                self.tokens.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub struct FeedState {
    pub posts: Vec<Post>,
    pub load: LoadState,
    pub subject_filter: Option<&'static str>,
    pub search: String,
    pub banner: Option<Banner>,
    pub pending: PendingWrites,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            load: LoadState::Loading,
            subject_filter: None,
            search: String::new(),
            banner: None,
            pending: PendingWrites::default(),
        }
    }

    pub fn filter_options() -> impl Iterator<Item = Option<&'static str>> {
        std::iter::once(None).chain(FILTER_SUBJECTS.into_iter().map(Some))
    }

    /// Lower-cased subject sent as the `subject` query parameter.
    pub fn subject_query(&self) -> Option<String> {
        self.subject_filter.map(str::to_lowercase)
    }

    pub fn visible_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| {
                matches_query(
                    &self.search,
                    &[&post.author_name, &post.subject, &post.content],
                )
            })
            .collect()
    }

    pub fn apply_loaded(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.load = LoadState::Ready;
        self.pending.clear();
    }

    pub fn toggle_like(&mut self, post_id: i64) -> bool {
        match self.posts.iter_mut().find(|post| post.id == post_id) {
            Some(post) => {
                flip(&mut post.liked, &mut post.likes_count);
                true
            }
            None => false,
        }
    }

    /// Reverts the optimistic flip and offers a retry. Returns false, leaving the
    /// posts untouched, when the write predates the posts currently shown.
    pub fn like_failed(&mut self, post_id: i64, token: WriteToken, message: String) -> bool {
        if !self.pending.settle(token) {
            return false;
        }
        if self.toggle_like(post_id) {
            self.banner = Some(Banner {
                message,
                retry: Some(RetryAction::ToggleLike(post_id)),
            });
        }
        true
    }
}

pub struct CommunitiesState {
    pub communities: Vec<Community>,
    pub load: LoadState,
    pub level_filter: Option<Level>,
    pub search: String,
    pub banner: Option<Banner>,
    pub pending: PendingWrites,
}

impl CommunitiesState {
    pub fn new() -> Self {
        Self {
            communities: Vec::new(),
            load: LoadState::Loading,
            level_filter: None,
            search: String::new(),
            banner: None,
            pending: PendingWrites::default(),
        }
    }

    pub fn filter_options() -> impl Iterator<Item = Option<Level>> {
        std::iter::once(None).chain(Level::ALL.into_iter().map(Some))
    }

    /// Level label sent as the `level` query parameter.
    pub fn level_query(&self) -> Option<&'static str> {
        self.level_filter.map(Level::label)
    }

    pub fn visible_communities(&self) -> Vec<&Community> {
        self.communities
            .iter()
            .filter(|community| matches_query(&self.search, &[&community.name, &community.subject]))
            .collect()
    }

    pub fn apply_loaded(&mut self, communities: Vec<Community>) {
        self.communities = communities;
        self.load = LoadState::Ready;
        self.pending.clear();
    }

    pub fn toggle_join(&mut self, community_id: i64) -> bool {
        match self
            .communities
            .iter_mut()
            .find(|community| community.id == community_id)
        {
            Some(community) => {
                flip(&mut community.joined, &mut community.members_count);
                true
            }
            None => false,
        }
    }

    pub fn join_failed(&mut self, community_id: i64, token: WriteToken, message: String) -> bool {
        if !self.pending.settle(token) {
            return false;
        }
        if self.toggle_join(community_id) {
            self.banner = Some(Banner {
                message,
                retry: Some(RetryAction::ToggleJoin(community_id)),
            });
        }
        true
    }
}

pub struct CommunityDetailState {
    pub community_id: i64,
    pub community: Option<CommunityDetail>,
    pub load: LoadState,
    pub draft: String,
    pub posting: bool,
    pub banner: Option<Banner>,
    pub pending: PendingWrites,
}

impl CommunityDetailState {
    pub fn new(community_id: i64) -> Self {
        Self {
            community_id,
            community: None,
            load: LoadState::Loading,
            draft: String::new(),
            posting: false,
            banner: None,
            pending: PendingWrites::default(),
        }
    }

    pub fn apply_loaded(&mut self, community: CommunityDetail) {
        self.community = Some(community);
        self.load = LoadState::Ready;
        self.pending.clear();
    }

    pub fn toggle_join(&mut self) -> bool {
        match self.community.as_mut() {
            Some(community) => {
                flip(&mut community.joined, &mut community.members_count);
                true
            }
            None => false,
        }
    }

    pub fn join_failed(&mut self, token: WriteToken, message: String) -> bool {
        if !self.pending.settle(token) {
            return false;
        }
        if self.toggle_join() {
            self.banner = Some(Banner {
                message,
                retry: Some(RetryAction::ToggleJoin(self.community_id)),
            });
        }
        true
    }

    /// The draft to publish, or `None` when it is blank or a post is already in flight.
    pub fn begin_post(&mut self) -> Option<String> {
        if self.posting || blank(&self.draft) {
            return None;
        }
        self.posting = true;
        Some(self.draft.clone())
    }

    pub fn post_succeeded(&mut self) {
        self.posting = false;
        self.draft.clear();
    }

    pub fn post_failed(&mut self, message: String) {
        self.posting = false;
        self.banner = Some(Banner {
            message,
            retry: None,
        });
    }
}

pub struct ChatState {
    pub conversations: Vec<Conversation>,
    pub load: LoadState,
    pub search: String,
    pub selected: Option<Conversation>,
    pub messages: Vec<Message>,
    pub messages_load: LoadState,
    pub draft: String,
    pub sending: bool,
    pub banner: Option<Banner>,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            conversations: Vec::new(),
            load: LoadState::Loading,
            search: String::new(),
            selected: None,
            messages: Vec::new(),
            messages_load: LoadState::Ready,
            draft: String::new(),
            sending: false,
            banner: None,
        }
    }

    pub fn visible_conversations(&self) -> Vec<&Conversation> {
        self.conversations
            .iter()
            .filter(|conversation| matches_query(&self.search, &[&conversation.user_name]))
            .collect()
    }

    pub fn apply_loaded(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
        self.load = LoadState::Ready;
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected.as_ref().map(|conversation| conversation.id)
    }

    pub fn select(&mut self, conversation: Conversation) {
        self.selected = Some(conversation);
        self.messages.clear();
        self.messages_load = LoadState::Loading;
        self.draft.clear();
        self.banner = None;
    }

    pub fn close_conversation(&mut self) {
        self.selected = None;
        self.messages.clear();
        self.messages_load = LoadState::Ready;
    }

    pub fn apply_messages(&mut self, conversation_id: i64, messages: Vec<Message>) -> bool {
        if self.selected_id() != Some(conversation_id) {
            return false;
        }
        self.messages = messages;
        self.messages_load = LoadState::Ready;
        true
    }

    /// Conversation and text to send, or `None` for a blank draft.
    pub fn begin_send(&mut self) -> Option<(i64, String)> {
        let conversation_id = self.selected_id()?;
        if self.sending || blank(&self.draft) {
            return None;
        }
        self.sending = true;
        Some((conversation_id, self.draft.clone()))
    }

    pub fn send_succeeded(&mut self) {
        self.sending = false;
        self.draft.clear();
    }

    pub fn send_failed(&mut self, message: String) {
        self.sending = false;
        self.banner = Some(Banner {
            message,
            retry: None,
        });
    }
}

pub struct ResourcesState {
    pub resources: Vec<Resource>,
    pub load: LoadState,
    pub kind_filter: Option<ResourceKind>,
    pub subject_filter: Option<&'static str>,
    pub search: String,
}

impl ResourcesState {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            load: LoadState::Loading,
            kind_filter: None,
            subject_filter: None,
            search: String::new(),
        }
    }

    pub fn subject_query(&self) -> Option<String> {
        self.subject_filter.map(str::to_lowercase)
    }

    pub fn visible_resources(&self) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|resource| matches_query(&self.search, &[&resource.title]))
            .collect()
    }

    pub fn apply_loaded(&mut self, resources: Vec<Resource>) {
        self.resources = resources;
        self.load = LoadState::Ready;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Overview,
    Badges,
    Followers,
}

impl ProfileTab {
    pub const ALL: [ProfileTab; 3] = [ProfileTab::Overview, ProfileTab::Badges, ProfileTab::Followers];

    pub fn label(self) -> &'static str {
        match self {
            ProfileTab::Overview => "📖 Overview",
            ProfileTab::Badges => "🏆 Badges",
            ProfileTab::Followers => "👥 Followers",
        }
    }
}

pub struct ProfileState {
    pub user: Option<User>,
    pub load: LoadState,
    pub tab: ProfileTab,
}

impl ProfileState {
    /// Starts from the cached session user when there is one.
    pub fn new(cached: Option<User>) -> Self {
        let load = if cached.is_some() {
            LoadState::Ready
        } else {
            LoadState::Loading
        };
        Self {
            user: cached,
            load,
            tab: ProfileTab::default(),
        }
    }

    pub fn needs_fetch(&self) -> bool {
        self.user.is_none()
    }
}

#[derive(Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginState {
    pub fn can_submit(&self) -> bool {
        !self.submitting && !blank(&self.email) && !self.password.is_empty()
    }

    pub fn begin_submit(&mut self) -> Option<(String, String)> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some((self.email.trim().to_string(), self.password.clone()))
    }

    pub fn failed(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

pub struct SignUpState {
    pub step: usize,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub user_type: UserType,
    pub level: Level,
    pub subjects: Vec<String>,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for SignUpState {
    fn default() -> Self {
        Self {
            step: 1,
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            user_type: UserType::default(),
            level: Level::default(),
            subjects: Vec::new(),
            error: None,
            submitting: false,
        }
    }
}

impl SignUpState {
    fn validate_account(&self) -> Result<(), &'static str> {
        if blank(&self.full_name)
            || blank(&self.email)
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(FILL_ALL_FIELDS);
        }
        if self.password != self.confirm_password {
            return Err(PASSWORD_MISMATCH);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PASSWORD_TOO_SHORT);
        }
        Ok(())
    }

    /// Advances one step; returns whether the step changed.
    pub fn next(&mut self) -> bool {
        if self.step == 1 {
            if let Err(message) = self.validate_account() {
                self.error = Some(message.to_string());
                return false;
            }
        }
        self.error = None;
        if self.step < SIGNUP_STEPS {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        self.error = None;
        if self.step > 1 {
            self.step -= 1;
        }
    }

    pub fn toggle_subject(&mut self, subject: &str) {
        if let Some(index) = self.subjects.iter().position(|s| s == subject) {
            self.subjects.remove(index);
        } else {
            self.subjects.push(subject.to_string());
        }
    }

    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    pub fn can_submit(&self) -> bool {
        self.step == SIGNUP_STEPS && !self.subjects.is_empty() && !self.submitting
    }

    pub fn begin_submit(&mut self) -> Option<SignUpRequest> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(SignUpRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: self.full_name.trim().to_string(),
        })
    }

    pub fn failed(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

pub struct CreatePostState {
    pub content: String,
    pub subject: &'static str,
    pub image: Option<PathBuf>,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for CreatePostState {
    fn default() -> Self {
        Self {
            content: String::new(),
            subject: SUBJECTS[0],
            image: None,
            error: None,
            submitting: false,
        }
    }
}

impl CreatePostState {
    /// Validates the form; blank content never reaches the network.
    pub fn begin_submit(&mut self) -> Option<NewPost> {
        if self.submitting {
            return None;
        }
        if blank(&self.content) {
            self.error = Some(EMPTY_POST.to_string());
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(NewPost {
            content: self.content.clone(),
            subject: self.subject.to_string(),
            image: self.image.clone(),
        })
    }

    pub fn failed(&mut self, message: String) {
        self.submitting = false;
        self.error = Some(message);
    }
}

/// Screen-local state for the mounted route.
pub enum ViewState {
    Welcome,
    SignUp(SignUpState),
    Login(LoginState),
    Feed(FeedState),
    Communities(CommunitiesState),
    CommunityDetail(CommunityDetailState),
    Chat(ChatState),
    Resources(ResourcesState),
    Profile(ProfileState),
    CreatePost(CreatePostState),
}

impl ViewState {
    pub fn for_route(route: Route, session_user: Option<User>) -> Self {
        match route {
            Route::Welcome => ViewState::Welcome,
            Route::SignUp => ViewState::SignUp(SignUpState::default()),
            Route::Login => ViewState::Login(LoginState::default()),
            Route::Feed => ViewState::Feed(FeedState::new()),
            Route::Communities => ViewState::Communities(CommunitiesState::new()),
            Route::CommunityDetail(id) => ViewState::CommunityDetail(CommunityDetailState::new(id)),
            Route::Chat => ViewState::Chat(ChatState::new()),
            Route::Resources => ViewState::Resources(ResourcesState::new()),
            Route::Profile => ViewState::Profile(ProfileState::new(session_user)),
            Route::CreatePost => ViewState::CreatePost(CreatePostState::default()),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            ViewState::Welcome => Route::Welcome,
            ViewState::SignUp(_) => Route::SignUp,
            ViewState::Login(_) => Route::Login,
            ViewState::Feed(_) => Route::Feed,
            ViewState::Communities(_) => Route::Communities,
            ViewState::CommunityDetail(state) => Route::CommunityDetail(state.community_id),
            ViewState::Chat(_) => Route::Chat,
            ViewState::Resources(_) => Route::Resources,
            ViewState::Profile(_) => Route::Profile,
            ViewState::CreatePost(_) => Route::CreatePost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn post(id: i64, liked: bool, likes: u32) -> Post {
        Post {
            id,
            author_name: "Brian Otieno".into(),
            author_avatar: None,
            subject: "Physics".into(),
            content: format!("Notes on momentum #{id}"),
            created_at: "2024-05-01T10:00:00Z".into(),
            likes_count: likes,
            comments_count: 0,
            liked,
            image_url: None,
        }
    }

    fn community(id: i64, name: &str, subject: &str, joined: bool, members: u32) -> Community {
        Community {
            id,
            name: name.into(),
            subject: subject.into(),
            description: String::new(),
            members_count: members,
            icon: "📐".into(),
            joined,
        }
    }

    fn conversation(id: i64, name: &str) -> Conversation {
        Conversation {
            id,
            user_name: name.into(),
            user_avatar: None,
            last_message: "see you".into(),
            timestamp: "10:00".into(),
            unread: false,
        }
    }

    #[test]
    fn like_toggle_moves_counter_by_one() {
        let mut feed = FeedState::new();
        feed.apply_loaded(vec![post(1, false, 4), post(2, true, 9)]);

        assert!(feed.toggle_like(1));
        assert!(feed.toggle_like(2));
        assert_eq!((feed.posts[0].liked, feed.posts[0].likes_count), (true, 5));
        assert_eq!((feed.posts[1].liked, feed.posts[1].likes_count), (false, 8));
        assert!(!feed.toggle_like(99));
    }

    #[test]
    fn failed_like_is_reverted_with_retry() {
        let mut feed = FeedState::new();
        feed.apply_loaded(vec![post(1, false, 4)]);
        feed.toggle_like(1);
        feed.pending.begin(7);
        assert!(feed.like_failed(1, 7, "Failed to like post".into()));

        assert_eq!((feed.posts[0].liked, feed.posts[0].likes_count), (false, 4));
        assert_eq!(
            feed.banner,
            Some(Banner {
                message: "Failed to like post".into(),
                retry: Some(RetryAction::ToggleLike(1)),
            })
        );
    }

    #[test]
    fn feed_search_matches_author_subject_and_content() {
        let mut feed = FeedState::new();
        let mut chemistry = post(2, false, 0);
        chemistry.subject = "Chemistry".into();
        chemistry.author_name = "Wanjiru".into();
        feed.apply_loaded(vec![post(1, false, 0), chemistry]);

        feed.search = "chem".into();
        assert_eq!(feed.visible_posts().len(), 1);
        feed.search = "MOMENTUM".into();
        assert_eq!(feed.visible_posts().len(), 2);
        feed.search = "  ".into();
        assert_eq!(feed.visible_posts().len(), 2);
    }

    #[test]
    fn feed_subject_query_is_lowercase_and_absent_for_all() {
        let mut feed = FeedState::new();
        assert_eq!(feed.subject_query(), None);
        feed.subject_filter = Some("Physics");
        assert_eq!(feed.subject_query().as_deref(), Some("physics"));
        assert_eq!(FeedState::filter_options().count(), FILTER_SUBJECTS.len() + 1);
    }

    #[test]
    fn join_toggle_and_rollback() {
        let mut state = CommunitiesState::new();
        state.apply_loaded(vec![community(5, "Calculus Club", "Math", false, 10)]);

        state.toggle_join(5);
        assert_eq!((state.communities[0].joined, state.communities[0].members_count), (true, 11));
        state.toggle_join(5);
        assert_eq!((state.communities[0].joined, state.communities[0].members_count), (false, 10));

        state.toggle_join(5);
        state.pending.begin(3);
        assert!(state.join_failed(5, 3, "Failed to join community".into()));
        assert_eq!((state.communities[0].joined, state.communities[0].members_count), (false, 10));
        assert_eq!(
            state.banner.as_ref().and_then(|b| b.retry.clone()),
            Some(RetryAction::ToggleJoin(5))
        );
    }

    #[test]
    fn reload_forgets_writes_made_on_the_old_data() {
        let mut feed = FeedState::new();
        feed.apply_loaded(vec![post(1, false, 2)]);
        feed.toggle_like(1);
        feed.pending.begin(1);

        feed.apply_loaded(vec![post(1, false, 2)]);
        assert!(feed.pending.is_empty());
        assert!(!feed.like_failed(1, 1, "Failed to like post".into()));
        assert_eq!((feed.posts[0].liked, feed.posts[0].likes_count), (false, 2));
        assert_eq!(feed.banner, None);
    }

    #[test]
    fn detail_join_failure_after_refetch_is_ignored() {
        let detail_with = |joined, members| CommunityDetail {
            id: 4,
            name: "Lab Rats".into(),
            subject: "Chemistry".into(),
            description: String::new(),
            members_count: members,
            about: None,
            joined,
            posts: Vec::new(),
        };
        let mut detail = CommunityDetailState::new(4);
        detail.apply_loaded(detail_with(true, 8));
        assert!(detail.toggle_join());
        detail.pending.begin(11);

        detail.apply_loaded(detail_with(true, 8));
        assert!(!detail.join_failed(11, "Failed to join community".into()));
        let community = detail.community.as_ref().unwrap();
        assert_eq!((community.joined, community.members_count), (true, 8));
        assert_eq!(detail.banner, None);

        assert!(detail.toggle_join());
        detail.pending.begin(12);
        assert!(detail.join_failed(12, "Failed to join community".into()));
        let community = detail.community.as_ref().unwrap();
        assert_eq!((community.joined, community.members_count), (true, 8));
    }

    #[test]
    fn settling_a_token_consumes_it() {
        let mut pending = PendingWrites::default();
        pending.begin(1);
        pending.begin(2);
        assert!(pending.settle(2));
        assert!(!pending.settle(2));
        assert!(pending.settle(1));
        assert!(pending.is_empty());
    }

    #[test]
    fn community_search_and_level_query() {
        let mut state = CommunitiesState::new();
        state.apply_loaded(vec![
            community(1, "Calculus Club", "Math", false, 1),
            community(2, "Lab Rats", "Chemistry", true, 3),
        ]);
        state.search = "math".into();
        assert_eq!(state.visible_communities().len(), 1);
        state.search = "lab".into();
        assert_eq!(state.visible_communities()[0].id, 2);

        state.level_filter = Some(Level::Form4);
        assert_eq!(state.level_query(), Some("Form 4"));
    }

    #[test]
    fn community_detail_blank_post_is_ignored() {
        let mut detail = CommunityDetailState::new(3);
        detail.draft = "   ".into();
        assert_eq!(detail.begin_post(), None);
        assert!(!detail.posting);

        detail.draft = "Anyone solved question 4?".into();
        assert_eq!(detail.begin_post().as_deref(), Some("Anyone solved question 4?"));
        assert_eq!(detail.begin_post(), None);
        detail.post_succeeded();
        assert!(detail.draft.is_empty());
    }

    #[test]
    fn chat_ignores_messages_for_other_conversations() {
        let mut chat = ChatState::new();
        chat.apply_loaded(vec![conversation(1, "Neema"), conversation(2, "Kevin")]);
        chat.select(conversation(2, "Kevin"));
        assert_eq!(chat.messages_load, LoadState::Loading);

        assert!(!chat.apply_messages(1, Vec::new()));
        assert_eq!(chat.messages_load, LoadState::Loading);
        assert!(chat.apply_messages(2, Vec::new()));
        assert_eq!(chat.messages_load, LoadState::Ready);

        chat.search = "nee".into();
        assert_eq!(chat.visible_conversations().len(), 1);
    }

    #[test]
    fn chat_blank_message_is_not_sent() {
        let mut chat = ChatState::new();
        chat.draft = "hello".into();
        assert_eq!(chat.begin_send(), None, "no conversation selected");

        chat.select(conversation(4, "Neema"));
        chat.draft = " ".into();
        assert_eq!(chat.begin_send(), None);
        chat.draft = "hello".into();
        assert_eq!(chat.begin_send(), Some((4, "hello".to_string())));
        chat.send_succeeded();
        assert!(chat.draft.is_empty());
    }

    #[test]
    fn signup_step_one_rejects_mismatched_passwords() {
        let mut signup = SignUpState {
            full_name: "Amina".into(),
            email: "amina@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
            ..Default::default()
        };
        assert!(!signup.next());
        assert_eq!(signup.step, 1);
        assert_eq!(signup.error.as_deref(), Some(PASSWORD_MISMATCH));
    }

    #[test]
    fn signup_step_one_requires_fields_and_length() {
        let mut signup = SignUpState::default();
        assert!(!signup.next());
        assert_eq!(signup.error.as_deref(), Some(FILL_ALL_FIELDS));

        signup.full_name = "Amina".into();
        signup.email = "amina@example.com".into();
        signup.password = "abc".into();
        signup.confirm_password = "abc".into();
        assert!(!signup.next());
        assert_eq!(signup.error.as_deref(), Some(PASSWORD_TOO_SHORT));
    }

    #[test]
    fn signup_walks_all_steps_and_needs_a_subject() {
        let mut signup = SignUpState {
            full_name: "Amina".into(),
            email: "amina@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            ..Default::default()
        };
        assert!(signup.next());
        assert!(signup.next());
        assert!(signup.next());
        assert_eq!(signup.step, SIGNUP_STEPS);
        assert!(!signup.next());

        assert!(!signup.can_submit());
        assert!(signup.begin_submit().is_none());

        signup.toggle_subject("Biology");
        assert!(signup.can_submit());
        signup.toggle_subject("Biology");
        assert!(!signup.can_submit());

        signup.toggle_subject("Math");
        let request = signup.begin_submit().unwrap();
        assert_eq!(request.full_name, "Amina");
        assert_eq!(request.email, "amina@example.com");
        assert!(!signup.can_submit(), "already submitting");
    }

    #[test]
    fn signup_back_clears_error() {
        let mut signup = SignUpState {
            step: 3,
            error: Some("stale".into()),
            ..Default::default()
        };
        signup.back();
        assert_eq!(signup.step, 2);
        assert_eq!(signup.error, None);
        signup.back();
        signup.back();
        assert_eq!(signup.step, 1);
    }

    #[test]
    fn empty_post_is_rejected_locally() {
        let mut form = CreatePostState {
            content: "  \n ".into(),
            ..Default::default()
        };
        assert_eq!(form.begin_submit(), None);
        assert_eq!(form.error.as_deref(), Some("Post content cannot be empty"));
        assert!(!form.submitting);
    }

    #[test]
    fn valid_post_builds_payload() {
        let mut form = CreatePostState {
            content: "Photosynthesis summary".into(),
            subject: "Biology",
            ..Default::default()
        };
        let payload = form.begin_submit().unwrap();
        assert_eq!(payload.subject, "Biology");
        assert!(form.submitting);
        assert_eq!(form.begin_submit(), None);
    }

    #[test]
    fn view_status_distinguishes_empty_from_error() {
        assert_eq!(LoadState::Loading.status(true), ViewStatus::Loading);
        assert_eq!(LoadState::Ready.status(true), ViewStatus::Empty);
        assert_eq!(LoadState::Ready.status(false), ViewStatus::Ready);
        assert_eq!(LoadState::Error("x".into()).status(true), ViewStatus::Error);
    }

    #[test]
    fn profile_uses_cached_user() {
        let cached = ProfileState::new(Some(User::default()));
        assert!(!cached.needs_fetch());
        assert_eq!(cached.load, LoadState::Ready);
        assert!(ProfileState::new(None).needs_fetch());
    }

    #[test]
    fn view_state_reports_its_route() {
        for route in [Route::Feed, Route::CommunityDetail(8), Route::CreatePost, Route::Welcome] {
            assert_eq!(ViewState::for_route(route, None).route(), route);
        }
    }
}
