use log::{debug, error, info, warn};

use crate::api::ApiError;
use crate::models::{
    AuthResponse, Community, CommunityDetail, Conversation, Message, Post, Resource,
    ResourceKind, User,
};
use crate::routes::Route;

use super::state::{
    LoadState, ViewState, WriteToken, CREATE_POST_FAILED, LOGIN_FAILED, SIGNUP_FAILED,
};
use super::MentiiApp;

pub enum AppMessage {
    LoggedIn(Result<AuthResponse, ApiError>),
    SignedUp(Result<AuthResponse, ApiError>),
    PostsLoaded {
        subject: Option<String>,
        result: Result<Vec<Post>, ApiError>,
    },
    PostCreated(Result<(), ApiError>),
    LikeToggled {
        post_id: i64,
        token: WriteToken,
        result: Result<(), ApiError>,
    },
    CommunitiesLoaded {
        level: Option<&'static str>,
        result: Result<Vec<Community>, ApiError>,
    },
    CommunityLoaded {
        community_id: i64,
        result: Result<CommunityDetail, ApiError>,
    },
    JoinToggled {
        community_id: i64,
        token: WriteToken,
        result: Result<(), ApiError>,
    },
    CommunityPostCreated {
        community_id: i64,
        result: Result<(), ApiError>,
    },
    ConversationsLoaded(Result<Vec<Conversation>, ApiError>),
    MessagesLoaded {
        conversation_id: i64,
        result: Result<Vec<Message>, ApiError>,
    },
    MessageSent {
        conversation_id: i64,
        result: Result<(), ApiError>,
    },
    ResourcesLoaded {
        kind: Option<ResourceKind>,
        subject: Option<String>,
        result: Result<Vec<Resource>, ApiError>,
    },
    ProfileLoaded(Result<User, ApiError>),
}

pub fn process_messages(app: &mut MentiiApp) {
    while let Ok(message) = app.rx.try_recv() {
        handle_message(app, message);
    }
}

fn stale(what: &str) {
    debug!("dropping {what}: screen no longer mounted");
}

pub fn handle_message(app: &mut MentiiApp, message: AppMessage) {
    app.in_flight = app.in_flight.saturating_sub(1);

    match message {
        AppMessage::LoggedIn(result) => match result {
            Ok(auth) => app.establish_session(auth),
            Err(err) => {
                error!("login failed: {err}");
                if let ViewState::Login(state) = &mut app.view {
                    state.failed(err.user_message(LOGIN_FAILED));
                }
            }
        },
        AppMessage::SignedUp(result) => match result {
            Ok(auth) => app.establish_session(auth),
            Err(err) => {
                error!("signup failed: {err}");
                if let ViewState::SignUp(state) = &mut app.view {
                    state.failed(err.user_message(SIGNUP_FAILED));
                }
            }
        },
        AppMessage::PostsLoaded { subject, result } => {
            let ViewState::Feed(state) = &mut app.view else {
                return stale("posts");
            };
            if state.subject_query() != subject {
                return stale("posts for a previous filter");
            }
            match result {
                Ok(posts) => state.apply_loaded(posts),
                Err(err) => {
                    error!("failed to fetch posts: {err}");
                    state.load = LoadState::Error(err.user_message("Failed to load posts"));
                }
            }
        }
        AppMessage::PostCreated(result) => {
            let ViewState::CreatePost(state) = &mut app.view else {
                return stale("post creation result");
            };
            match result {
                Ok(()) => {
                    info!("post published");
                    app.navigate(Route::Feed);
                }
                Err(err) => {
                    error!("failed to create post: {err}");
                    state.failed(err.user_message(CREATE_POST_FAILED));
                }
            }
        }
        AppMessage::LikeToggled {
            post_id,
            token,
            result,
        } => {
            let ViewState::Feed(state) = &mut app.view else {
                return stale("like result");
            };
            match result {
                Ok(()) => {
                    state.pending.settle(token);
                }
                Err(err) => {
                    warn!("failed to like post {post_id}: {err}");
                    if !state.like_failed(post_id, token, err.user_message("Failed to like post")) {
                        stale("like result for reloaded posts");
                    }
                }
            }
        }
        AppMessage::CommunitiesLoaded { level, result } => {
            let ViewState::Communities(state) = &mut app.view else {
                return stale("communities");
            };
            if state.level_query() != level {
                return stale("communities for a previous filter");
            }
            match result {
                Ok(communities) => state.apply_loaded(communities),
                Err(err) => {
                    error!("failed to fetch communities: {err}");
                    state.load =
                        LoadState::Error(err.user_message("Failed to load communities"));
                }
            }
        }
        AppMessage::CommunityLoaded {
            community_id,
            result,
        } => {
            let ViewState::CommunityDetail(state) = &mut app.view else {
                return stale("community");
            };
            if state.community_id != community_id {
                return stale("another community");
            }
            match result {
                Ok(community) => state.apply_loaded(community),
                Err(err) => {
                    error!("failed to fetch community {community_id}: {err}");
                    state.load = LoadState::Error(err.user_message("Failed to load community"));
                }
            }
        }
        AppMessage::JoinToggled {
            community_id,
            token,
            result,
        } => {
            let pending = match &mut app.view {
                ViewState::Communities(state) => &mut state.pending,
                ViewState::CommunityDetail(state) if state.community_id == community_id => {
                    &mut state.pending
                }
                _ => return stale("join result"),
            };
            let Err(err) = result else {
                pending.settle(token);
                return;
            };
            warn!("failed to join community {community_id}: {err}");
            let message = err.user_message("Failed to join community");
            let rolled_back = match &mut app.view {
                ViewState::Communities(state) => state.join_failed(community_id, token, message),
                ViewState::CommunityDetail(state) => state.join_failed(token, message),
                _ => false,
            };
            if !rolled_back {
                stale("join result for reloaded communities");
            }
        }
        AppMessage::CommunityPostCreated {
            community_id,
            result,
        } => {
            let ViewState::CommunityDetail(state) = &mut app.view else {
                return stale("community post result");
            };
            if state.community_id != community_id {
                return stale("community post for another community");
            }
            match result {
                Ok(()) => {
                    state.post_succeeded();
                    app.load_community();
                }
                Err(err) => {
                    error!("failed to post to community {community_id}: {err}");
                    state.post_failed(err.user_message("Failed to post"));
                }
            }
        }
        AppMessage::ConversationsLoaded(result) => {
            let ViewState::Chat(state) = &mut app.view else {
                return stale("conversations");
            };
            match result {
                Ok(conversations) => state.apply_loaded(conversations),
                Err(err) => {
                    error!("failed to fetch conversations: {err}");
                    state.load =
                        LoadState::Error(err.user_message("Failed to load conversations"));
                }
            }
        }
        AppMessage::MessagesLoaded {
            conversation_id,
            result,
        } => {
            let ViewState::Chat(state) = &mut app.view else {
                return stale("messages");
            };
            match result {
                Ok(messages) => {
                    if !state.apply_messages(conversation_id, messages) {
                        stale("messages for another conversation");
                    }
                }
                Err(err) => {
                    error!("failed to fetch messages for {conversation_id}: {err}");
                    if state.selected_id() == Some(conversation_id) {
                        state.messages_load =
                            LoadState::Error(err.user_message("Failed to load messages"));
                    }
                }
            }
        }
        AppMessage::MessageSent {
            conversation_id,
            result,
        } => {
            let ViewState::Chat(state) = &mut app.view else {
                return stale("message send result");
            };
            match result {
                Ok(()) => {
                    state.send_succeeded();
                    if state.selected_id() == Some(conversation_id) {
                        app.load_messages(conversation_id);
                    }
                }
                Err(err) => {
                    error!("failed to send message to {conversation_id}: {err}");
                    state.send_failed(err.user_message("Failed to send message"));
                }
            }
        }
        AppMessage::ResourcesLoaded {
            kind,
            subject,
            result,
        } => {
            let ViewState::Resources(state) = &mut app.view else {
                return stale("resources");
            };
            if state.kind_filter != kind || state.subject_query() != subject {
                return stale("resources for a previous filter");
            }
            match result {
                Ok(resources) => state.apply_loaded(resources),
                Err(err) => {
                    error!("failed to fetch resources: {err}");
                    state.load = LoadState::Error(err.user_message("Failed to load resources"));
                }
            }
        }
        AppMessage::ProfileLoaded(result) => {
            let ViewState::Profile(state) = &mut app.view else {
                return stale("profile");
            };
            match result {
                Ok(user) => {
                    state.user = Some(user);
                    state.load = LoadState::Ready;
                }
                Err(err) => {
                    error!("failed to fetch profile: {err}");
                    state.load = LoadState::Error(err.user_message("Failed to load profile"));
                }
            }
        }
    }
}
