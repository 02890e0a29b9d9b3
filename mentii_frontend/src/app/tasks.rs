use std::sync::mpsc::Sender;
use std::thread;

use log::error;

use crate::api::ApiClient;
use crate::models::{NewPost, ResourceKind, SignUpRequest};

use super::messages::AppMessage;
use super::state::WriteToken;

/// Runs `job` on a worker thread and posts its result back to the UI thread.
fn spawn<F>(tx: Sender<AppMessage>, label: &'static str, job: F)
where
    F: FnOnce() -> AppMessage + Send + 'static,
{
    thread::spawn(move || {
        if tx.send(job()).is_err() {
            error!("failed to send {label} message");
        }
    });
}

pub fn login(client: ApiClient, tx: Sender<AppMessage>, email: String, password: String) {
    spawn(tx, "LoggedIn", move || {
        AppMessage::LoggedIn(client.login(&email, &password))
    });
}

pub fn signup(client: ApiClient, tx: Sender<AppMessage>, request: SignUpRequest) {
    spawn(tx, "SignedUp", move || AppMessage::SignedUp(client.signup(&request)));
}

pub fn load_posts(client: ApiClient, tx: Sender<AppMessage>, subject: Option<String>) {
    spawn(tx, "PostsLoaded", move || {
        let result = client.list_posts(subject.as_deref());
        AppMessage::PostsLoaded { subject, result }
    });
}

pub fn create_post(client: ApiClient, tx: Sender<AppMessage>, post: NewPost) {
    spawn(tx, "PostCreated", move || {
        AppMessage::PostCreated(client.create_post(&post))
    });
}

pub fn like_post(client: ApiClient, tx: Sender<AppMessage>, post_id: i64, token: WriteToken) {
    spawn(tx, "LikeToggled", move || AppMessage::LikeToggled {
        post_id,
        token,
        result: client.like_post(post_id),
    });
}

pub fn load_communities(client: ApiClient, tx: Sender<AppMessage>, level: Option<&'static str>) {
    spawn(tx, "CommunitiesLoaded", move || AppMessage::CommunitiesLoaded {
        level,
        result: client.list_communities(level),
    });
}

pub fn load_community(client: ApiClient, tx: Sender<AppMessage>, community_id: i64) {
    spawn(tx, "CommunityLoaded", move || AppMessage::CommunityLoaded {
        community_id,
        result: client.get_community(community_id),
    });
}

pub fn join_community(
    client: ApiClient,
    tx: Sender<AppMessage>,
    community_id: i64,
    token: WriteToken,
) {
    spawn(tx, "JoinToggled", move || AppMessage::JoinToggled {
        community_id,
        token,
        result: client.join_community(community_id),
    });
}

pub fn create_community_post(
    client: ApiClient,
    tx: Sender<AppMessage>,
    community_id: i64,
    content: String,
) {
    spawn(tx, "CommunityPostCreated", move || {
        AppMessage::CommunityPostCreated {
            community_id,
            result: client.create_community_post(community_id, &content),
        }
    });
}

pub fn load_conversations(client: ApiClient, tx: Sender<AppMessage>) {
    spawn(tx, "ConversationsLoaded", move || {
        AppMessage::ConversationsLoaded(client.list_conversations())
    });
}

pub fn load_messages(client: ApiClient, tx: Sender<AppMessage>, conversation_id: i64) {
    spawn(tx, "MessagesLoaded", move || AppMessage::MessagesLoaded {
        conversation_id,
        result: client.list_messages(conversation_id),
    });
}

pub fn send_message(
    client: ApiClient,
    tx: Sender<AppMessage>,
    conversation_id: i64,
    content: String,
) {
    spawn(tx, "MessageSent", move || AppMessage::MessageSent {
        conversation_id,
        result: client.send_message(conversation_id, &content),
    });
}

pub fn load_resources(
    client: ApiClient,
    tx: Sender<AppMessage>,
    kind: Option<ResourceKind>,
    subject: Option<String>,
) {
    spawn(tx, "ResourcesLoaded", move || {
        let result = client.list_resources(kind, subject.as_deref());
        AppMessage::ResourcesLoaded {
            kind,
            subject,
            result,
        }
    });
}

pub fn load_profile(client: ApiClient, tx: Sender<AppMessage>) {
    spawn(tx, "ProfileLoaded", move || AppMessage::ProfileLoaded(client.me()));
}
