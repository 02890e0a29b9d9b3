use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Subjects offered when signing up or composing a post.
pub const SUBJECTS: [&str; 8] = [
    "Math",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "History",
    "Geography",
    "Computer Science",
];

/// Subjects offered by the feed and resource filters.
pub const FILTER_SUBJECTS: [&str; 5] = ["Math", "Physics", "Chemistry", "Biology", "English"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Student,
    Teacher,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Student, UserType::Teacher];

    pub fn label(self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Teacher => "Teacher",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UserType::Student => "Learn from others",
            UserType::Teacher => "Share your knowledge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Form1,
    Form2,
    Form3,
    Form4,
    Form5,
    Form6,
    University,
}

impl Level {
    pub const ALL: [Level; 7] = [
        Level::Form1,
        Level::Form2,
        Level::Form3,
        Level::Form4,
        Level::Form5,
        Level::Form6,
        Level::University,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Form1 => "form_1",
            Level::Form2 => "form_2",
            Level::Form3 => "form_3",
            Level::Form4 => "form_4",
            Level::Form5 => "form_5",
            Level::Form6 => "form_6",
            Level::University => "university",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Form1 => "Form 1",
            Level::Form2 => "Form 2",
            Level::Form3 => "Form 3",
            Level::Form4 => "Form 4",
            Level::Form5 => "Form 5",
            Level::Form6 => "Form 6",
            Level::University => "University",
        }
    }

    /// Accepts both the wire value (`form_3`) and the display label (`Form 3`).
    pub fn parse(raw: &str) -> Option<Level> {
        let raw = raw.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw) || level.label().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub posts_count: u32,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub streak: u32,
}

impl User {
    pub fn level(&self) -> Option<Level> {
        self.level.as_deref().and_then(Level::parse)
    }

    /// Human readable level, falling back to whatever the backend sent.
    pub fn level_label(&self) -> &str {
        match self.level() {
            Some(level) => level.label(),
            None => self.level.as_deref().unwrap_or("Not set"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PostList {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Multipart payload for `POST /posts`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewPost {
    pub content: String,
    pub subject: String,
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members_count: u32,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub joined: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CommunityList {
    #[serde(default)]
    pub communities: Vec<Community>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommunityPost {
    pub id: i64,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommunityDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members_count: u32,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub joined: bool,
    #[serde(default)]
    pub posts: Vec<CommunityPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentInput {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_avatar: Option<String>,
    #[serde(default)]
    pub last_message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(default)]
    pub sender: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub is_own: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pdf,
    Image,
    Notes,
    /// Any type the client has no dedicated filter for (e.g. `video`).
    #[serde(other)]
    Other,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [ResourceKind::Pdf, ResourceKind::Notes, ResourceKind::Image];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Pdf => "pdf",
            ResourceKind::Image => "image",
            ResourceKind::Notes => "notes",
            ResourceKind::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Pdf => "PDF",
            ResourceKind::Image => "Images",
            ResourceKind::Notes => "Notes",
            ResourceKind::Other => "Other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ResourceKind::Pdf => "📕",
            ResourceKind::Image => "🖼",
            ResourceKind::Notes => "📝",
            ResourceKind::Other => "📄",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub downloads: u32,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub file_url: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResourceList {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_wire_values_and_labels() {
        assert_eq!(Level::parse("form_3"), Some(Level::Form3));
        assert_eq!(Level::parse("Form 3"), Some(Level::Form3));
        assert_eq!(Level::parse("university"), Some(Level::University));
        assert_eq!(Level::parse("kindergarten"), None);
    }

    #[test]
    fn sparse_user_record_uses_defaults() {
        let user: User = serde_json::from_str(r#"{"id": 7, "email": "a@b.c"}"#).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.user_type, UserType::Student);
        assert!(user.subjects.is_empty());
        assert_eq!(user.level_label(), "Not set");
    }

    #[test]
    fn resource_kind_reads_type_field() {
        let resource: Resource = serde_json::from_str(
            r#"{"id": 1, "title": "Algebra notes", "type": "notes", "file_url": "http://x/a.pdf"}"#,
        )
        .unwrap();
        assert_eq!(resource.kind, ResourceKind::Notes);
        assert_eq!(resource.downloads, 0);
    }

    #[test]
    fn unknown_resource_type_keeps_the_rest_of_the_list() {
        let list: ResourceList = serde_json::from_str(
            r#"{"resources": [
                {"id": 1, "title": "Past paper", "type": "pdf"},
                {"id": 2, "title": "Titration demo", "type": "video"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.resources.len(), 2);
        assert_eq!(list.resources[0].kind, ResourceKind::Pdf);
        assert_eq!(list.resources[1].kind, ResourceKind::Other);
        assert_eq!(list.resources[1].kind.label(), "Other");
        assert!(!ResourceKind::ALL.contains(&ResourceKind::Other));
    }

    #[test]
    fn missing_envelope_field_means_empty_list() {
        let list: PostList = serde_json::from_str("{}").unwrap();
        assert!(list.posts.is_empty());
    }
}
