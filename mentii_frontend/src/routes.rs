use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Welcome,
    SignUp,
    Login,
    Feed,
    Communities,
    CommunityDetail(i64),
    Chat,
    Resources,
    Profile,
    CreatePost,
}

impl Route {
    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Welcome | Route::SignUp | Route::Login)
    }

    pub fn path(self) -> String {
        match self {
            Route::Welcome => "/".into(),
            Route::SignUp => "/signup".into(),
            Route::Login => "/login".into(),
            Route::Feed => "/feed".into(),
            Route::Communities => "/communities".into(),
            Route::CommunityDetail(id) => format!("/communities/{id}"),
            Route::Chat => "/chat".into(),
            Route::Resources => "/resources".into(),
            Route::Profile => "/profile".into(),
            Route::CreatePost => "/create-post".into(),
        }
    }

    /// Unknown paths land on the welcome screen.
    pub fn from_path(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" => Route::Welcome,
            "/signup" => Route::SignUp,
            "/login" => Route::Login,
            "/feed" => Route::Feed,
            "/communities" => Route::Communities,
            "/chat" => Route::Chat,
            "/resources" => Route::Resources,
            "/profile" => Route::Profile,
            "/create-post" => Route::CreatePost,
            other => other
                .strip_prefix("/communities/")
                .and_then(|id| id.parse().ok())
                .map(Route::CommunityDetail)
                .unwrap_or(Route::Welcome),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Resolves the route that may actually be rendered for `auth`.
pub fn guard(route: Route, auth: AuthState) -> Route {
    if route.is_protected() && auth == AuthState::Anonymous {
        Route::Login
    } else {
        route
    }
}

pub struct NavItem {
    pub route: Route,
    pub icon: &'static str,
    pub label: &'static str,
}

pub const NAV_ITEMS: [NavItem; 5] = [
    NavItem {
        route: Route::Feed,
        icon: "🏠",
        label: "Home",
    },
    NavItem {
        route: Route::Communities,
        icon: "👥",
        label: "Communities",
    },
    NavItem {
        route: Route::Resources,
        icon: "📚",
        label: "Resources",
    },
    NavItem {
        route: Route::Chat,
        icon: "💬",
        label: "Chat",
    },
    NavItem {
        route: Route::Profile,
        icon: "👤",
        label: "Profile",
    },
];

/// Bottom navigation is only shown to signed-in users.
pub fn show_bottom_nav(auth: AuthState) -> bool {
    auth == AuthState::Authenticated
}
