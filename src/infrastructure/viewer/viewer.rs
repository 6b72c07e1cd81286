use crate::entities::User;

/// Who is making the current request.
#[derive(Debug, Clone)]
pub struct ViewerContext {
    pub request_id: String,
    pub user: Option<User>,
}

impl ViewerContext {
    pub fn anonymous(request_id: String) -> Self {
        ViewerContext {
            request_id,
            user: None,
        }
    }

    pub fn authenticated_user(user: User, request_id: String) -> Self {
        ViewerContext {
            request_id,
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    /// Ownership check used by every edit/delete handler.
    pub fn is_owner(&self, author_id: i64) -> bool {
        self.user_id() == Some(author_id)
    }
}
