//! Authentication actions

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Credentials were checked by the store and matched
    LoginSucceeded { username: String },
    Logout,
}
