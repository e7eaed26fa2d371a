//! Navigator trait: moves the user between screens.

/// Path of the login screen.
pub const LOGIN_PATH: &str = "/login";

/// Screen navigation requested by view models.
pub trait Navigator: Send + Sync + 'static {
    /// Navigate to an application path such as `/dashboard`.
    fn navigate(&self, path: &str);

    /// Send the user to the login screen.
    fn redirect_to_login(&self) {
        self.navigate(LOGIN_PATH);
    }
}
