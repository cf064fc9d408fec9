/// Top-level screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Login,
    Dashboard,
}

impl Route {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
        }
    }
}

/// Navigation capability handed to views that need to change the route.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}
