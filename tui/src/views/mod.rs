pub mod dashboard;
pub mod login_form;
pub mod protected;
pub mod status_bar;
pub mod themed_button;

pub use login_form::{FormAction, LoginField, LoginForm};
pub use protected::{FALLBACK_MESSAGE, Gate, gate};
