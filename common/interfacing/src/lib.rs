mod imports;

mod category;
mod contact_form;
mod file_asset;
mod login_form;
mod news_post;
mod token;

pub use category::Category;
pub use contact_form::ContactForm;
pub use file_asset::{FileAsset, FileCategory};
pub use imports::{
    deserialize_timestamp, expose_optional_secret_string, expose_secret_string, parse_timestamp,
    DateTime, Utc,
};
pub use login_form::LoginForm;
pub use news_post::NewsPost;
pub use token::{RefreshRequest, RefreshResponse, TokenResponse};
