pub mod assistant_service;
pub mod assistant_service_impl;
pub use assistant_service::{AssistantError, AssistantService};
pub use assistant_service_impl::GeminiAssistantService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod mail_service;
pub mod mail_service_impl;
pub use mail_service::{MailError, MailService};
pub use mail_service_impl::SmtpMailService;

pub mod profile_service;
pub mod profile_service_impl;
pub use profile_service::{ProfileError, ProfileService};
pub use profile_service_impl::SeaOrmProfileService;
