pub mod session;
pub mod validated_json;

pub use session::{CurrentSession, SuperAdminSession};
pub use validated_json::ValidatedJson;
