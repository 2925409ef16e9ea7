pub mod cookies;
pub mod roles;
pub mod session;
pub mod storage_scope;

pub use cookies::{clear_auth_cookies, get_auth_token, set_auth_cookies};
pub use roles::{Capability, RoleCapabilitySet};
pub use session::{
    decode_session, decode_session_checked, encode_session, SessionIdentity, SessionPayload,
    SessionRejection, UserType,
};
pub use storage_scope::{ClientStorageScope, ScopeCheck};
