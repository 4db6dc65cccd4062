pub mod session;

pub use session::{get_current_user_id, USER_ID_KEY};
