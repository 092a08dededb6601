use chrono::{DateTime, Utc};

use registrar_core::ids::UserId;

/// The single authenticated student. At most one exists at a time.
#[derive(Clone, Debug)]
pub struct Session {
    user_id: UserId,
    logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn start(user_id: UserId) -> Self {
        Self {
            user_id,
            logged_in_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn logged_in_at(&self) -> DateTime<Utc> {
        self.logged_in_at
    }
}
