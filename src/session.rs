use serde::Serialize;
#[cfg(test)]
use std::collections::HashMap;

use crate::db;

pub const ROLE_KEY: &str = "session.role";
pub const USERNAME_KEY: &str = "session.username";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Role,
    pub username: String,
}

/// Durable key-value storage for the session, injected so tests can swap in
/// an in-memory double.
pub trait SideChannel {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

/// Side-channel over the workspace settings table.
pub struct SqliteSideChannel<'a> {
    conn: &'a rusqlite::Connection,
}

impl<'a> SqliteSideChannel<'a> {
    pub fn new(conn: &'a rusqlite::Connection) -> Self {
        Self { conn }
    }
}

impl SideChannel for SqliteSideChannel<'_> {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        db::settings_get(self.conn, key)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        db::settings_set(self.conn, key, value)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        db::settings_remove(self.conn, key)
    }
}

/// In-memory side-channel for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySideChannel {
    map: HashMap<String, String>,
}

#[cfg(test)]
impl SideChannel for MemorySideChannel {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.map.remove(key);
        Ok(())
    }
}

/// Owner of the one mutable cross-view resource: the current session.
/// Booted once per workspace open; all changes go through login/logout.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    /// Read the persisted session. Missing keys or an unrecognized role
    /// value load as anonymous, never as an error.
    pub fn boot(channel: &dyn SideChannel) -> anyhow::Result<Self> {
        let role = channel
            .get(ROLE_KEY)?
            .as_deref()
            .and_then(Role::parse);
        let username = channel.get(USERNAME_KEY)?;
        let current = match (role, username) {
            (Some(role), Some(username)) => Some(Session { role, username }),
            _ => None,
        };
        Ok(Self { current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn login(
        &mut self,
        channel: &mut dyn SideChannel,
        username: &str,
        role: Role,
    ) -> anyhow::Result<Session> {
        channel.set(ROLE_KEY, role.as_str())?;
        channel.set(USERNAME_KEY, username)?;
        let session = Session {
            role,
            username: username.to_string(),
        };
        self.current = Some(session.clone());
        Ok(session)
    }

    pub fn logout(&mut self, channel: &mut dyn SideChannel) -> anyhow::Result<()> {
        channel.remove(ROLE_KEY)?;
        channel.remove(USERNAME_KEY)?;
        self.current = None;
        Ok(())
    }
}
