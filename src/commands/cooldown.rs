//! Per-bucket cooldowns.

use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::error::CommandError;
use crate::interaction::Interaction;

/// Scope a cooldown or concurrency limit is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketType {
    /// One bucket shared by every invocation.
    #[default]
    Default,
    User,
    /// Per guild, falling back to the user in direct messages.
    Guild,
    Channel,
    /// Per user within a guild.
    Member,
}

impl BucketType {
    /// The bucket key an interaction falls into.
    pub fn key(&self, inter: &Interaction) -> String {
        match self {
            Self::Default => "global".to_string(),
            Self::User => format!("user:{}", inter.author_id()),
            Self::Guild => match inter.guild_id() {
                Some(guild) => format!("guild:{guild}"),
                None => format!("user:{}", inter.author_id()),
            },
            Self::Channel => format!("channel:{}", inter.channel_id()),
            Self::Member => format!(
                "member:{}:{}",
                inter.guild_id().unwrap_or_default(),
                inter.author_id()
            ),
        }
    }
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::User => write!(f, "user"),
            Self::Guild => write!(f, "guild"),
            Self::Channel => write!(f, "channel"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// Allow `rate` invocations every `per`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub rate: u32,
    pub per: Duration,
}

impl Cooldown {
    pub fn new(rate: u32, per: Duration) -> Self {
        Self { rate, per }
    }
}

#[derive(Debug)]
struct Window {
    tokens: u32,
    opened: Instant,
}

/// Cooldown state for every bucket of one command.
#[derive(Debug)]
pub struct CooldownMapping {
    cooldown: Cooldown,
    bucket: BucketType,
    windows: Mutex<HashMap<String, Window>>,
}

impl CooldownMapping {
    pub fn new(cooldown: Cooldown, bucket: BucketType) -> Self {
        Self {
            cooldown,
            bucket,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    pub fn bucket(&self) -> BucketType {
        self.bucket
    }

    /// Consume one token from the interaction's bucket.
    ///
    /// Returns [`CommandError::CommandOnCooldown`] with the time left in the
    /// current window when the bucket is empty.
    pub fn update_rate_limit(&self, inter: &Interaction) -> Result<(), CommandError> {
        let now = Instant::now();
        let key = self.bucket.key(inter);
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        // drop windows that already expired so the map tracks only active buckets
        windows.retain(|_, w| now.duration_since(w.opened) < self.cooldown.per);

        let window = windows.entry(key).or_insert(Window {
            tokens: self.cooldown.rate,
            opened: now,
        });

        if window.tokens == 0 {
            let elapsed = now.duration_since(window.opened);
            return Err(CommandError::CommandOnCooldown {
                retry_after: self.cooldown.per.saturating_sub(elapsed),
            });
        }

        window.tokens -= 1;
        Ok(())
    }

    /// Forget the cooldown state of the interaction's bucket.
    pub fn reset(&self, inter: &Interaction) {
        let key = self.bucket.key(inter);
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
    }
}
