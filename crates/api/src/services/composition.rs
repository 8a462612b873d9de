//! Message composition service.
//!
//! Resolves the user and sprint, picks random praise, template and emoji,
//! renders the template and stores the result. Everything from user
//! resolution to the insert runs in one immediate transaction: a failed
//! composition never leaves a freshly registered user behind, and concurrent
//! compositions queue for the write lock instead of failing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use domain::models::Message;
use domain::services::Notifier;
use metrics::counter;
use persistence::entities::{MessageEntity, UserEntity};
use persistence::repositories::{
    EmojiRepository, MessageRepository, PraiseRepository, SprintRepository, TemplateRepository,
    UserRepository,
};
use persistence::transaction::begin_immediate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::selection::pick_one;
use shared::templating::{render, RenderError, Substitutions};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

/// Errors raised while composing a message.
#[derive(Debug, thiserror::Error)]
pub enum CompositionError {
    #[error("Invalid input: {0} must not be empty")]
    InvalidInput(String),

    #[error("Sprint with code '{0}' not found")]
    SprintNotFound(String),

    #[error("Cannot compose a message: the {pool} pool is empty")]
    EmptyPool { pool: &'static str },

    #[error("A message for '{username}' on sprint '{sprint_code}' already exists")]
    DuplicateMessage {
        username: String,
        sprint_code: String,
    },

    #[error("Failed to render template: {0}")]
    Render(#[from] RenderError),

    #[error("User '{0}' could not be registered")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Composes and stores congratulatory messages.
#[derive(Clone)]
pub struct MessageComposer {
    pool: SqlitePool,
    notifier: Arc<dyn Notifier>,
    suppress_duplicates: bool,
    resolve_mentions: bool,
    mention_timeout: Duration,
    rng: Arc<Mutex<StdRng>>,
}

impl MessageComposer {
    /// Creates a composer with duplicate suppression on and mention lookup off.
    pub fn new(pool: SqlitePool, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            pool,
            notifier,
            suppress_duplicates: true,
            resolve_mentions: false,
            mention_timeout: Duration::from_secs(2),
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    pub fn with_duplicate_suppression(mut self, enabled: bool) -> Self {
        self.suppress_duplicates = enabled;
        self
    }

    /// Enables replacing the username with a chat mention handle.
    pub fn with_mentions(mut self, enabled: bool, timeout: Duration) -> Self {
        self.resolve_mentions = enabled;
        self.mention_timeout = timeout;
        self
    }

    /// Replaces the randomness source, e.g. with a seeded RNG in tests.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Arc::new(Mutex::new(rng));
        self
    }

    /// Composes a message for `username` finishing the sprint `sprint_code`.
    ///
    /// Unknown users are registered on the fly; unknown sprints are an error.
    pub async fn compose_and_create(
        &self,
        username: &str,
        sprint_code: &str,
    ) -> Result<Message, CompositionError> {
        let username = username.trim();
        let sprint_code = sprint_code.trim();
        if username.is_empty() {
            return Err(CompositionError::InvalidInput("username".into()));
        }
        if sprint_code.is_empty() {
            return Err(CompositionError::InvalidInput("sprintCode".into()));
        }

        // Network lookup stays outside the transaction to keep it short.
        let display_name = self.display_name_for(username).await;

        let mut tx = begin_immediate(&self.pool).await?;
        let composed = self
            .compose_in(&mut tx, &display_name, username, sprint_code)
            .await;
        let (message, template_id) = match composed {
            Ok(composed) => composed,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Failed to roll back composition");
                }
                return Err(e);
            }
        };
        tx.commit().await?;

        counter!("messages_composed_total").increment(1);
        info!(
            message_id = message.id,
            username = %username,
            sprint_code = %sprint_code,
            template_id = template_id,
            "Message composed"
        );

        Ok(message.into())
    }

    /// Runs the composition steps on `conn`, which holds the write lock.
    async fn compose_in(
        &self,
        conn: &mut SqliteConnection,
        display_name: &str,
        username: &str,
        sprint_code: &str,
    ) -> Result<(MessageEntity, i64), CompositionError> {
        let user = resolve_user(&mut *conn, username).await?;

        let sprint = SprintRepository::find_by_code_with(&mut *conn, sprint_code)
            .await?
            .ok_or_else(|| CompositionError::SprintNotFound(sprint_code.to_string()))?;

        let praises = PraiseRepository::find_all_with(&mut *conn).await?;
        let templates = TemplateRepository::find_all_with(&mut *conn).await?;
        let emojis = EmojiRepository::find_all_with(&mut *conn).await?;
        for (pool, len) in [
            ("praise", praises.len()),
            ("template", templates.len()),
            ("emoji", emojis.len()),
        ] {
            if len == 0 {
                return Err(CompositionError::EmptyPool { pool });
            }
        }

        if self.suppress_duplicates
            && MessageRepository::exists_for_with(&mut *conn, user.id, sprint.id).await?
        {
            return Err(CompositionError::DuplicateMessage {
                username: username.to_string(),
                sprint_code: sprint_code.to_string(),
            });
        }

        let (praise, template, emoji) = {
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let praise = pick_one(&praises, &mut *rng)
                .map_err(|_| CompositionError::EmptyPool { pool: "praise" })?;
            let template = pick_one(&templates, &mut *rng)
                .map_err(|_| CompositionError::EmptyPool { pool: "template" })?;
            let emoji = pick_one(&emojis, &mut *rng)
                .map_err(|_| CompositionError::EmptyPool { pool: "emoji" })?;
            (praise, template, emoji)
        };

        let substitutions = Substitutions::new()
            .with("username", display_name)
            .with("title", sprint.title.as_str())
            .with("praise", praise.text.as_str())
            .with("emoji", emoji.glyph.as_str());
        let rendered_text = render(&template.text, &substitutions)?;

        let message =
            MessageRepository::create_with(&mut *conn, user.id, sprint.id, &rendered_text).await?;
        Ok((message, template.id))
    }

    async fn display_name_for(&self, username: &str) -> String {
        if !self.resolve_mentions {
            return username.to_string();
        }

        match tokio::time::timeout(
            self.mention_timeout,
            self.notifier.resolve_mention_handle(username),
        )
        .await
        {
            Ok(Some(handle)) => {
                debug!(username = %username, "Resolved chat mention");
                handle
            }
            Ok(None) => username.to_string(),
            Err(_) => {
                warn!(
                    username = %username,
                    timeout_ms = self.mention_timeout.as_millis() as u64,
                    "Mention lookup timed out, using plain username"
                );
                username.to_string()
            }
        }
    }
}

/// Finds the user by username or registers them.
///
/// Runs under the write lock, so no other writer can register the same
/// username between the lookup and the insert.
async fn resolve_user(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<UserEntity, CompositionError> {
    if let Some(user) = UserRepository::find_by_username_with(&mut *conn, username).await? {
        return Ok(user);
    }

    match UserRepository::create_with(&mut *conn, username).await {
        Ok(user) => {
            info!(user_id = user.id, username = %username, "Registered new user");
            Ok(user)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(CompositionError::ConstraintViolation(username.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
