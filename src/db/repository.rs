//! Database repository implementing the Meetling application operations.
//!
//! Lookups of unknown identifiers fail with [`AppError::NotFound`], edits of objects the
//! current user may not touch fail with [`AppError::Permission`].

use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::{Executor, Row, Sqlite, SqlitePool, Transaction};

use crate::errors::AppError;
use crate::models::{
    add_author, AgendaItem, AgendaItemEdit, Editable, Meeting, MeetingEdit, NewAgendaItem,
    NewMeeting, Settings, SettingsEdit, User, UserEdit, DEFAULT_USER_NAME, SETTINGS_ID,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Find the user holding the authentication secret (or login code) `secret`.
    ///
    /// Returns `None` for an unknown secret.
    pub async fn authenticate(&self, secret: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, name, auth_secret FROM users WHERE auth_secret = ?")
            .bind(secret)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a new anonymous user with a fresh authentication secret.
    pub async fn login(&self) -> Result<User, AppError> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: DEFAULT_USER_NAME.to_string(),
            auth_secret: uuid::Uuid::new_v4().simple().to_string(),
        };

        sqlx::query("INSERT INTO users (id, name, auth_secret, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.auth_secret)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        tracing::debug!(user_id = %user.id, "Created new user");
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User, AppError> {
        fetch_user(&self.pool, id).await
    }

    /// Get the users with the given IDs, in the given order. Unknown IDs are skipped.
    pub async fn users_by_ids(&self, ids: &[String]) -> Result<Vec<User>, AppError> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_user(id).await {
                Ok(user) => users.push(user),
                Err(AppError::NotFound(_)) => {
                    tracing::warn!(user_id = %id, "Author refers to unknown user");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(users)
    }

    /// Edit a user. Only the user themselves may do so.
    pub async fn edit_user(
        &self,
        id: &str,
        edit: UserEdit,
        editor: Option<&User>,
    ) -> Result<User, AppError> {
        let mut tx = self
            .begin_edit("UPDATE users SET name = name WHERE id = ?", id)
            .await?;
        let mut user = fetch_user(&mut *tx, id).await?;
        if editor.map(|e| e.id.as_str()) != Some(user.id.as_str()) {
            return Err(AppError::Permission);
        }
        edit.apply(&mut user)?;

        sqlx::query("UPDATE users SET name = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(user)
    }

    // ==================== SETTINGS OPERATIONS ====================

    /// Get the settings singleton.
    pub async fn get_settings(&self) -> Result<Settings, AppError> {
        fetch_settings(&self.pool).await
    }

    /// Edit the settings singleton.
    pub async fn edit_settings(
        &self,
        edit: SettingsEdit,
        editor: Option<&User>,
    ) -> Result<Settings, AppError> {
        let mut tx = self
            .begin_edit("UPDATE settings SET title = title WHERE id = ?", SETTINGS_ID)
            .await?;
        let mut settings = fetch_settings(&mut *tx).await?;
        edit.apply(&mut settings)?;
        add_author(&mut settings.authors, editor.map(|u| u.id.as_str()));

        sqlx::query(
            "UPDATE settings SET title = ?, icon = ?, favicon = ?, authors = ? WHERE id = ?",
        )
        .bind(&settings.title)
        .bind(&settings.icon)
        .bind(&settings.favicon)
        .bind(authors_json(&settings.authors))
        .bind(SETTINGS_ID)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(settings)
    }

    // ==================== MEETING OPERATIONS ====================

    /// Create a new meeting.
    pub async fn create_meeting(
        &self,
        new: NewMeeting,
        editor: Option<&User>,
    ) -> Result<Meeting, AppError> {
        let mut authors = Vec::new();
        add_author(&mut authors, editor.map(|u| u.id.as_str()));
        let meeting = Meeting {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            time: new.time,
            location: new.location,
            description: new.description,
            authors,
        };

        sqlx::query(
            "INSERT INTO meetings (id, title, time, location, description, authors) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&meeting.id)
        .bind(&meeting.title)
        .bind(meeting.time)
        .bind(&meeting.location)
        .bind(&meeting.description)
        .bind(authors_json(&meeting.authors))
        .execute(&self.pool)
        .await?;

        tracing::debug!(meeting_id = %meeting.id, "Created meeting");
        Ok(meeting)
    }

    /// Create a meeting filled with sample data, to show off what Meetling can do.
    pub async fn create_example_meeting(&self, editor: Option<&User>) -> Result<Meeting, AppError> {
        let time = (Utc::now() + Duration::days(7))
            .date_naive()
            .and_hms_opt(12, 0, 0)
            .map(|t| t.and_utc());

        let meeting = self
            .create_meeting(
                NewMeeting::new(
                    "Working group meeting",
                    time,
                    Some("At the office"),
                    Some("We meet and discuss important issues."),
                )?,
                editor,
            )
            .await?;

        let items = [
            ("Round of introductions", None, None),
            (
                "Lunch poll",
                Some(30),
                Some("What will we have for lunch today?"),
            ),
            (
                "Next meeting",
                Some(5),
                Some("When and where will our next meeting be?"),
            ),
        ];
        for (title, duration, description) in items {
            self.create_agenda_item(
                &meeting.id,
                NewAgendaItem::new(title, duration, description)?,
                editor,
            )
            .await?;
        }

        Ok(meeting)
    }

    /// Get a meeting by ID.
    pub async fn get_meeting(&self, id: &str) -> Result<Meeting, AppError> {
        fetch_meeting(&self.pool, id).await
    }

    /// Edit a meeting. Omitted fields keep their value.
    pub async fn edit_meeting(
        &self,
        id: &str,
        edit: MeetingEdit,
        editor: Option<&User>,
    ) -> Result<Meeting, AppError> {
        let mut tx = self
            .begin_edit("UPDATE meetings SET title = title WHERE id = ?", id)
            .await?;
        let mut meeting = fetch_meeting(&mut *tx, id).await?;
        edit.apply(&mut meeting)?;
        add_author(&mut meeting.authors, editor.map(|u| u.id.as_str()));

        sqlx::query(
            "UPDATE meetings SET title = ?, time = ?, location = ?, description = ?, authors = ? WHERE id = ?",
        )
        .bind(&meeting.title)
        .bind(meeting.time)
        .bind(&meeting.location)
        .bind(&meeting.description)
        .bind(authors_json(&meeting.authors))
        .bind(&meeting.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(meeting)
    }

    // ==================== AGENDA ITEM OPERATIONS ====================

    /// List the agenda of a meeting, in creation order.
    pub async fn list_agenda_items(&self, meeting_id: &str) -> Result<Vec<AgendaItem>, AppError> {
        let meeting = self.get_meeting(meeting_id).await?;

        let rows = sqlx::query(
            "SELECT id, meeting_id, title, duration, description, authors FROM agenda_items WHERE meeting_id = ? ORDER BY rowid",
        )
        .bind(&meeting.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(agenda_item_from_row).collect())
    }

    /// Add an agenda item to a meeting.
    pub async fn create_agenda_item(
        &self,
        meeting_id: &str,
        new: NewAgendaItem,
        editor: Option<&User>,
    ) -> Result<AgendaItem, AppError> {
        let meeting = self.get_meeting(meeting_id).await?;

        let mut authors = Vec::new();
        add_author(&mut authors, editor.map(|u| u.id.as_str()));
        let item = AgendaItem {
            id: uuid::Uuid::new_v4().to_string(),
            meeting_id: meeting.id,
            title: new.title,
            duration: new.duration,
            description: new.description,
            authors,
        };

        sqlx::query(
            "INSERT INTO agenda_items (id, meeting_id, title, duration, description, authors) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.meeting_id)
        .bind(&item.title)
        .bind(item.duration)
        .bind(&item.description)
        .bind(authors_json(&item.authors))
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Get an agenda item of a meeting by ID.
    pub async fn get_agenda_item(
        &self,
        meeting_id: &str,
        item_id: &str,
    ) -> Result<AgendaItem, AppError> {
        let meeting = self.get_meeting(meeting_id).await?;
        fetch_agenda_item(&self.pool, &meeting.id, item_id).await
    }

    /// Edit an agenda item. Omitted fields keep their value.
    pub async fn edit_agenda_item(
        &self,
        meeting_id: &str,
        item_id: &str,
        edit: AgendaItemEdit,
        editor: Option<&User>,
    ) -> Result<AgendaItem, AppError> {
        let meeting = self.get_meeting(meeting_id).await?;
        let mut tx = self
            .begin_edit("UPDATE agenda_items SET title = title WHERE id = ?", item_id)
            .await?;
        let mut item = fetch_agenda_item(&mut *tx, &meeting.id, item_id).await?;
        edit.apply(&mut item)?;
        add_author(&mut item.authors, editor.map(|u| u.id.as_str()));

        sqlx::query(
            "UPDATE agenda_items SET title = ?, duration = ?, description = ?, authors = ? WHERE id = ?",
        )
        .bind(&item.title)
        .bind(item.duration)
        .bind(&item.description)
        .bind(authors_json(&item.authors))
        .bind(&item.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(item)
    }

    /// Start the transaction of an edit.
    ///
    /// `touch` is a no-op write on the edited row. Running it first takes the SQLite
    /// write lock before anything is read, so concurrent edits of the same data run one
    /// after the other and never write back stale fields.
    async fn begin_edit(
        &self,
        touch: &'static str,
        id: &str,
    ) -> Result<Transaction<'static, Sqlite>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(touch).bind(id).execute(&mut *tx).await?;
        Ok(tx)
    }

    // ==================== JSON ====================

    /// JSON representation of an editable object.
    ///
    /// With `include_users` the authors are embedded as public user objects.
    pub async fn json<T: Editable>(&self, object: &T, include_users: bool) -> Result<Value, AppError> {
        let mut fields = object.json_fields();
        fields.insert("author_ids".to_string(), object.authors().into());
        if include_users {
            let authors = self.users_by_ids(object.authors()).await?;
            fields.insert(
                "authors".to_string(),
                authors.iter().map(|u| u.json(true)).collect(),
            );
        }
        Ok(Value::Object(fields))
    }
}

// Row lookups, usable on the pool or inside a transaction

async fn fetch_user<'e, E>(executor: E, id: &str) -> Result<User, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT id, name, auth_secret FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.as_ref()
        .map(user_from_row)
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
}

async fn fetch_settings<'e, E>(executor: E) -> Result<Settings, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT title, icon, favicon, authors FROM settings WHERE id = ?")
        .bind(SETTINGS_ID)
        .fetch_optional(executor)
        .await?;

    row.as_ref()
        .map(settings_from_row)
        .ok_or_else(|| AppError::Internal("settings missing from database".to_string()))
}

async fn fetch_meeting<'e, E>(executor: E, id: &str) -> Result<Meeting, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT id, title, time, location, description, authors FROM meetings WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    row.as_ref()
        .map(meeting_from_row)
        .ok_or_else(|| AppError::NotFound(format!("Meeting {}", id)))
}

async fn fetch_agenda_item<'e, E>(
    executor: E,
    meeting_id: &str,
    item_id: &str,
) -> Result<AgendaItem, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT id, meeting_id, title, duration, description, authors FROM agenda_items WHERE meeting_id = ? AND id = ?",
    )
    .bind(meeting_id)
    .bind(item_id)
    .fetch_optional(executor)
    .await?;

    row.as_ref()
        .map(agenda_item_from_row)
        .ok_or_else(|| AppError::NotFound(format!("AgendaItem {}", item_id)))
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        auth_secret: row.get("auth_secret"),
    }
}

fn settings_from_row(row: &sqlx::sqlite::SqliteRow) -> Settings {
    let authors: String = row.get("authors");
    Settings {
        title: row.get("title"),
        icon: row.get("icon"),
        favicon: row.get("favicon"),
        authors: parse_json_array(&authors),
    }
}

fn meeting_from_row(row: &sqlx::sqlite::SqliteRow) -> Meeting {
    let authors: String = row.get("authors");
    Meeting {
        id: row.get("id"),
        title: row.get("title"),
        time: row.get("time"),
        location: row.get("location"),
        description: row.get("description"),
        authors: parse_json_array(&authors),
    }
}

fn agenda_item_from_row(row: &sqlx::sqlite::SqliteRow) -> AgendaItem {
    let authors: String = row.get("authors");
    AgendaItem {
        id: row.get("id"),
        meeting_id: row.get("meeting_id"),
        title: row.get("title"),
        duration: row.get("duration"),
        description: row.get("description"),
        authors: parse_json_array(&authors),
    }
}

fn authors_json(authors: &[String]) -> String {
    serde_json::to_string(authors).unwrap_or_else(|_| "[]".to_string())
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
