//! In-memory stand-ins for the Postgres stores and the chat provider.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    chat::{
        dto::{ChatMessage, Role},
        ChatProvider,
    },
    collections::{
        repo::CollectionRepo,
        repo_types::{Collection, CollectionRow},
    },
    error::AppError,
    games::{repo::GameRepo, repo_types::Game, GameInput},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    games: BTreeMap<i64, Game>,
    collections: BTreeMap<i64, CollectionRow>,
    memberships: BTreeSet<(i64, i64)>,
    next_user: i64,
    next_game: i64,
    next_collection: i64,
}

impl Tables {
    fn collection(&self, id: i64) -> Option<Collection> {
        let row = self.collections.get(&id)?.clone();
        let ids = self
            .memberships
            .iter()
            .filter(|(c, _)| *c == id)
            .map(|(_, g)| *g)
            .collect();
        Some(Collection::from_row(row, ids))
    }

    fn owns(&self, id: i64, user_id: i64) -> bool {
        self.collections
            .get(&id)
            .is_some_and(|c| c.user_id == user_id)
    }
}

/// Mirrors the constraints of the SQL schema: unique emails, cascading
/// deletes and the membership foreign key on games.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }
}

fn game_from_input(id: i64, g: &GameInput) -> Game {
    Game {
        id,
        title: g.title.clone(),
        description: g.description.clone(),
        genre: g.genre.clone(),
        age: g.age.clone(),
        person: g.person.clone(),
        avg_time: g.avg_time.clone(),
        difficulty: g.difficulty.clone(),
        image: g.image.clone(),
        rules: g.rules.clone(),
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn save(&self, user: NewUser) -> Result<User, AppError> {
        self.with(|t| {
            if t.users.iter().any(|u| u.email == user.email) {
                return Err(AppError::Conflict("user"));
            }
            t.next_user += 1;
            let saved = User {
                id: t.next_user,
                email: user.email,
                username: user.username,
                password_hash: user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            t.users.push(saved.clone());
            Ok(saved)
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.with(|t| t.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.with(|t| t.users.iter().find(|u| u.id == id).cloned()))
    }
}

#[async_trait]
impl GameRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Game>, AppError> {
        let mut games: Vec<Game> = self.with(|t| t.games.values().cloned().collect());
        games.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(games)
    }

    async fn get(&self, id: i64) -> Result<Option<Game>, AppError> {
        Ok(self.with(|t| t.games.get(&id).cloned()))
    }

    async fn get_many(&self, ids: &[i64]) -> Result<Vec<Game>, AppError> {
        let mut games: Vec<Game> =
            self.with(|t| ids.iter().filter_map(|id| t.games.get(id).cloned()).collect());
        games.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(games)
    }

    async fn create(&self, game: &GameInput) -> Result<i64, AppError> {
        Ok(self.with(|t| {
            t.next_game += 1;
            let id = t.next_game;
            t.games.insert(id, game_from_input(id, game));
            id
        }))
    }

    async fn update(&self, id: i64, game: &GameInput) -> Result<bool, AppError> {
        Ok(self.with(|t| match t.games.get_mut(&id) {
            Some(slot) => {
                *slot = game_from_input(id, game);
                true
            }
            None => false,
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.with(|t| {
            t.memberships.retain(|(_, g)| *g != id);
            t.games.remove(&id).is_some()
        }))
    }
}

#[async_trait]
impl CollectionRepo for MemoryStore {
    async fn list(&self, user_id: i64) -> Result<Vec<Collection>, AppError> {
        let mut out: Vec<Collection> = self.with(|t| {
            t.collections
                .values()
                .filter(|c| c.user_id == user_id)
                .filter_map(|c| t.collection(c.id))
                .collect()
        });
        out.sort_by(|a, b| b.pinned.cmp(&a.pinned).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }

    async fn get(&self, id: i64, user_id: i64) -> Result<Option<Collection>, AppError> {
        Ok(self.with(|t| t.collection(id).filter(|c| c.user_id == user_id)))
    }

    async fn create(&self, user_id: i64, name: &str, pinned: bool) -> Result<Collection, AppError> {
        Ok(self.with(|t| {
            t.next_collection += 1;
            let row = CollectionRow {
                id: t.next_collection,
                user_id,
                name: name.to_string(),
                pinned,
            };
            t.collections.insert(row.id, row.clone());
            Collection::from_row(row, Vec::new())
        }))
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        name: &str,
        pinned: bool,
    ) -> Result<Option<Collection>, AppError> {
        Ok(self.with(|t| {
            if !t.owns(id, user_id) {
                return None;
            }
            if let Some(row) = t.collections.get_mut(&id) {
                row.name = name.to_string();
                row.pinned = pinned;
            }
            t.collection(id)
        }))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.with(|t| {
            if !t.owns(id, user_id) {
                return false;
            }
            t.collections.remove(&id);
            t.memberships.retain(|(c, _)| *c != id);
            true
        }))
    }

    async fn is_owner(&self, id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.with(|t| t.owns(id, user_id)))
    }

    async fn add_game(&self, id: i64, game_id: i64, user_id: i64) -> Result<bool, AppError> {
        self.with(|t| {
            if !t.owns(id, user_id) {
                return Ok(false);
            }
            if !t.games.contains_key(&game_id) {
                return Err(AppError::NotFound("game"));
            }
            t.memberships.insert((id, game_id));
            Ok(true)
        })
    }

    async fn remove_game(&self, id: i64, game_id: i64, user_id: i64) -> Result<bool, AppError> {
        Ok(self.with(|t| {
            if !t.owns(id, user_id) {
                return false;
            }
            t.memberships.remove(&(id, game_id));
            true
        }))
    }
}

/// Chat provider that answers `echo: <last message>` or always fails.
#[derive(Clone)]
pub struct ScriptedProvider {
    fail: bool,
    last: Arc<tokio::sync::Mutex<Option<Vec<ChatMessage>>>>,
}

impl ScriptedProvider {
    pub fn echo() -> Self {
        Self {
            fail: false,
            last: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            last: Arc::default(),
        }
    }

    pub async fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.last.lock().await.clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<ChatMessage> {
        *self.last.lock().await = Some(messages.to_vec());
        // Yield so concurrent callers get a chance to interleave.
        tokio::task::yield_now().await;
        if self.fail {
            anyhow::bail!("provider unavailable");
        }
        let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(ChatMessage {
            role: Role::Assistant,
            content: format!("echo: {prompt}"),
        })
    }
}
