use async_trait::async_trait;
use quiz_core::model::{
    Function, FunctionId, Level, Module, ModuleId, QuizItem, User, UserId,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewUserRecord {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username().to_owned(),
            password: user.password().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            email: user.email().to_owned(),
        }
    }

    /// Validate the record as a `User` carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any field is invalid.
    pub fn into_user(self, id: UserId) -> Result<User, StorageError> {
        rebuild(User::new(
            id,
            self.username,
            self.password,
            self.first_name,
            self.last_name,
            self.email,
        ))
    }
}

/// Insert shape for a module; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewModuleRecord {
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub additional_info: Option<String>,
}

impl NewModuleRecord {
    #[must_use]
    pub fn from_module(module: &Module) -> Self {
        Self {
            owner: module.owner(),
            name: module.name().to_owned(),
            description: module.description().to_owned(),
            additional_info: module.additional_info().map(str::to_owned),
        }
    }

    /// Validate the record as a `Module` carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any field is invalid.
    pub fn into_module(self, id: ModuleId) -> Result<Module, StorageError> {
        rebuild(Module::new(
            id,
            self.owner,
            self.name,
            self.description,
            self.additional_info,
        ))
    }
}

/// Insert shape for a function; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewFunctionRecord {
    pub module_id: ModuleId,
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub additional_info: Option<String>,
    pub sample_code: Option<String>,
    pub output: Option<String>,
}

impl NewFunctionRecord {
    #[must_use]
    pub fn from_function(function: &Function) -> Self {
        Self {
            module_id: function.module_id(),
            owner: function.owner(),
            name: function.name().to_owned(),
            description: function.description().to_owned(),
            additional_info: function.additional_info().map(str::to_owned),
            sample_code: function.sample_code().map(str::to_owned),
            output: function.output().map(str::to_owned),
        }
    }

    /// Validate the record as a `Function` carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any field is invalid.
    pub fn into_function(self, id: FunctionId) -> Result<Function, StorageError> {
        let function = rebuild(
            Function::new(id, self.module_id, self.owner, self.name, self.description)
                .and_then(|f| f.with_sample(self.sample_code, self.output)),
        )?;
        Ok(function.with_additional_info(self.additional_info))
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the username is taken.
    async fn insert_new_user(&self, user: NewUserRecord) -> Result<UserId, StorageError>;

    /// Fetch a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Fetch a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
}

#[async_trait]
pub trait LevelRepository: Send + Sync {
    /// Fetch progress for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_level(&self, user_id: UserId) -> Result<Option<Level>, StorageError>;

    /// Persist or replace progress for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist.
    async fn upsert_level(&self, level: &Level) -> Result<(), StorageError>;
}

#[async_trait]
pub trait ModuleRepository: Send + Sync {
    /// Insert a new module and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the owner does not exist.
    async fn insert_new_module(&self, module: NewModuleRecord) -> Result<ModuleId, StorageError>;

    /// Fetch a module by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_module(&self, id: ModuleId) -> Result<Option<Module>, StorageError>;

    /// List modules ordered by ID, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_modules(&self, limit: u32) -> Result<Vec<Module>, StorageError>;
}

#[async_trait]
pub trait FunctionRepository: Send + Sync {
    /// Insert a new function and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the owner or module does not exist.
    async fn insert_new_function(
        &self,
        function: NewFunctionRecord,
    ) -> Result<FunctionId, StorageError>;

    /// Fetch a function by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn get_function(&self, id: FunctionId) -> Result<Option<Function>, StorageError>;

    /// List functions in a module ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn functions_in_module(&self, module_id: ModuleId)
    -> Result<Vec<Function>, StorageError>;

    /// All functions with both sample code and output, as quiz items, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn eligible_quiz_items(&self) -> Result<Vec<QuizItem>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<BTreeMap<UserId, User>>>,
    levels: Arc<Mutex<BTreeMap<UserId, Level>>>,
    modules: Arc<Mutex<BTreeMap<ModuleId, Module>>>,
    functions: Arc<Mutex<BTreeMap<FunctionId, Function>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    m.lock().map_err(|e| StorageError::Connection(e.to_string()))
}

fn next_id<K: Copy, V>(map: &BTreeMap<K, V>, value: impl Fn(K) -> u64) -> u64 {
    map.keys().next_back().map_or(1, |k| value(*k) + 1)
}

fn rebuild<T, E: std::fmt::Display>(res: Result<T, E>) -> Result<T, StorageError> {
    res.map_err(|e| StorageError::Serialization(e.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_new_user(&self, user: NewUserRecord) -> Result<UserId, StorageError> {
        let mut guard = lock(&self.users)?;
        if guard.values().any(|u| u.username() == user.username) {
            return Err(StorageError::Conflict);
        }
        let id = UserId::new(next_id(&*guard, |k| k.value()));
        let stored = user.into_user(id)?;
        guard.insert(id, stored);
        Ok(id)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let guard = lock(&self.users)?;
        Ok(guard.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let guard = lock(&self.users)?;
        Ok(guard.values().find(|u| u.username() == username).cloned())
    }
}

#[async_trait]
impl LevelRepository for InMemoryRepository {
    async fn get_level(&self, user_id: UserId) -> Result<Option<Level>, StorageError> {
        let guard = lock(&self.levels)?;
        Ok(guard.get(&user_id).copied())
    }

    async fn upsert_level(&self, level: &Level) -> Result<(), StorageError> {
        if !lock(&self.users)?.contains_key(&level.user_id()) {
            return Err(StorageError::NotFound);
        }
        lock(&self.levels)?.insert(level.user_id(), *level);
        Ok(())
    }
}

#[async_trait]
impl ModuleRepository for InMemoryRepository {
    async fn insert_new_module(&self, module: NewModuleRecord) -> Result<ModuleId, StorageError> {
        if !lock(&self.users)?.contains_key(&module.owner) {
            return Err(StorageError::NotFound);
        }
        let mut guard = lock(&self.modules)?;
        let id = ModuleId::new(next_id(&*guard, |k| k.value()));
        let stored = module.into_module(id)?;
        guard.insert(id, stored);
        Ok(id)
    }

    async fn get_module(&self, id: ModuleId) -> Result<Option<Module>, StorageError> {
        let guard = lock(&self.modules)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_modules(&self, limit: u32) -> Result<Vec<Module>, StorageError> {
        let guard = lock(&self.modules)?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard.values().take(limit).cloned().collect())
    }
}

#[async_trait]
impl FunctionRepository for InMemoryRepository {
    async fn insert_new_function(
        &self,
        function: NewFunctionRecord,
    ) -> Result<FunctionId, StorageError> {
        if !lock(&self.users)?.contains_key(&function.owner)
            || !lock(&self.modules)?.contains_key(&function.module_id)
        {
            return Err(StorageError::NotFound);
        }
        let mut guard = lock(&self.functions)?;
        let id = FunctionId::new(next_id(&*guard, |k| k.value()));
        let stored = function.into_function(id)?;
        guard.insert(id, stored);
        Ok(id)
    }

    async fn get_function(&self, id: FunctionId) -> Result<Option<Function>, StorageError> {
        let guard = lock(&self.functions)?;
        Ok(guard.get(&id).cloned())
    }

    async fn functions_in_module(
        &self,
        module_id: ModuleId,
    ) -> Result<Vec<Function>, StorageError> {
        let guard = lock(&self.functions)?;
        Ok(guard
            .values()
            .filter(|f| f.module_id() == module_id)
            .cloned()
            .collect())
    }

    async fn eligible_quiz_items(&self) -> Result<Vec<QuizItem>, StorageError> {
        let guard = lock(&self.functions)?;
        Ok(guard.values().filter_map(Function::quiz_item).collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub levels: Arc<dyn LevelRepository>,
    pub modules: Arc<dyn ModuleRepository>,
    pub functions: Arc<dyn FunctionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let levels: Arc<dyn LevelRepository> = Arc::new(repo.clone());
        let modules: Arc<dyn ModuleRepository> = Arc::new(repo.clone());
        let functions: Arc<dyn FunctionRepository> = Arc::new(repo);
        Self {
            users,
            levels,
            modules,
            functions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_record(username: &str) -> NewUserRecord {
        NewUserRecord {
            username: username.into(),
            password: "pw".into(),
            first_name: "testf".into(),
            last_name: "testl".into(),
            email: "test@gmail.com".into(),
        }
    }

    fn function_record(
        owner: UserId,
        module_id: ModuleId,
        code: Option<&str>,
        output: Option<&str>,
    ) -> NewFunctionRecord {
        NewFunctionRecord {
            module_id,
            owner,
            name: "func".into(),
            description: "funcdesc".into(),
            additional_info: None,
            sample_code: code.map(str::to_owned),
            output: output.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_and_rejects_duplicate_usernames() {
        let repo = InMemoryRepository::new();
        let first = repo.insert_new_user(user_record("user")).await.unwrap();
        let second = repo.insert_new_user(user_record("other")).await.unwrap();
        assert_eq!(first, UserId::new(1));
        assert_eq!(second, UserId::new(2));

        let dup = repo.insert_new_user(user_record("user")).await;
        assert!(matches!(dup, Err(StorageError::Conflict)));

        let found = repo.find_by_username("other").await.unwrap().unwrap();
        assert_eq!(found.id(), second);
    }

    #[tokio::test]
    async fn eligible_items_skip_functions_without_sample_or_output() {
        let repo = InMemoryRepository::new();
        let owner = repo.insert_new_user(user_record("user")).await.unwrap();
        let module_id = repo
            .insert_new_module(NewModuleRecord {
                owner,
                name: "testmod".into(),
                description: "moddesc".into(),
                additional_info: None,
            })
            .await
            .unwrap();

        for (code, output) in [
            (Some("code1"), Some("output1")),
            (Some("code2"), None),
            (None, Some("output3")),
            (Some("code4"), Some("")),
            (Some("code5"), Some("output5")),
        ] {
            repo.insert_new_function(function_record(owner, module_id, code, output))
                .await
                .unwrap();
        }

        let items = repo.eligible_quiz_items().await.unwrap();
        let codes: Vec<_> = items.iter().map(QuizItem::sample_code).collect();
        assert_eq!(codes, vec!["code1", "code5"]);
        assert_eq!(repo.functions_in_module(module_id).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn function_requires_existing_module() {
        let repo = InMemoryRepository::new();
        let owner = repo.insert_new_user(user_record("user")).await.unwrap();
        let res = repo
            .insert_new_function(function_record(owner, ModuleId::new(9), None, None))
            .await;
        assert!(matches!(res, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn level_round_trips_for_known_user() {
        let repo = InMemoryRepository::new();
        let owner = repo.insert_new_user(user_record("user")).await.unwrap();
        let level = Level::from_persisted(owner, 5, 25);
        repo.upsert_level(&level).await.unwrap();
        assert_eq!(repo.get_level(owner).await.unwrap(), Some(level));

        let orphan = Level::new(UserId::new(99));
        assert!(matches!(
            repo.upsert_level(&orphan).await,
            Err(StorageError::NotFound)
        ));
    }
}
