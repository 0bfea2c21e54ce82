//! [`AccountService`]: the five account operations.

use common::{
    protocol::{Account, AccountResponse, AccountsDocument},
    ServiceError,
};
use tracing::info;

use super::validate::AccountInput;
use crate::crypto::FieldEncryptor;
use crate::store::DocumentStore;

/// Orchestrates account CRUD over the [`DocumentStore`].
///
/// Cheap to clone; every field is `Arc`-backed.
#[derive(Clone)]
pub struct AccountService {
    store: DocumentStore,
    encryptor: FieldEncryptor,
}

impl AccountService {
    pub fn new(store: DocumentStore, encryptor: FieldEncryptor) -> Self {
        Self { store, encryptor }
    }

    /// Returns `true` if passwords can be encrypted, i.e. create and update
    /// can succeed.
    pub fn encryption_ready(&self) -> bool {
        self.encryptor.is_configured()
    }

    /// Add a new account. Fails with NotAllowed if the ID is taken.
    pub async fn create(
        &self,
        account_id: &str,
        input: AccountInput,
    ) -> Result<AccountResponse, ServiceError> {
        let mut snapshot = self.store.snapshot().await?;
        if snapshot.accounts.contains_key(account_id) {
            return Err(ServiceError::not_allowed(format!(
                "AccountId : {account_id} already exist."
            )));
        }

        let account = self.seal(input).await?;
        snapshot
            .accounts
            .insert(account_id.to_owned(), account.clone());
        self.store.upload(&snapshot.accounts, snapshot.etag).await?;

        info!(account_id, "account created");
        Ok(AccountResponse::new(
            201,
            single(account_id, account),
            "Account Created",
        ))
    }

    /// Fetch one account, password stripped.
    pub async fn get(&self, account_id: &str) -> Result<AccountResponse, ServiceError> {
        let mut accounts = self.store.download().await?;
        let account = accounts
            .remove(account_id)
            .ok_or_else(|| no_data_for(account_id))?;

        Ok(AccountResponse::new(
            200,
            single(account_id, account),
            "Account Details",
        ))
    }

    /// Fetch every account, passwords stripped. An empty document is NotFound.
    pub async fn list(&self) -> Result<AccountResponse, ServiceError> {
        let accounts = self.store.download().await?;
        if accounts.is_empty() {
            return Err(ServiceError::not_found("No content in the file."));
        }

        Ok(AccountResponse::new(200, accounts, "Accounts List"))
    }

    /// Replace an existing account's fields. Fails with NotFound if the ID is
    /// unknown.
    pub async fn update(
        &self,
        account_id: &str,
        input: AccountInput,
    ) -> Result<AccountResponse, ServiceError> {
        let mut snapshot = self.store.snapshot().await?;
        if !snapshot.accounts.contains_key(account_id) {
            return Err(no_data_for(account_id));
        }

        let account = self.seal(input).await?;
        snapshot
            .accounts
            .insert(account_id.to_owned(), account.clone());
        self.store.upload(&snapshot.accounts, snapshot.etag).await?;

        info!(account_id, "account updated");
        Ok(AccountResponse::new(
            200,
            single(account_id, account),
            format!("Updated account {account_id} with new data."),
        ))
    }

    /// Remove an account and return it, password stripped. Fails with NotFound
    /// if the ID is unknown.
    pub async fn delete(&self, account_id: &str) -> Result<AccountResponse, ServiceError> {
        let mut snapshot = self.store.snapshot().await?;
        let removed = snapshot
            .accounts
            .remove(account_id)
            .ok_or_else(|| no_data_for(account_id))?;
        self.store.upload(&snapshot.accounts, snapshot.etag).await?;

        info!(account_id, "account deleted");
        Ok(AccountResponse::new(
            200,
            single(account_id, removed.redacted()),
            "Account Deleted",
        ))
    }

    /// Build the stored form of `input`, encrypting the password.
    async fn seal(&self, input: AccountInput) -> Result<Account, ServiceError> {
        let encrypted = self.encryptor.encrypt(&input.api_password).await?;
        Ok(Account {
            account_type: input.account_type,
            api_key: input.api_key,
            api_password: Some(encrypted.to_string()),
        })
    }
}

fn single(account_id: &str, account: Account) -> AccountsDocument {
    AccountsDocument::from([(account_id.to_owned(), account)])
}

fn no_data_for(account_id: &str) -> ServiceError {
    ServiceError::not_found(format!("No Data found for accountId : {account_id}"))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::crypto::cipher::tests::{decrypt, test_encryptor, test_key};
    use crate::crypto::{FieldEncryptor, OsRandom};
    use crate::store::memory::MemoryObjectStore;
    use common::ErrorKind;
    use serde_json::json;

    pub(crate) const BUCKET: &str = "test-bucket";
    pub(crate) const KEY: &str = "test-key";

    pub(crate) fn seeded_document() -> AccountsDocument {
        serde_json::from_value(json!({
            "a1": {"accountType": 1, "apiKey": "k1", "apiPassword": "000102:0a0b"},
            "a2": {"accountType": 2, "apiKey": "k2", "apiPassword": "0c0d0e:0f10"}
        }))
        .unwrap()
    }

    pub(crate) fn service_over(
        backend: Arc<MemoryObjectStore>,
        encryptor: FieldEncryptor,
    ) -> AccountService {
        AccountService::new(DocumentStore::new(backend, BUCKET, KEY), encryptor)
    }

    async fn seeded() -> (Arc<MemoryObjectStore>, AccountService) {
        let backend = Arc::new(MemoryObjectStore::new());
        backend
            .insert_document(BUCKET, KEY, &seeded_document())
            .await;
        let service = service_over(backend.clone(), test_encryptor());
        (backend, service)
    }

    fn input(password: &str) -> AccountInput {
        AccountInput::from_json(&json!({
            "accountType": 7,
            "apiKey": "new-key",
            "apiPassword": password
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_adds_exactly_one_encrypted_account() {
        let (backend, service) = seeded().await;

        let resp = service.create("a3", input("s3cr3t")).await.unwrap();
        assert_eq!(resp.status_code, 201);
        assert_eq!(resp.message.as_deref(), Some("Account Created"));

        let stored = backend.document(BUCKET, KEY).await.unwrap();
        assert_eq!(stored.len(), 3);
        let created = &stored["a3"];
        assert_eq!(created.api_key, "new-key");
        let ciphertext = created.api_password.as_deref().unwrap();
        assert_ne!(ciphertext, "s3cr3t");
        assert_eq!(decrypt(ciphertext, &test_key()), "s3cr3t");

        let returned = resp.account.unwrap();
        assert_eq!(returned.len(), 1);
        assert_eq!(returned["a3"].api_password.as_deref(), Some(ciphertext));
    }

    #[tokio::test]
    async fn writes_keep_other_accounts_ciphertext() {
        let (backend, service) = seeded().await;
        service.create("a3", input("pw")).await.unwrap();
        service.update("a3", input("pw2")).await.unwrap();
        service.delete("a3").await.unwrap();

        let stored = backend.document(BUCKET, KEY).await.unwrap();
        assert_eq!(stored, seeded_document());
    }

    #[tokio::test]
    async fn create_existing_id_is_not_allowed() {
        let (backend, service) = seeded().await;

        let err = service.create("a1", input("pw")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAllowed);
        assert!(err.message().contains("a1"));
        assert_eq!(
            backend.document(BUCKET, KEY).await.unwrap(),
            seeded_document()
        );
    }

    #[tokio::test]
    async fn create_without_data_key_is_not_allowed() {
        let backend = Arc::new(MemoryObjectStore::new());
        backend
            .insert_document(BUCKET, KEY, &seeded_document())
            .await;
        let service = service_over(backend.clone(), FieldEncryptor::new(None, Arc::new(OsRandom)));
        assert!(!service.encryption_ready());

        let err = service.create("a3", input("pw")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAllowed);
        assert_eq!(backend.document(BUCKET, KEY).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_without_data_key_is_not_allowed() {
        let backend = Arc::new(MemoryObjectStore::new());
        backend
            .insert_document(BUCKET, KEY, &seeded_document())
            .await;
        let service = service_over(backend.clone(), FieldEncryptor::new(None, Arc::new(OsRandom)));

        let err = service.update("a1", input("pw")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAllowed);
        assert_eq!(err.message(), "DATA_KEY is not configured");
        assert_eq!(
            backend.document(BUCKET, KEY).await.unwrap(),
            seeded_document()
        );
    }

    #[tokio::test]
    async fn one_malformed_entry_fails_every_operation() {
        let backend = Arc::new(MemoryObjectStore::new());
        let body = json!({
            "a1": {"accountType": 1, "apiKey": "k1", "apiPassword": "00:11"},
            "bad": {"accountType": "1"}
        });
        backend
            .insert_raw(BUCKET, KEY, body.to_string().into())
            .await;
        let service = service_over(backend, test_encryptor());

        let errors = [
            service.list().await.unwrap_err(),
            service.get("a1").await.unwrap_err(),
            service.create("a3", input("pw")).await.unwrap_err(),
            service.update("a1", input("pw")).await.unwrap_err(),
            service.delete("bad").await.unwrap_err(),
        ];
        for err in errors {
            assert_eq!(err.kind(), ErrorKind::Internal);
            assert!(err.message().starts_with("accounts document is malformed"));
        }
    }

    #[tokio::test]
    async fn create_without_document_is_not_found() {
        let service = service_over(Arc::new(MemoryObjectStore::new()), test_encryptor());
        let err = service.create("a1", input("pw")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn get_returns_single_redacted_account() {
        let (_, service) = seeded().await;

        let resp = service.get("a2").await.unwrap();
        assert_eq!(resp.status_code, 200);
        let account = resp.account.unwrap();
        assert_eq!(account.len(), 1);
        assert_eq!(account["a2"].api_key, "k2");
        assert!(account["a2"].api_password.is_none());
    }

    #[tokio::test]
    async fn get_missing_id_is_not_found() {
        let (_, service) = seeded().await;
        let err = service.get("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "No Data found for accountId : nope");
    }

    #[tokio::test]
    async fn list_returns_all_redacted() {
        let (_, service) = seeded().await;
        let resp = service.list().await.unwrap();
        let accounts = resp.account.unwrap();
        assert_eq!(accounts.len(), 2);
        assert!(accounts.values().all(|a| a.api_password.is_none()));
    }

    #[tokio::test]
    async fn list_empty_document_is_not_found() {
        let backend = Arc::new(MemoryObjectStore::new());
        backend
            .insert_document(BUCKET, KEY, &AccountsDocument::new())
            .await;
        let service = service_over(backend, test_encryptor());

        let err = service.list().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "No content in the file.");
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let (_, service) = seeded().await;
        let err = service.update("nope", input("pw")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn update_rewrites_only_that_account() {
        let (backend, service) = seeded().await;

        let resp = service.update("a1", input("rotated")).await.unwrap();
        assert_eq!(resp.status_code, 200);
        assert_eq!(
            resp.message.as_deref(),
            Some("Updated account a1 with new data.")
        );

        let stored = backend.document(BUCKET, KEY).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored["a1"].api_key, "new-key");
        assert_eq!(stored["a1"].account_type, serde_json::Number::from(7));
        assert_eq!(
            decrypt(stored["a1"].api_password.as_deref().unwrap(), &test_key()),
            "rotated"
        );
        assert_eq!(stored["a2"], seeded_document()["a2"]);
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let (_, service) = seeded().await;
        let err = service.delete("nope").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn delete_removes_exactly_that_account() {
        let (backend, service) = seeded().await;

        let resp = service.delete("a1").await.unwrap();
        assert_eq!(resp.message.as_deref(), Some("Account Deleted"));
        let deleted = resp.account.unwrap();
        assert_eq!(deleted["a1"].api_key, "k1");
        assert!(deleted["a1"].api_password.is_none());

        let stored = backend.document(BUCKET, KEY).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored.contains_key("a2"));
    }

    #[tokio::test]
    async fn concurrent_writer_loses_instead_of_clobbering() {
        let (backend, service) = seeded().await;
        let store = DocumentStore::new(backend.clone(), BUCKET, KEY);

        // A second writer takes its snapshot, then the service writes first.
        let stale = store.snapshot().await.unwrap();
        service.create("a3", input("pw")).await.unwrap();

        let mut theirs = stale.accounts.clone();
        theirs.remove("a1");
        let err = store.upload(&theirs, stale.etag).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAllowed);

        let stored = backend.document(BUCKET, KEY).await.unwrap();
        assert!(stored.contains_key("a1"));
        assert!(stored.contains_key("a3"));
    }
}
