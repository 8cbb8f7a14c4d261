use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use org_directory_core::contract::{Organization, OrganizationChanges, User, UserChanges};

use crate::adapters::directory_store::{DirectoryStore, StoreError};

/// In-memory store double that records every write it receives.
#[derive(Default)]
pub struct RecordingStore {
    organizations: Mutex<BTreeMap<String, Organization>>,
    users: Mutex<BTreeMap<String, User>>,
    writes: Mutex<Vec<String>>,
    unavailable: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails as if the backend were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_organization(self, organization_id: &str, name: &str, description: &str) -> Self {
        self.organizations.lock().expect("poisoned mutex").insert(
            organization_id.to_string(),
            Organization {
                organization_id: organization_id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            },
        );
        self
    }

    pub fn with_user(self, user_id: &str, organization_id: &str, name: &str, email: &str) -> Self {
        self.users.lock().expect("poisoned mutex").insert(
            user_id.to_string(),
            User {
                user_id: user_id.to_string(),
                organization_id: organization_id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            },
        );
        self
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("poisoned mutex").clone()
    }

    pub fn organization(&self, organization_id: &str) -> Option<Organization> {
        self.organizations
            .lock()
            .expect("poisoned mutex")
            .get(organization_id)
            .cloned()
    }

    pub fn user(&self, user_id: &str) -> Option<User> {
        self.users
            .lock()
            .expect("poisoned mutex")
            .get(user_id)
            .cloned()
    }

    pub fn organization_count(&self) -> usize {
        self.organizations.lock().expect("poisoned mutex").len()
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().expect("poisoned mutex").len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Request("simulated store outage".to_string()));
        }
        Ok(())
    }

    fn record_write(&self, description: String) {
        self.writes.lock().expect("poisoned mutex").push(description);
    }
}

impl DirectoryStore for RecordingStore {
    fn get_organization(&self, organization_id: &str) -> Result<Option<Organization>, StoreError> {
        self.check_available()?;
        Ok(self.organization(organization_id))
    }

    fn query_organizations_by_name(&self, name: &str) -> Result<Vec<Organization>, StoreError> {
        self.check_available()?;
        Ok(self
            .organizations
            .lock()
            .expect("poisoned mutex")
            .values()
            .filter(|organization| organization.name == name)
            .cloned()
            .collect())
    }

    fn put_organization(&self, organization: &Organization) -> Result<(), StoreError> {
        self.check_available()?;
        self.record_write(format!("put organization {}", organization.organization_id));
        self.organizations
            .lock()
            .expect("poisoned mutex")
            .insert(organization.organization_id.clone(), organization.clone());
        Ok(())
    }

    fn update_organization(
        &self,
        organization_id: &str,
        changes: &OrganizationChanges,
    ) -> Result<Organization, StoreError> {
        self.check_available()?;
        self.record_write(format!("update organization {organization_id}"));
        let mut organizations = self.organizations.lock().expect("poisoned mutex");
        let organization = organizations
            .get_mut(organization_id)
            .ok_or_else(|| StoreError::Decode(format!("no organization {organization_id}")))?;
        changes.apply_to(organization);
        Ok(organization.clone())
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        self.check_available()?;
        Ok(self.user(user_id))
    }

    fn query_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError> {
        self.check_available()?;
        Ok(self
            .users
            .lock()
            .expect("poisoned mutex")
            .values()
            .filter(|user| user.email == email)
            .cloned()
            .collect())
    }

    fn put_user(&self, user: &User) -> Result<(), StoreError> {
        self.check_available()?;
        self.record_write(format!("put user {}", user.user_id));
        self.users
            .lock()
            .expect("poisoned mutex")
            .insert(user.user_id.clone(), user.clone());
        Ok(())
    }

    fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<User, StoreError> {
        self.check_available()?;
        self.record_write(format!("update user {user_id}"));
        let mut users = self.users.lock().expect("poisoned mutex");
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::Decode(format!("no user {user_id}")))?;
        changes.apply_to(user);
        Ok(user.clone())
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer lock poisoned")
            .extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a plain-text subscriber and returns what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = buffer.0.lock().expect("log buffer lock poisoned").clone();
    (result, String::from_utf8_lossy(&logs).into_owned())
}
