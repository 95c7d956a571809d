use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::storage::RepositoryError;

use super::domain::{AlumniProfile, FacultyProfile, StudentProfile, UserAccount, UserId};

/// Storage abstraction over accounts and their role satellites so services
/// can be exercised in isolation.
pub trait DirectoryRepository: Send + Sync {
    fn insert_user(&self, account: UserAccount) -> Result<UserAccount, RepositoryError>;
    fn update_user(&self, account: UserAccount) -> Result<(), RepositoryError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError>;
    fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError>;
    fn list_users(&self) -> Result<Vec<UserAccount>, RepositoryError>;
    fn delete_user(&self, id: &UserId) -> Result<(), RepositoryError>;
    /// Accounts whose restriction deadline is still set, for timer re-arm.
    fn restricted_users(&self) -> Result<Vec<UserAccount>, RepositoryError>;
    /// Compound update restoring community permissions and clearing the
    /// restriction deadline in one step.
    fn lift_restrictions(&self, id: &UserId) -> Result<UserAccount, RepositoryError>;

    fn insert_student(&self, profile: StudentProfile) -> Result<StudentProfile, RepositoryError>;
    fn update_student(&self, profile: StudentProfile) -> Result<(), RepositoryError>;
    fn fetch_student(&self, id: &UserId) -> Result<Option<StudentProfile>, RepositoryError>;
    fn list_students(&self) -> Result<Vec<StudentProfile>, RepositoryError>;
    fn delete_student(&self, id: &UserId) -> Result<(), RepositoryError>;

    fn insert_faculty(&self, profile: FacultyProfile) -> Result<FacultyProfile, RepositoryError>;
    fn update_faculty(&self, profile: FacultyProfile) -> Result<(), RepositoryError>;
    fn fetch_faculty(&self, id: &UserId) -> Result<Option<FacultyProfile>, RepositoryError>;
    fn list_faculty(&self) -> Result<Vec<FacultyProfile>, RepositoryError>;
    fn delete_faculty(&self, id: &UserId) -> Result<(), RepositoryError>;

    fn insert_alumni(&self, profile: AlumniProfile) -> Result<AlumniProfile, RepositoryError>;
    fn update_alumni(&self, profile: AlumniProfile) -> Result<(), RepositoryError>;
    fn fetch_alumni(&self, id: &UserId) -> Result<Option<AlumniProfile>, RepositoryError>;
    fn list_alumni(&self) -> Result<Vec<AlumniProfile>, RepositoryError>;
    fn delete_alumni(&self, id: &UserId) -> Result<(), RepositoryError>;
}

/// Default in-memory store. Keys are the sequential ids, so ordered maps
/// give listings a stable insertion order.
#[derive(Default, Clone)]
pub struct InMemoryDirectoryRepository {
    users: Arc<Mutex<BTreeMap<UserId, UserAccount>>>,
    students: Arc<Mutex<BTreeMap<UserId, StudentProfile>>>,
    faculty: Arc<Mutex<BTreeMap<UserId, FacultyProfile>>>,
    alumni: Arc<Mutex<BTreeMap<UserId, AlumniProfile>>>,
}

impl DirectoryRepository for InMemoryDirectoryRepository {
    fn insert_user(&self, account: UserAccount) -> Result<UserAccount, RepositoryError> {
        let mut guard = self.users.lock().expect("repository mutex poisoned");
        if guard.contains_key(&account.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    fn update_user(&self, account: UserAccount) -> Result<(), RepositoryError> {
        let mut guard = self.users.lock().expect("repository mutex poisoned");
        if guard.contains_key(&account.id) {
            guard.insert(account.id.clone(), account);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserAccount>, RepositoryError> {
        let guard = self.users.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn fetch_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let guard = self.users.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list_users(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        let guard = self.users.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_user(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut guard = self.users.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn restricted_users(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        let guard = self.users.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|account| account.restricted_until.is_some())
            .cloned()
            .collect())
    }

    fn lift_restrictions(&self, id: &UserId) -> Result<UserAccount, RepositoryError> {
        let mut guard = self.users.lock().expect("repository mutex poisoned");
        let account = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        account.permissions = Default::default();
        account.restricted_until = None;
        Ok(account.clone())
    }

    fn insert_student(&self, profile: StudentProfile) -> Result<StudentProfile, RepositoryError> {
        let mut guard = self.students.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update_student(&self, profile: StudentProfile) -> Result<(), RepositoryError> {
        let mut guard = self.students.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            guard.insert(profile.id.clone(), profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_student(&self, id: &UserId) -> Result<Option<StudentProfile>, RepositoryError> {
        let guard = self.students.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_students(&self) -> Result<Vec<StudentProfile>, RepositoryError> {
        let guard = self.students.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_student(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut guard = self.students.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_faculty(&self, profile: FacultyProfile) -> Result<FacultyProfile, RepositoryError> {
        let mut guard = self.faculty.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update_faculty(&self, profile: FacultyProfile) -> Result<(), RepositoryError> {
        let mut guard = self.faculty.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            guard.insert(profile.id.clone(), profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_faculty(&self, id: &UserId) -> Result<Option<FacultyProfile>, RepositoryError> {
        let guard = self.faculty.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_faculty(&self) -> Result<Vec<FacultyProfile>, RepositoryError> {
        let guard = self.faculty.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_faculty(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut guard = self.faculty.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn insert_alumni(&self, profile: AlumniProfile) -> Result<AlumniProfile, RepositoryError> {
        let mut guard = self.alumni.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update_alumni(&self, profile: AlumniProfile) -> Result<(), RepositoryError> {
        let mut guard = self.alumni.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.id) {
            guard.insert(profile.id.clone(), profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch_alumni(&self, id: &UserId) -> Result<Option<AlumniProfile>, RepositoryError> {
        let guard = self.alumni.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_alumni(&self) -> Result<Vec<AlumniProfile>, RepositoryError> {
        let guard = self.alumni.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete_alumni(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut guard = self.alumni.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}
