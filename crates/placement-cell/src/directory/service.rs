use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use regex::RegexBuilder;
use serde::Serialize;

use crate::config::AuthConfig;
use crate::storage::RepositoryError;

use super::credentials::{CredentialError, PasswordVault, SessionClaims, TokenIssuer};
use super::domain::{
    AlumniProfile, AlumniUpdate, FacultyProfile, FacultyUpdate, NewAlumni, NewFaculty, NewStudent,
    NewUser, Program, StudentProfile, StudentStatus, StudentUpdate, UserAccount, UserId, UserRole,
    UserStatus, UserSummary, UserUpdate,
};
use super::mail::{MailError, MailGateway, OutboundMail};

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_user_id() -> UserId {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UserId(format!("usr-{id:06}"))
}

/// Queries shorter than this return no matches instead of scanning everyone.
pub const SEARCH_QUERY_MIN_CHARS: usize = 2;
pub const SEARCH_RESULT_LIMIT: usize = 20;

/// Outbound hook used to arm or cancel restriction-lift timers.
pub trait RestrictionPlanner: Send + Sync {
    fn schedule_lift(&self, user: &UserId, at: DateTime<Utc>);
    fn cancel(&self, user: &UserId);
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error("email is already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account has not been activated")]
    InactiveAccount,
    #[error("account is not a student")]
    NotAStudent,
    #[error("search query could not be compiled: {0}")]
    Query(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Mail(#[from] MailError),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentRegistration {
    pub account: UserAccount,
    pub profile: StudentProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacultyRegistration {
    pub account: UserAccount,
    pub profile: FacultyProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlumniRegistration {
    pub account: UserAccount,
    pub profile: AlumniProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlumniMigration {
    pub account: UserAccount,
    pub alumni: AlumniProfile,
}

/// Account lifecycle, role satellites, and the community-permission gate.
pub struct DirectoryService<R, M> {
    repository: Arc<R>,
    mail: Arc<M>,
    planner: Arc<dyn RestrictionPlanner>,
    vault: PasswordVault,
    tokens: TokenIssuer,
}

impl<R, M> DirectoryService<R, M>
where
    R: super::DirectoryRepository + 'static,
    M: MailGateway + 'static,
{
    pub fn new(
        repository: Arc<R>,
        mail: Arc<M>,
        planner: Arc<dyn RestrictionPlanner>,
        auth: &AuthConfig,
    ) -> Self {
        Self {
            repository,
            mail,
            planner,
            vault: PasswordVault::new(),
            tokens: TokenIssuer::new(&auth.token_secret, auth.token_ttl_minutes),
        }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Registers the account shell shared by every role: temporary password,
    /// inactive status, and a welcome mail carrying the credentials.
    fn register_account(&self, new_user: NewUser) -> Result<UserAccount, DirectoryServiceError> {
        if self
            .repository
            .fetch_user_by_email(&new_user.email)?
            .is_some()
        {
            return Err(DirectoryServiceError::DuplicateEmail);
        }
        let temp_password = self.vault.generate_password();
        let password_hash = self.vault.hash(&temp_password)?;
        let now = Utc::now();
        let account = UserAccount {
            id: next_user_id(),
            first_name: new_user.first_name,
            middle_name: new_user.middle_name,
            last_name: new_user.last_name,
            email: new_user.email,
            phone: new_user.phone,
            role: new_user.role,
            status: UserStatus::Inactive,
            permissions: Default::default(),
            restricted_until: None,
            password_hash,
            created_at: now,
            updated_at: now,
        };
        let stored = self.repository.insert_user(account)?;
        self.mail.send(welcome_mail(&stored, &temp_password))?;
        Ok(stored)
    }

    pub fn add_user(&self, new_user: NewUser) -> Result<UserAccount, DirectoryServiceError> {
        let account = self.register_account(new_user)?;
        self.create_default_profile(&account)?;
        Ok(account)
    }

    /// Every non-admin account owns exactly one role satellite, created here
    /// with placeholder fields when registration does not supply them.
    fn create_default_profile(&self, account: &UserAccount) -> Result<(), DirectoryServiceError> {
        match account.role {
            UserRole::Student => {
                self.repository.insert_student(StudentProfile {
                    id: account.id.clone(),
                    first_name: account.first_name.clone(),
                    last_name: account.last_name.clone(),
                    email: account.email.clone(),
                    register_number: String::new(),
                    program: Program::Mca,
                    join_date: Utc::now().date_naive(),
                    status: StudentStatus::Active,
                })?;
            }
            UserRole::Faculty => {
                self.repository.insert_faculty(FacultyProfile {
                    id: account.id.clone(),
                    first_name: account.first_name.clone(),
                    last_name: account.last_name.clone(),
                    email: account.email.clone(),
                    department: String::new(),
                    designation: String::new(),
                })?;
            }
            UserRole::Alumni => {
                self.repository.insert_alumni(AlumniProfile {
                    id: account.id.clone(),
                    first_name: account.first_name.clone(),
                    last_name: account.last_name.clone(),
                    email: account.email.clone(),
                    graduation_year: Utc::now().year(),
                    current_company: None,
                    current_position: None,
                })?;
            }
            UserRole::Admin => {}
        }
        Ok(())
    }

    pub fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, DirectoryServiceError> {
        let account = self
            .repository
            .fetch_user_by_email(email)?
            .ok_or(DirectoryServiceError::InvalidCredentials)?;
        if !self.vault.verify(password, &account.password_hash) {
            return Err(DirectoryServiceError::InvalidCredentials);
        }
        if account.status != UserStatus::Active {
            return Err(DirectoryServiceError::InactiveAccount);
        }
        let token = self.tokens.issue(&account)?;
        Ok(LoginOutcome {
            token,
            user: UserSummary::from(&account),
        })
    }

    /// Setting a fresh password also activates the account, which is how a
    /// freshly invited user completes onboarding.
    pub fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<UserAccount, DirectoryServiceError> {
        let mut account = self
            .repository
            .fetch_user_by_email(email)?
            .ok_or(RepositoryError::NotFound)?;
        account.password_hash = self.vault.hash(new_password)?;
        account.status = UserStatus::Active;
        account.updated_at = Utc::now();
        self.repository.update_user(account.clone())?;
        Ok(account)
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, DirectoryServiceError> {
        Ok(self.tokens.verify(token)?)
    }

    pub fn get_user(&self, id: &UserId) -> Result<UserAccount, DirectoryServiceError> {
        self.repository
            .fetch_user(id)?
            .ok_or(DirectoryServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_users(&self) -> Result<Vec<UserAccount>, DirectoryServiceError> {
        Ok(self.repository.list_users()?)
    }

    pub fn update_user(
        &self,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<UserAccount, DirectoryServiceError> {
        let mut account = self.get_user(id)?;
        if let Some(email) = &update.email {
            let taken = self
                .repository
                .fetch_user_by_email(email)?
                .is_some_and(|other| other.id != account.id);
            if taken {
                return Err(DirectoryServiceError::DuplicateEmail);
            }
        }
        apply_user_update(&mut account, update);
        account.updated_at = Utc::now();
        self.repository.update_user(account.clone())?;
        self.sync_profile(&account)?;
        Ok(account)
    }

    /// Keeps the satellite's copy of name and email in step with the account.
    fn sync_profile(&self, account: &UserAccount) -> Result<(), DirectoryServiceError> {
        match account.role {
            UserRole::Student => {
                if let Some(mut profile) = self.repository.fetch_student(&account.id)? {
                    profile.first_name = account.first_name.clone();
                    profile.last_name = account.last_name.clone();
                    profile.email = account.email.clone();
                    self.repository.update_student(profile)?;
                }
            }
            UserRole::Faculty => {
                if let Some(mut profile) = self.repository.fetch_faculty(&account.id)? {
                    profile.first_name = account.first_name.clone();
                    profile.last_name = account.last_name.clone();
                    profile.email = account.email.clone();
                    self.repository.update_faculty(profile)?;
                }
            }
            UserRole::Alumni => {
                if let Some(mut profile) = self.repository.fetch_alumni(&account.id)? {
                    profile.first_name = account.first_name.clone();
                    profile.last_name = account.last_name.clone();
                    profile.email = account.email.clone();
                    self.repository.update_alumni(profile)?;
                }
            }
            UserRole::Admin => {}
        }
        Ok(())
    }

    pub fn delete_user(&self, id: &UserId) -> Result<(), DirectoryServiceError> {
        let account = self.get_user(id)?;
        self.repository.delete_user(id)?;
        self.remove_profile(&account)?;
        self.planner.cancel(id);
        Ok(())
    }

    fn remove_profile(&self, account: &UserAccount) -> Result<(), DirectoryServiceError> {
        let outcome = match account.role {
            UserRole::Student => self.repository.delete_student(&account.id),
            UserRole::Faculty => self.repository.delete_faculty(&account.id),
            UserRole::Alumni => self.repository.delete_alumni(&account.id),
            UserRole::Admin => Ok(()),
        };
        match outcome {
            Ok(()) | Err(RepositoryError::NotFound) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Case-insensitive match over full name and email. Only active accounts
    /// other than the caller are visible.
    pub fn search_users(
        &self,
        query: &str,
        acting_user: &UserId,
    ) -> Result<Vec<UserSummary>, DirectoryServiceError> {
        let trimmed = query.trim();
        if trimmed.chars().count() < SEARCH_QUERY_MIN_CHARS {
            return Ok(Vec::new());
        }
        let pattern = RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .build()
            .map_err(|err| DirectoryServiceError::Query(err.to_string()))?;
        let matches = self
            .repository
            .list_users()?
            .iter()
            .filter(|account| account.status == UserStatus::Active && &account.id != acting_user)
            .filter(|account| {
                pattern.is_match(&account.full_name()) || pattern.is_match(&account.email)
            })
            .map(UserSummary::from)
            .take(SEARCH_RESULT_LIMIT)
            .collect();
        Ok(matches)
    }

    pub fn update_permissions(
        &self,
        id: &UserId,
        permissions: super::CommunityPermissions,
    ) -> Result<UserAccount, DirectoryServiceError> {
        let mut account = self.get_user(id)?;
        account.permissions = permissions;
        account.updated_at = Utc::now();
        self.repository.update_user(account.clone())?;
        Ok(account)
    }

    /// Revokes every community permission. A positive `days` arms a lift
    /// timer; anything else makes the restriction indefinite.
    pub fn apply_restrictions(
        &self,
        id: &UserId,
        days: Option<i64>,
    ) -> Result<UserAccount, DirectoryServiceError> {
        let mut account = self.get_user(id)?;
        account.permissions = super::CommunityPermissions::revoked();
        match days {
            Some(days) if days > 0 => {
                let until = Utc::now() + Duration::days(days);
                account.restricted_until = Some(until);
                self.planner.schedule_lift(&account.id, until);
            }
            _ => {
                account.restricted_until = None;
                self.planner.cancel(&account.id);
            }
        }
        account.updated_at = Utc::now();
        self.repository.update_user(account.clone())?;
        Ok(account)
    }

    pub fn lift_restrictions(&self, id: &UserId) -> Result<UserAccount, DirectoryServiceError> {
        let account = self.repository.lift_restrictions(id)?;
        self.planner.cancel(id);
        Ok(account)
    }

    pub fn add_student(
        &self,
        new_student: NewStudent,
    ) -> Result<StudentRegistration, DirectoryServiceError> {
        let account = self.register_account(NewUser {
            first_name: new_student.first_name,
            middle_name: new_student.middle_name,
            last_name: new_student.last_name,
            email: new_student.email,
            phone: new_student.phone,
            role: UserRole::Student,
        })?;
        let profile = self.repository.insert_student(StudentProfile {
            id: account.id.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            register_number: new_student.register_number,
            program: new_student.program,
            join_date: new_student.join_date,
            status: StudentStatus::Active,
        })?;
        Ok(StudentRegistration { account, profile })
    }

    pub fn get_student(&self, id: &UserId) -> Result<StudentProfile, DirectoryServiceError> {
        self.repository
            .fetch_student(id)?
            .ok_or(DirectoryServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_students(&self) -> Result<Vec<StudentProfile>, DirectoryServiceError> {
        Ok(self.repository.list_students()?)
    }

    pub fn update_student(
        &self,
        id: &UserId,
        update: StudentUpdate,
    ) -> Result<StudentProfile, DirectoryServiceError> {
        let mut profile = self.get_student(id)?;
        if update.first_name.is_some() || update.last_name.is_some() || update.email.is_some() {
            self.update_user(
                id,
                UserUpdate {
                    first_name: update.first_name.clone(),
                    last_name: update.last_name.clone(),
                    email: update.email.clone(),
                    ..Default::default()
                },
            )?;
            profile = self.get_student(id)?;
        }
        if let Some(register_number) = update.register_number {
            profile.register_number = register_number;
        }
        if let Some(program) = update.program {
            profile.program = program;
        }
        if let Some(join_date) = update.join_date {
            profile.join_date = join_date;
        }
        if let Some(status) = update.status {
            profile.status = status;
        }
        self.repository.update_student(profile.clone())?;
        Ok(profile)
    }

    pub fn delete_student(&self, id: &UserId) -> Result<(), DirectoryServiceError> {
        self.get_student(id)?;
        self.delete_user(id)
    }

    /// Graduation: the account flips to the alumni role, the student record
    /// is marked completed, and an alumni satellite is created with the
    /// passout year derived from the programme duration.
    pub fn migrate_student_to_alumni(
        &self,
        id: &UserId,
    ) -> Result<AlumniMigration, DirectoryServiceError> {
        let mut account = self.get_user(id)?;
        if account.role != UserRole::Student {
            return Err(DirectoryServiceError::NotAStudent);
        }
        let mut profile = self.get_student(id)?;
        account.role = UserRole::Alumni;
        account.status = UserStatus::Active;
        account.updated_at = Utc::now();
        self.repository.update_user(account.clone())?;
        profile.status = StudentStatus::Completed;
        self.repository.update_student(profile.clone())?;
        let graduation_year = profile.join_date.year() + profile.program.duration_years();
        let alumni = self.repository.insert_alumni(AlumniProfile {
            id: account.id.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            graduation_year,
            current_company: None,
            current_position: None,
        })?;
        Ok(AlumniMigration { account, alumni })
    }

    pub fn add_faculty(
        &self,
        new_faculty: NewFaculty,
    ) -> Result<FacultyRegistration, DirectoryServiceError> {
        let account = self.register_account(NewUser {
            first_name: new_faculty.first_name,
            middle_name: new_faculty.middle_name,
            last_name: new_faculty.last_name,
            email: new_faculty.email,
            phone: new_faculty.phone,
            role: UserRole::Faculty,
        })?;
        let profile = self.repository.insert_faculty(FacultyProfile {
            id: account.id.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            department: new_faculty.department,
            designation: new_faculty.designation,
        })?;
        Ok(FacultyRegistration { account, profile })
    }

    pub fn get_faculty(&self, id: &UserId) -> Result<FacultyProfile, DirectoryServiceError> {
        self.repository
            .fetch_faculty(id)?
            .ok_or(DirectoryServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_faculty(&self) -> Result<Vec<FacultyProfile>, DirectoryServiceError> {
        Ok(self.repository.list_faculty()?)
    }

    pub fn update_faculty(
        &self,
        id: &UserId,
        update: FacultyUpdate,
    ) -> Result<FacultyProfile, DirectoryServiceError> {
        let mut profile = self.get_faculty(id)?;
        if update.first_name.is_some() || update.last_name.is_some() || update.email.is_some() {
            self.update_user(
                id,
                UserUpdate {
                    first_name: update.first_name.clone(),
                    last_name: update.last_name.clone(),
                    email: update.email.clone(),
                    ..Default::default()
                },
            )?;
            profile = self.get_faculty(id)?;
        }
        if let Some(department) = update.department {
            profile.department = department;
        }
        if let Some(designation) = update.designation {
            profile.designation = designation;
        }
        self.repository.update_faculty(profile.clone())?;
        Ok(profile)
    }

    pub fn delete_faculty(&self, id: &UserId) -> Result<(), DirectoryServiceError> {
        self.get_faculty(id)?;
        self.delete_user(id)
    }

    pub fn add_alumni(
        &self,
        new_alumni: NewAlumni,
    ) -> Result<AlumniRegistration, DirectoryServiceError> {
        let account = self.register_account(NewUser {
            first_name: new_alumni.first_name,
            middle_name: new_alumni.middle_name,
            last_name: new_alumni.last_name,
            email: new_alumni.email,
            phone: new_alumni.phone,
            role: UserRole::Alumni,
        })?;
        let profile = self.repository.insert_alumni(AlumniProfile {
            id: account.id.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            graduation_year: new_alumni.graduation_year,
            current_company: new_alumni.current_company,
            current_position: new_alumni.current_position,
        })?;
        Ok(AlumniRegistration { account, profile })
    }

    pub fn get_alumni(&self, id: &UserId) -> Result<AlumniProfile, DirectoryServiceError> {
        self.repository
            .fetch_alumni(id)?
            .ok_or(DirectoryServiceError::Repository(RepositoryError::NotFound))
    }

    pub fn list_alumni(&self) -> Result<Vec<AlumniProfile>, DirectoryServiceError> {
        Ok(self.repository.list_alumni()?)
    }

    pub fn update_alumni(
        &self,
        id: &UserId,
        update: AlumniUpdate,
    ) -> Result<AlumniProfile, DirectoryServiceError> {
        let mut profile = self.get_alumni(id)?;
        if update.first_name.is_some() || update.last_name.is_some() || update.email.is_some() {
            self.update_user(
                id,
                UserUpdate {
                    first_name: update.first_name.clone(),
                    last_name: update.last_name.clone(),
                    email: update.email.clone(),
                    ..Default::default()
                },
            )?;
            profile = self.get_alumni(id)?;
        }
        if let Some(graduation_year) = update.graduation_year {
            profile.graduation_year = graduation_year;
        }
        if let Some(current_company) = update.current_company {
            profile.current_company = Some(current_company);
        }
        if let Some(current_position) = update.current_position {
            profile.current_position = Some(current_position);
        }
        self.repository.update_alumni(profile.clone())?;
        Ok(profile)
    }

    pub fn delete_alumni(&self, id: &UserId) -> Result<(), DirectoryServiceError> {
        self.get_alumni(id)?;
        self.delete_user(id)
    }
}

fn apply_user_update(account: &mut UserAccount, update: UserUpdate) {
    if let Some(first_name) = update.first_name {
        account.first_name = first_name;
    }
    if let Some(middle_name) = update.middle_name {
        account.middle_name = Some(middle_name);
    }
    if let Some(last_name) = update.last_name {
        account.last_name = last_name;
    }
    if let Some(email) = update.email {
        account.email = email;
    }
    if let Some(phone) = update.phone {
        account.phone = Some(phone);
    }
    if let Some(status) = update.status {
        account.status = status;
    }
}

fn welcome_mail(account: &UserAccount, temp_password: &str) -> OutboundMail {
    OutboundMail {
        to: account.email.clone(),
        subject: "Welcome to the placement cell".to_string(),
        body: format!(
            "Hello {},\n\nYour {} account is ready. Sign in with the temporary password \
             {temp_password} and reset it to activate the account.\n",
            account.full_name(),
            account.role.label(),
        ),
    }
}
