//! Account directory: one record per person plus a role satellite with the
//! fields only that role needs. Registration hands out temporary credentials
//! over mail, and community restrictions are armed here and lifted by the
//! scheduler.

pub mod credentials;
pub mod domain;
pub mod mail;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use credentials::{CredentialError, PasswordVault, SessionClaims, TokenIssuer};
pub use domain::{
    AlumniProfile, AlumniUpdate, CommunityPermissions, FacultyProfile, FacultyUpdate, NewAlumni,
    NewFaculty, NewStudent, NewUser, Program, StudentProfile, StudentStatus, StudentUpdate,
    UserAccount, UserId, UserRole, UserStatus, UserSummary, UserUpdate,
};
pub use mail::{MailError, MailGateway, OutboundMail};
pub use repository::{DirectoryRepository, InMemoryDirectoryRepository};
pub use router::directory_router;
pub use service::{
    AlumniMigration, AlumniRegistration, DirectoryService, DirectoryServiceError,
    FacultyRegistration, LoginOutcome, RestrictionPlanner, StudentRegistration,
};
