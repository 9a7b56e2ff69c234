//! Test user catalog
//!
//! Static accounts that must already exist in the application, invalid
//! credential pairs for negative tests, and generators for fresh users.

use chrono::Utc;
use fake::faker::name::en::Name;
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::Rng;

pub const GENERATED_PASSWORD: &str = "TestPassword123";
pub const GENERATED_BIRTH_DATE: &str = "1995-05-15";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub institution: String,
    pub grade: String,
}

impl TestUser {
    fn fixed(
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        institution: &str,
        grade: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            institution: institution.to_string(),
            grade: grade.to_string(),
        }
    }

    /// Registration form values, keyed by form field id
    pub fn registration_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("nombre", self.name.clone()),
            ("email", self.email.clone()),
            ("password", self.password.clone()),
            ("confirmPassword", self.password.clone()),
            ("fecha_de_nacimiento", GENERATED_BIRTH_DATE.to_string()),
            ("institucion_educativa", self.institution.clone()),
            ("grado_academico", self.grade.clone()),
        ]
    }
}

pub fn admin() -> TestUser {
    TestUser::fixed(
        "Carlos",
        "camurcioa@unal.edu.co",
        "RavenCode123",
        Role::Admin,
        "Universidad Nacional",
        "Pregrado",
    )
}

pub fn student() -> TestUser {
    TestUser::fixed(
        "Tatianita Rodriguez",
        "tatianitalamasbonita@example.com",
        "Tatis123",
        Role::Student,
        "Colegio Mis Primeras Travesuras",
        "2",
    )
}

/// Credentials the application must reject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCredentials {
    pub email: &'static str,
    pub password: &'static str,
}

pub const WRONG_PASSWORD: InvalidCredentials = InvalidCredentials {
    email: "camurcioa@unal.edu.co",
    password: "WrongPassword123",
};

pub const NONEXISTENT_USER: InvalidCredentials = InvalidCredentials {
    email: "nonexistent@example.com",
    password: "SomePassword123",
};

/// Unknown account used by the legacy flow
pub const UNKNOWN_ACCOUNT: InvalidCredentials = InvalidCredentials {
    email: "invalid@example.com",
    password: "wrongpassword",
};

/// `testuser_{unix_millis}_{8 x [a-z0-9]}@example.com`
pub fn generate_unique_email() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!(
        "testuser_{}_{}@example.com",
        Utc::now().timestamp_millis(),
        suffix
    )
}

/// A fresh account that does not exist yet
pub fn generate_user(role: Role) -> TestUser {
    let name: String = Name().fake();
    TestUser {
        name,
        email: generate_unique_email(),
        password: GENERATED_PASSWORD.to_string(),
        role,
        institution: "Automated Test School".to_string(),
        grade: "Test Grade".to_string(),
    }
}

/// Values submitted by the profile settings scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub institution: String,
    pub grade: String,
}

impl ProfileUpdate {
    pub fn valid() -> Self {
        Self {
            name: "Updated Test Name".to_string(),
            institution: "Updated Test Institution".to_string(),
            grade: "Updated Test Grade".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    #[test]
    fn test_generated_emails_are_unique() {
        let emails: HashSet<String> = (0..1000).map(|_| generate_unique_email()).collect();
        assert_eq!(emails.len(), 1000);
    }

    #[test]
    fn test_generated_email_shape() {
        let re = Regex::new(r"^testuser_\d{13}_[a-z0-9]{8}@example\.com$").unwrap();
        let email = generate_unique_email();
        assert!(re.is_match(&email), "unexpected email {}", email);
    }

    #[test]
    fn test_generated_user_defaults() {
        let user = generate_user(Role::Student);
        assert_eq!(user.password, "TestPassword123");
        assert_eq!(user.institution, "Automated Test School");
        assert!(!user.name.is_empty());

        let fields = user.registration_fields();
        let confirm = fields.iter().find(|(k, _)| *k == "confirmPassword").unwrap();
        assert_eq!(confirm.1, user.password);
        assert!(fields.contains(&("fecha_de_nacimiento", "1995-05-15".to_string())));
    }

    #[test]
    fn test_static_accounts() {
        assert_eq!(admin().role, Role::Admin);
        assert_eq!(student().email, "tatianitalamasbonita@example.com");
        assert_eq!(WRONG_PASSWORD.email, admin().email);
        assert_ne!(WRONG_PASSWORD.password, admin().password);
    }
}
