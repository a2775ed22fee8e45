use super::{MAX_NAME_LENGTH, is_valid_username, max_length, require};
use crate::domain::User;
use crate::error::ValidationErrors;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_EMAIL_LENGTH: usize = 254;

fn check_username(errors: &mut ValidationErrors, username: &str) {
    if !require(errors, "username", username) {
        return;
    }
    max_length(errors, "username", username, MAX_NAME_LENGTH);
    if !is_valid_username(username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

/// Strength and confirmation rules for a new password, reported on `field`.
fn check_new_password(
    errors: &mut ValidationErrors,
    field: &str,
    password: &str,
    confirmation: &str,
    username: &str,
) {
    if password != confirmation {
        errors.add(field, "The two password fields didn't match.");
        return;
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!(
                "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
            ),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
    if password.eq_ignore_ascii_case(username.trim()) {
        errors.add(field, "The password is too similar to the username.");
    }
}

/// Sign-up form: a username and the password typed twice.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

impl RegistrationForm {
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, &self.username);

        if !require(&mut errors, "password1", &self.password1) {
            return errors;
        }
        if !require(&mut errors, "password2", &self.password2) {
            return errors;
        }
        check_new_password(
            &mut errors,
            "password2",
            &self.password1,
            &self.password2,
            &self.username,
        );

        errors
    }
}

/// Password change for a signed-in user. The old password is verified by
/// the service, which needs the stored hash.
#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

impl PasswordChangeForm {
    pub fn check(&self, username: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "old_password", &self.old_password);
        if require(&mut errors, "new_password1", &self.new_password1)
            && require(&mut errors, "new_password2", &self.new_password2)
        {
            check_new_password(
                &mut errors,
                "new_password2",
                &self.new_password1,
                &self.new_password2,
                username,
            );
        }
        errors
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Profile edit form.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl ProfileForm {
    pub fn check(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_username(&mut errors, &self.username);

        let email = self.email.trim();
        if !email.is_empty() {
            let valid = email
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !valid {
                errors.add("email", "Enter a valid email address.");
            }
            max_length(&mut errors, "email", email, MAX_EMAIL_LENGTH);
        }
        max_length(&mut errors, "first_name", &self.first_name, MAX_NAME_LENGTH);
        max_length(&mut errors, "last_name", &self.last_name, MAX_NAME_LENGTH);

        errors
    }

    pub fn apply(self, user: &mut User) {
        user.username = self.username.trim().to_string();
        user.email = self.email.trim().to_string();
        user.first_name = self.first_name.trim().to_string();
        user.last_name = self.last_name.trim().to_string();
        user.updated_at = chrono::Utc::now();
    }
}
