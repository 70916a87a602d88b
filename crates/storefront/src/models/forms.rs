//! Shopper-facing forms and their validation.
//!
//! Validation runs before anything is sent to the backend. A failing form is
//! reported to the caller as a [`FormError`] and never becomes a notification.

use goshen_core::{Email, EmailError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default subject for contact inquiries.
pub const DEFAULT_INQUIRY_SUBJECT: &str = "Order Inquiry";

/// Form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("passwords do not match")]
    PasswordMismatch,
}

fn require(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(())
    }
}

/// Delivery details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
    pub phone: String,
}

impl ShippingAddress {
    /// Every field is required and the email must parse.
    ///
    /// # Errors
    ///
    /// Returns the first missing field, or an invalid email.
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.first_name, "first name")?;
        require(&self.last_name, "last name")?;
        require(&self.email, "email")?;
        require(&self.street, "street")?;
        require(&self.city, "city")?;
        require(&self.state, "state")?;
        require(&self.zipcode, "zipcode")?;
        require(&self.country, "country")?;
        require(&self.phone, "phone")?;
        Email::parse(&self.email)?;
        Ok(())
    }

    /// Recipient name for order listings.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Sign-in credentials.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error for a blank password or an unparseable email.
    pub fn validate(&self) -> Result<Email, FormError> {
        require(&self.email, "email")?;
        require(self.password.expose_secret(), "password")?;
        Ok(Email::parse(&self.email)?)
    }
}

/// New account details.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns the first missing field, an invalid email, or a password
    /// confirmation mismatch.
    pub fn validate(&self) -> Result<Email, FormError> {
        require(&self.name, "name")?;
        require(&self.email, "email")?;
        require(&self.phone, "phone")?;
        require(self.password.expose_secret(), "password")?;
        let email = Email::parse(&self.email)?;
        if self.password.expose_secret() != self.confirm_password.expose_secret() {
            return Err(FormError::PasswordMismatch);
        }
        Ok(email)
    }
}

/// Contact form message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Build a form, defaulting a blank subject.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        let subject = subject
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INQUIRY_SUBJECT.to_string());
        Self {
            name: name.into(),
            email: email.into(),
            subject,
            message: message.into(),
        }
    }

    /// # Errors
    ///
    /// Returns the first missing field or an invalid email.
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.name, "name")?;
        require(&self.email, "email")?;
        require(&self.subject, "subject")?;
        require(&self.message, "message")?;
        Email::parse(&self.email)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            street: "1 Fresh Lane".into(),
            city: "Ringwood".into(),
            state: "VIC".into(),
            zipcode: "3134".into(),
            country: "Australia".into(),
            phone: "0400000000".into(),
        }
    }

    #[test]
    fn test_address_requires_every_field() {
        assert!(address().validate().is_ok());

        let mut missing_city = address();
        missing_city.city = "  ".into();
        assert_eq!(missing_city.validate(), Err(FormError::Missing("city")));

        let mut bad_email = address();
        bad_email.email = "ada.example.com".into();
        assert!(matches!(
            bad_email.validate(),
            Err(FormError::InvalidEmail(EmailError::MissingAtSymbol))
        ));
    }

    #[test]
    fn test_address_uses_camel_case_wire_names() {
        let value = serde_json::to_value(address()).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["zipcode"], "3134");
    }

    #[test]
    fn test_register_password_confirmation() {
        let mut form = RegisterForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "0400000000".into(),
            password: SecretString::from("hunter22"),
            confirm_password: SecretString::from("hunter22"),
        };
        assert_eq!(form.validate().unwrap().as_str(), "ada@example.com");

        form.confirm_password = SecretString::from("hunter23");
        assert_eq!(form.validate().unwrap_err(), FormError::PasswordMismatch);
    }

    #[test]
    fn test_login_requires_password() {
        let form = LoginForm::new("ada@example.com", "");
        assert_eq!(form.validate().unwrap_err(), FormError::Missing("password"));
    }

    #[test]
    fn test_contact_subject_defaults() {
        let form = ContactForm::new("Ada", "ada@example.com", None, "Where is my order?");
        assert_eq!(form.subject, DEFAULT_INQUIRY_SUBJECT);
        assert!(form.validate().is_ok());

        let form = ContactForm::new("Ada", "ada@example.com", Some(" ".into()), "");
        assert_eq!(form.subject, DEFAULT_INQUIRY_SUBJECT);
        assert_eq!(form.validate(), Err(FormError::Missing("message")));
    }
}
