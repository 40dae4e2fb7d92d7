//! Creation form state and field-scoped validation.
//!
//! Validation never aggregates: each failing field carries its own message
//! so the UI can render the error next to the input. Submission is gated on
//! a clean pass; the actual create call is the registry's concern.

use url::Url;

use crate::api::NewUser;

/// Which input of the creation form has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Avatar,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::FirstName => Self::LastName,
            Self::LastName => Self::Email,
            Self::Email => Self::Avatar,
            Self::Avatar => Self::FirstName,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::FirstName => Self::Avatar,
            Self::LastName => Self::FirstName,
            Self::Email => Self::LastName,
            Self::Avatar => Self::Email,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Avatar => "Avatar URL",
        }
    }
}

/// Per-field validation messages; `None` means the field is fine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl FieldErrors {
    pub fn is_clean(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.avatar.is_none()
    }

    pub fn for_field(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::FirstName => self.first_name.as_deref(),
            FormField::LastName => self.last_name.as_deref(),
            FormField::Email => self.email.as_deref(),
            FormField::Avatar => self.avatar.as_deref(),
        }
    }
}

/// Validate a creation payload. All four fields are required; email and
/// avatar must additionally be syntactically valid.
pub fn validate(draft: &NewUser) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if draft.first_name.trim().is_empty() {
        errors.first_name = Some("first name is required".to_string());
    }
    if draft.last_name.trim().is_empty() {
        errors.last_name = Some("last name is required".to_string());
    }
    if draft.email.trim().is_empty() {
        errors.email = Some("email is required".to_string());
    } else if !valid_email(draft.email.trim()) {
        errors.email = Some("not a valid email address".to_string());
    }
    if draft.avatar.trim().is_empty() {
        errors.avatar = Some("avatar URL is required".to_string());
    } else if Url::parse(draft.avatar.trim()).is_err() {
        errors.avatar = Some("not a valid URL".to_string());
    }
    errors
}

fn valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
        && s.matches('@').count() == 1
}

/// Live state of the "new member" modal.
#[derive(Clone, Debug)]
pub struct NewMemberForm {
    pub draft: NewUser,
    pub focus: FormField,
    pub errors: FieldErrors,
}

impl NewMemberForm {
    pub fn new() -> Self {
        Self {
            draft: NewUser::default(),
            focus: FormField::FirstName,
            errors: FieldErrors::default(),
        }
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::FirstName => &mut self.draft.first_name,
            FormField::LastName => &mut self.draft.last_name,
            FormField::Email => &mut self.draft.email,
            FormField::Avatar => &mut self.draft.avatar,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Run validation, remember the outcome for rendering, and report
    /// whether the draft may be submitted.
    pub fn check(&mut self) -> bool {
        self.errors = validate(&self.draft);
        self.errors.is_clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewUser {
        NewUser {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@x.com".into(),
            avatar: "http://a".into(),
        }
    }

    #[test]
    fn well_formed_payload_passes() {
        assert!(validate(&draft()).is_clean());
    }

    #[test]
    fn each_empty_field_is_rejected_in_place() {
        let mut d = draft();
        d.first_name.clear();
        let e = validate(&d);
        assert!(e.first_name.is_some());
        assert!(e.last_name.is_none() && e.email.is_none() && e.avatar.is_none());

        let mut d = draft();
        d.last_name.clear();
        assert!(validate(&d).last_name.is_some());

        let mut d = draft();
        d.email.clear();
        assert!(validate(&d).email.is_some());

        let mut d = draft();
        d.avatar.clear();
        assert!(validate(&d).avatar.is_some());
    }

    #[test]
    fn syntactically_broken_email_and_url_are_rejected() {
        let mut d = draft();
        d.email = "not-an-email".into();
        d.avatar = "not-a-url".into();
        let e = validate(&d);
        assert_eq!(e.email.as_deref(), Some("not a valid email address"));
        assert_eq!(e.avatar.as_deref(), Some("not a valid URL"));
        assert!(!e.is_clean());
    }

    #[test]
    fn email_oddities() {
        assert!(valid_email("a@b.co"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("@b.co"));
        assert!(!valid_email("a@"));
        assert!(!valid_email("a b@c.de"));
        assert!(!valid_email("a@@b.co"));
    }

    #[test]
    fn form_focus_cycles_through_all_fields() {
        let mut form = NewMemberForm::new();
        assert_eq!(form.focus, FormField::FirstName);
        form.focus_next();
        form.focus_next();
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus, FormField::FirstName);
        form.focus_prev();
        assert_eq!(form.focus, FormField::Avatar);
    }

    #[test]
    fn check_records_errors_for_rendering() {
        let mut form = NewMemberForm::new();
        assert!(!form.check());
        assert!(form.errors.first_name.is_some());
        form.draft = draft();
        assert!(form.check());
        assert!(form.errors.is_clean());
    }
}
