//! Field format rules and form helpers.
//!
//! Forms carry `Option<String>` fields: `None` leaves a value unchanged, an empty string
//! clears it. [`Field`] captures that tri-state once so services only deal with trimmed
//! values.

use std::sync::LazyLock;

use regex::Regex;

use crate::server::error::validation::ValidationErrors;

pub const BLANK: &str = "doit être rempli(e)";
pub const INVALID: &str = "n'est pas valide";
pub const TAKEN: &str = "est déjà utilisé(e)";
pub const UNKNOWN: &str = "n'existe pas";

static SIREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9}$").expect("invalid SIREN pattern"));
static CODE_INSEE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{5}|2[AB]\d{3})$").expect("invalid code INSEE pattern"));
static CODE_DEPARTEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2,3}|2[AB])$").expect("invalid code département pattern")
});
static INVARIANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("invalid invariant pattern"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("invalid email pattern")
});
static DOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").expect("invalid domain pattern")
});

pub fn is_siren(value: &str) -> bool {
    SIREN.is_match(value)
}

pub fn is_code_insee(value: &str) -> bool {
    CODE_INSEE.is_match(value)
}

pub fn is_code_departement(value: &str) -> bool {
    CODE_DEPARTEMENT.is_match(value)
}

pub fn is_invariant(value: &str) -> bool {
    INVARIANT.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn is_domain(value: &str) -> bool {
    DOMAIN.is_match(value)
}

/// Submitted state of an optional text field
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// Not submitted, keep the current value
    Unchanged,
    /// Submitted blank
    Cleared,
    Set(String),
}

impl Field {
    pub fn from_form(value: Option<String>) -> Self {
        match value {
            None => Self::Unchanged,
            Some(value) => {
                let value = value.trim();
                if value.is_empty() {
                    Self::Cleared
                } else {
                    Self::Set(value.to_string())
                }
            }
        }
    }

    /// Value once applied to `current`
    pub fn resolve(&self, current: Option<&str>) -> Option<String> {
        match self {
            Self::Unchanged => current.map(str::to_string),
            Self::Cleared => None,
            Self::Set(value) => Some(value.clone()),
        }
    }

    /// Value for an optional column
    pub fn into_column(self, current: Option<String>) -> Option<String> {
        match self {
            Self::Unchanged => current,
            Self::Cleared => None,
            Self::Set(value) => Some(value),
        }
    }
}

/// Resolves a required text field, recording `BLANK` when it ends up empty
pub fn required(
    errors: &mut ValidationErrors,
    field: &str,
    submitted: Option<String>,
    current: Option<&str>,
) -> Option<String> {
    let value = Field::from_form(submitted).resolve(current);

    if value.is_none() {
        errors.add(field, BLANK);
    }

    value
}

/// Records `INVALID` when a present value fails `rule`
pub fn check_format(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
    rule: fn(&str) -> bool,
) {
    if let Some(value) = value {
        if !rule(value) {
            errors.add(field, INVALID);
        }
    }
}
