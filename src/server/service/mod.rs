//! Service layer for business logic.
//!
//! Services validate submitted forms, enforce workflow rules and uniqueness invariants, and
//! run multi-step writes inside a database transaction. Authorization happens before a
//! service is called, in the controllers through [`crate::server::policy`].

pub mod auth;
pub mod collectivity;
pub mod ddfip;
pub mod dgfip;
pub mod office;
pub mod oauth;
pub mod package;
pub mod publisher;
pub mod report;
pub mod territory;
pub mod transmission;
pub mod user;

use uuid::Uuid;

use crate::{
    model::organization::ContactForm,
    server::{
        data::discard::DiscardableModel,
        error::{record::RecordError, validation::ValidationErrors, Error},
        util::validation::{check_format, is_domain, is_email, Field},
    },
};

/// 404 when the record is missing
pub(crate) fn found<M>(record: Option<M>, resource: &'static str, id: Uuid) -> Result<M, Error> {
    record.ok_or_else(|| RecordError::NotFound { resource, id }.into())
}

/// 404 when the record is missing, 410 when it is discarded
pub(crate) fn kept<M>(record: Option<M>, resource: &'static str, id: Uuid) -> Result<M, Error>
where
    M: DiscardableModel,
{
    let record = found(record, resource, id)?;

    if record.is_discarded() {
        return Err(RecordError::Discarded { resource, id }.into());
    }

    Ok(record)
}

/// Contact person of an organization
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Contact {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Contact {
    /// Applies the submitted contact fields on top of `self`
    pub fn apply(self, errors: &mut ValidationErrors, form: ContactForm) -> Self {
        let contact = Self {
            first_name: Field::from_form(form.contact_first_name).into_column(self.first_name),
            last_name: Field::from_form(form.contact_last_name).into_column(self.last_name),
            email: Field::from_form(form.contact_email).into_column(self.email),
            phone: Field::from_form(form.contact_phone).into_column(self.phone),
        };

        check_format(errors, "contact_email", contact.email.as_deref(), is_email);

        contact
    }
}

/// Applies a submitted domain restriction, e.g. `pau.fr`
pub(crate) fn domain_restriction(
    errors: &mut ValidationErrors,
    submitted: Option<String>,
    current: Option<String>,
) -> Option<String> {
    let domain = Field::from_form(submitted).into_column(current);
    check_format(errors, "domain_restriction", domain.as_deref(), is_domain);

    domain
}
