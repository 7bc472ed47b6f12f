use axum::http::{header, HeaderMap};

use crate::server::error::{format::FormatError, Error};

pub const ACCEPT_VARIANT_HEADER: &str = "accept-variant";
pub const AUTOCOMPLETE_VARIANT: &str = "autocomplete";

/// Representation of an index requested with the `Accept-Variant` header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Variant {
    Full,
    Autocomplete,
}

/// Whether the `Accept` header admits a JSON answer
///
/// A missing header admits anything. Quality values are ignored.
fn accepts_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT) else {
        return true;
    };
    let Ok(accept) = accept.to_str() else {
        return false;
    };

    accept
        .split(',')
        .map(|range| range.split(';').next().unwrap_or_default().trim())
        .any(|range| {
            range.eq_ignore_ascii_case("application/json")
                || range.eq_ignore_ascii_case("application/*")
                || range == "*/*"
        })
}

/// 406 unless the client accepts JSON
pub fn accept_json(headers: &HeaderMap) -> Result<(), Error> {
    if accepts_json(headers) {
        Ok(())
    } else {
        Err(FormatError::NotAcceptable.into())
    }
}

/// Negotiates the representation of an index
///
/// `autocomplete` tells whether the resource implements the autocomplete variant, other
/// variants are never implemented.
///
/// # Returns
/// - `Ok(Variant)`: the requested variant
/// - `Err(Error::FormatError(FormatError::NotAcceptable))`: the client doesn't accept JSON
/// - `Err(Error::FormatError(FormatError::VariantNotImplemented(_)))`: the requested variant
///   doesn't exist for this resource
pub fn negotiate(headers: &HeaderMap, autocomplete: bool) -> Result<Variant, Error> {
    accept_json(headers)?;

    let Some(variant) = headers.get(ACCEPT_VARIANT_HEADER) else {
        return Ok(Variant::Full);
    };
    let variant = variant.to_str().unwrap_or_default().trim();

    match variant {
        "" => Ok(Variant::Full),
        AUTOCOMPLETE_VARIANT if autocomplete => Ok(Variant::Autocomplete),
        other => Err(FormatError::VariantNotImplemented(other.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};

    use crate::server::{
        controller::util::format::{negotiate, Variant, ACCEPT_VARIANT_HEADER},
        error::{format::FormatError, Error},
    };

    fn headers(accept: &'static str, variant: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(accept));
        if let Some(variant) = variant {
            headers.insert(ACCEPT_VARIANT_HEADER, HeaderValue::from_static(variant));
        }
        headers
    }

    /// Expect JSON, wildcards and missing headers to be accepted
    #[test]
    fn accepts_json_ranges() {
        for accept in ["application/json", "text/html, application/*;q=0.8", "*/*"] {
            assert_eq!(negotiate(&headers(accept, None), false).unwrap(), Variant::Full);
        }
        assert_eq!(negotiate(&HeaderMap::new(), false).unwrap(), Variant::Full);
    }

    /// Expect 406 when only HTML is accepted
    #[test]
    fn refuses_html_only() {
        let result = negotiate(&headers("text/html", None), true);

        assert!(matches!(
            result,
            Err(Error::FormatError(FormatError::NotAcceptable))
        ));
    }

    /// Expect autocomplete only where implemented
    #[test]
    fn negotiates_autocomplete_variant() {
        let request = headers("application/json", Some("autocomplete"));

        assert_eq!(negotiate(&request, true).unwrap(), Variant::Autocomplete);
        assert!(matches!(
            negotiate(&request, false),
            Err(Error::FormatError(FormatError::VariantNotImplemented(v))) if v == "autocomplete"
        ));
    }
}
