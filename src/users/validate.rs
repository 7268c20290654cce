//! Field validation for [`UserInput`].
//!
//! Every field is checked, and every violation is returned: a client sending
//! an empty first name *and* a broken email hears about both at once.
//!
//! Per field, `required` runs first. A missing or blank value yields only the
//! "is required" violation; otherwise the remaining rules (length, email
//! shape) are evaluated independently.

use serde::Serialize;
use utoipa::ToSchema;

use super::model::{UserFields, UserInput};

const MAX_NAME_LEN: usize = 50;

/// One failed rule on one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[schema(example = json!(["FirstName"]))]
    pub member_names: Vec<String>,
    #[schema(example = "First Name is required.")]
    pub error_message: String,
}

impl Violation {
    fn new(member: &str, message: String) -> Self {
        Self { member_names: vec![member.to_owned()], error_message: message }
    }
}

/// Check `input` and return the complete field set, or every violation found.
pub fn validate(input: UserInput) -> Result<UserFields, Vec<Violation>> {
    let mut violations = Vec::new();

    let first_name = check_name(input.first_name, "FirstName", "First Name", &mut violations);
    let last_name = check_name(input.last_name, "LastName", "Last Name", &mut violations);
    let email = required(input.email, "Email", "Email", &mut violations).inspect(|email| {
        if !is_email(email) {
            violations.push(Violation::new("Email", "Invalid Email format.".to_owned()));
        }
    });

    match (first_name, last_name, email) {
        (Some(first_name), Some(last_name), Some(email)) if violations.is_empty() => {
            Ok(UserFields { first_name, last_name, email })
        }
        _ => Err(violations),
    }
}

fn check_name(
    value: Option<String>,
    member: &str,
    label: &str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    let value = required(value, member, label, violations)?;
    // Lengths are UTF-16 code units, so a character outside the BMP counts twice.
    if value.encode_utf16().count() > MAX_NAME_LEN {
        violations.push(Violation::new(
            member,
            format!("{label} can't exceed {MAX_NAME_LEN} characters."),
        ));
    }
    Some(value)
}

/// `None`, empty and whitespace-only values all count as missing.
fn required(
    value: Option<String>,
    member: &str,
    label: &str,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            violations.push(Violation::new(member, format!("{label} is required.")));
            None
        }
    }
}

/// Exactly one `@`, neither first nor last, and no line breaks.
fn is_email(value: &str) -> bool {
    if value.contains(['\r', '\n']) {
        return false;
    }
    match value.find('@') {
        Some(at) => at > 0 && at < value.len() - 1 && value.rfind('@') == Some(at),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn input(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> UserInput {
        UserInput {
            first_name: first.map(str::to_owned),
            last_name: last.map(str::to_owned),
            email: email.map(str::to_owned),
        }
    }

    fn messages(result: Result<UserFields, Vec<Violation>>) -> Vec<String> {
        result
            .expect_err("expected violations")
            .into_iter()
            .map(|v| v.error_message)
            .collect()
    }

    #[test]
    fn valid_input_yields_fields() {
        let fields = validate(input(Some("Ann"), Some("Lee"), Some("ann@x.com"))).expect("valid");
        assert_eq!(fields.first_name, "Ann");
        assert_eq!(fields.email, "ann@x.com");
    }

    #[test]
    fn empty_first_name_is_required() {
        let got = messages(validate(input(Some(""), Some("Lee"), Some("ann@x.com"))));
        assert_eq!(got, ["First Name is required."]);
    }

    #[test]
    fn all_violations_are_collected_in_field_order() {
        let long = "x".repeat(51);
        let got = messages(validate(input(Some(""), Some(&long), Some("not-an-email"))));
        assert_eq!(
            got,
            [
                "First Name is required.",
                "Last Name can't exceed 50 characters.",
                "Invalid Email format.",
            ]
        );
    }

    #[test]
    fn missing_fields_report_only_required() {
        let violations = validate(UserInput::default()).expect_err("empty input");
        let members: Vec<&str> = violations.iter().map(|v| v.member_names[0].as_str()).collect();
        assert_eq!(members, ["FirstName", "LastName", "Email"]);
        assert!(violations.iter().all(|v| v.error_message.ends_with("is required.")));
    }

    #[test]
    fn fifty_characters_is_the_limit() {
        let fifty = "é".repeat(50);
        assert!(validate(input(Some(&fifty), Some("Lee"), Some("a@b"))).is_ok());
    }

    #[test]
    fn astral_characters_count_twice() {
        let emoji = "\u{1F600}".repeat(26);
        assert_eq!(
            messages(validate(input(Some("Ann"), Some(&emoji), Some("a@b")))),
            ["Last Name can't exceed 50 characters."]
        );
        assert!(validate(input(Some(&"\u{1F600}".repeat(25)), Some("Lee"), Some("a@b"))).is_ok());
    }

    #[rstest]
    #[case("ann@x.com", true)]
    #[case("a@b", true)]
    #[case("first.last+tag@sub.example.org", true)]
    #[case("not-an-email", false)]
    #[case("@x.com", false)]
    #[case("ann@", false)]
    #[case("ann@@x.com", false)]
    #[case("a@b@c", false)]
    #[case("ann@x.com\n", false)]
    fn email_shape(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_email(value), expected);
    }

    #[test]
    fn violation_serialises_like_a_validation_result() {
        let v = Violation::new("Email", "Invalid Email format.".to_owned());
        assert_eq!(
            serde_json::to_value(&v).expect("serialise"),
            serde_json::json!({"memberNames": ["Email"], "errorMessage": "Invalid Email format."})
        );
    }
}
