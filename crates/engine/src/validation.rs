//! Field rules for guests and contributions.
//!
//! Every function here is pure: it takes what a client sent and returns
//! either a normalized value ready to be stored or the list of fields that
//! must be fixed. All failing fields are reported at once, one entry per
//! field, keyed by the wire name of the field.

use std::fmt;

use serde_json::Value;

use crate::{Category, EngineError, ResultEngine};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const COMMENT_MAX_LEN: usize = 500;
pub const DESCRIPTION_MIN_LEN: usize = 3;
pub const DESCRIPTION_MAX_LEN: usize = 200;
pub const SERVINGS_MIN: i64 = 1;
pub const SERVINGS_MAX: i64 = 50;

const GUEST_ID_REQUIRED: &str = "L'identifiant du participant est requis";
const CATEGORY_INVALID: &str = "Catégorie invalide";
/// Above this, a JSON float no longer holds an exact integer.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message reported for `field`, if it failed.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// RSVP form as sent by a client.
///
/// Fields keep the raw JSON value so a value of the wrong type is reported
/// against its own field. `Value::Null` means the field was not sent.
#[derive(Clone, Debug, Default)]
pub struct GuestInput {
    pub first_name: Value,
    pub last_name: Value,
    pub comment: Value,
}

/// Guest edit. Missing fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct GuestPatch {
    pub first_name: Value,
    pub last_name: Value,
    /// A blank comment clears the stored one.
    pub comment: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidGuest {
    pub first_name: String,
    pub last_name: String,
    pub comment: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidGuestPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` clears the comment.
    pub comment: Option<Option<String>>,
}

/// Pledge form as sent by a client, raw like [`GuestInput`].
#[derive(Clone, Debug, Default)]
pub struct ContributionInput {
    pub guest_id: Value,
    pub category: Value,
    pub description: Value,
    pub servings: Value,
}

/// Contribution edit. The owner cannot be changed, so there is no guest id.
#[derive(Clone, Debug, Default)]
pub struct ContributionPatch {
    pub category: Value,
    pub description: Value,
    pub servings: Value,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidContribution {
    pub guest_id: i32,
    pub category: Category,
    pub description: String,
    pub servings: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidContributionPatch {
    pub category: Option<Category>,
    pub description: Option<String>,
    pub servings: Option<i32>,
}

pub fn validate_guest(input: GuestInput) -> Result<ValidGuest, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let first_name = text_field(&mut errors, "firstName", "Le prénom", &input.first_name)
        .required(&mut errors, "firstName", "Le prénom est requis")
        .map(|value| check_name(&mut errors, "firstName", "Le prénom", value));
    let last_name = text_field(&mut errors, "lastName", "Le nom", &input.last_name)
        .required(&mut errors, "lastName", "Le nom est requis")
        .map(|value| check_name(&mut errors, "lastName", "Le nom", value));
    let comment = text_field(&mut errors, "comment", "Le commentaire", &input.comment).sent();
    let comment = check_comment(&mut errors, comment).flatten();

    errors.finish(ValidGuest {
        first_name: first_name.unwrap_or_default(),
        last_name: last_name.unwrap_or_default(),
        comment,
    })
}

pub fn validate_guest_update(patch: GuestPatch) -> Result<ValidGuestPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let first_name = text_field(&mut errors, "firstName", "Le prénom", &patch.first_name)
        .sent()
        .map(|value| check_name(&mut errors, "firstName", "Le prénom", value));
    let last_name = text_field(&mut errors, "lastName", "Le nom", &patch.last_name)
        .sent()
        .map(|value| check_name(&mut errors, "lastName", "Le nom", value));
    let comment = text_field(&mut errors, "comment", "Le commentaire", &patch.comment).sent();
    let comment = check_comment(&mut errors, comment);

    errors.finish(ValidGuestPatch {
        first_name,
        last_name,
        comment,
    })
}

pub fn validate_contribution(
    input: ContributionInput,
) -> Result<ValidContribution, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let guest_id = integer_field(
        &mut errors,
        "guestId",
        "L'identifiant du participant",
        &input.guest_id,
    )
    .required(&mut errors, "guestId", GUEST_ID_REQUIRED)
    .and_then(|raw| check_guest_id(&mut errors, raw));
    let category = category_field(&mut errors, &input.category)
        .required(&mut errors, "category", CATEGORY_INVALID);
    let description = text_field(&mut errors, "description", "La description", &input.description)
        .required(&mut errors, "description", "La description est requise")
        .map(|value| check_description(&mut errors, value));
    let servings = integer_field(&mut errors, "servings", "Le nombre de parts", &input.servings)
        .required(&mut errors, "servings", "Le nombre de parts est requis")
        .map(|value| check_servings(&mut errors, value));

    match (guest_id, category, description, servings) {
        (Some(guest_id), Some(category), Some(description), Some(servings))
            if errors.is_empty() =>
        {
            Ok(ValidContribution {
                guest_id,
                category,
                description,
                servings,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_contribution_update(
    patch: ContributionPatch,
) -> Result<ValidContributionPatch, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let category = category_field(&mut errors, &patch.category).sent();
    let description = text_field(&mut errors, "description", "La description", &patch.description)
        .sent()
        .map(|value| check_description(&mut errors, value));
    let servings = integer_field(&mut errors, "servings", "Le nombre de parts", &patch.servings)
        .sent()
        .map(|value| check_servings(&mut errors, value));

    errors.finish(ValidContributionPatch {
        category,
        description,
        servings,
    })
}

/// Parse an identifier taken from a path. Only positive integers are ids.
pub fn parse_id(raw: &str) -> ResultEngine<i32> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(EngineError::InvalidId(raw.to_string())),
    }
}

/// What a client sent for one field.
enum Field<T> {
    Absent,
    Present(T),
    /// Wrong JSON type, already reported.
    Invalid,
}

impl<T> Field<T> {
    fn required(
        self,
        errors: &mut ValidationErrors,
        field: &'static str,
        message: &str,
    ) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent => {
                errors.push(field, message);
                None
            }
            Field::Invalid => None,
        }
    }

    fn sent(self) -> Option<T> {
        match self {
            Field::Present(value) => Some(value),
            Field::Absent | Field::Invalid => None,
        }
    }
}

fn text_field<'a>(
    errors: &mut ValidationErrors,
    field: &'static str,
    subject: &str,
    value: &'a Value,
) -> Field<&'a str> {
    match value {
        Value::Null => Field::Absent,
        Value::String(text) => Field::Present(text),
        _ => {
            errors.push(field, format!("{subject} doit être une chaîne de caractères"));
            Field::Invalid
        }
    }
}

/// `5.0` counts as an integer; `2.5` and `"5"` do not.
fn integer_field(
    errors: &mut ValidationErrors,
    field: &'static str,
    subject: &str,
    value: &Value,
) -> Field<i64> {
    let integer = match value {
        Value::Null => return Field::Absent,
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    match integer {
        Some(integer) => Field::Present(integer),
        None => {
            errors.push(field, format!("{subject} doit être un nombre entier"));
            Field::Invalid
        }
    }
}

fn category_field(errors: &mut ValidationErrors, value: &Value) -> Field<Category> {
    match value {
        Value::Null => Field::Absent,
        Value::String(code) => match check_category(errors, code) {
            Some(category) => Field::Present(category),
            None => Field::Invalid,
        },
        _ => {
            errors.push("category", CATEGORY_INVALID);
            Field::Invalid
        }
    }
}

fn check_guest_id(errors: &mut ValidationErrors, raw: i64) -> Option<i32> {
    match i32::try_from(raw) {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.push("guestId", GUEST_ID_REQUIRED);
            None
        }
    }
}

fn check_name(
    errors: &mut ValidationErrors,
    field: &'static str,
    subject: &str,
    value: &str,
) -> String {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_LEN {
        errors.push(
            field,
            format!("{subject} doit contenir au moins {NAME_MIN_LEN} caractères"),
        );
    } else if len > NAME_MAX_LEN {
        errors.push(
            field,
            format!("{subject} ne peut pas dépasser {NAME_MAX_LEN} caractères"),
        );
    }
    trimmed.to_string()
}

/// `None` when no comment was sent, `Some(None)` when it is blank.
fn check_comment(errors: &mut ValidationErrors, value: Option<&str>) -> Option<Option<String>> {
    let value = value?;
    if value.chars().count() > COMMENT_MAX_LEN {
        errors.push(
            "comment",
            format!("Le commentaire ne peut pas dépasser {COMMENT_MAX_LEN} caractères"),
        );
    }
    let trimmed = value.trim();
    Some((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn check_category(errors: &mut ValidationErrors, value: &str) -> Option<Category> {
    let category = Category::from_code(value);
    if category.is_none() {
        errors.push("category", CATEGORY_INVALID);
    }
    category
}

fn check_description(errors: &mut ValidationErrors, value: &str) -> String {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < DESCRIPTION_MIN_LEN {
        errors.push(
            "description",
            format!("La description doit contenir au moins {DESCRIPTION_MIN_LEN} caractères"),
        );
    } else if len > DESCRIPTION_MAX_LEN {
        errors.push(
            "description",
            format!("La description ne peut pas dépasser {DESCRIPTION_MAX_LEN} caractères"),
        );
    }
    trimmed.to_string()
}

fn check_servings(errors: &mut ValidationErrors, value: i64) -> i32 {
    if value < SERVINGS_MIN {
        errors.push(
            "servings",
            format!("Le nombre de parts doit être au moins {SERVINGS_MIN}"),
        );
    } else if value > SERVINGS_MAX {
        errors.push(
            "servings",
            format!("Le nombre de parts ne peut pas dépasser {SERVINGS_MAX}"),
        );
    }
    // Only stored when `errors` stayed empty, i.e. already in range.
    value.clamp(SERVINGS_MIN, SERVINGS_MAX) as i32
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn guest(first: &str, last: &str) -> GuestInput {
        GuestInput {
            first_name: first.into(),
            last_name: last.into(),
            ..Default::default()
        }
    }

    fn contribution(description: &str, servings: i64) -> ContributionInput {
        ContributionInput {
            guest_id: 1.into(),
            category: "SALTY".into(),
            description: description.into(),
            servings: servings.into(),
        }
    }

    #[test]
    fn guest_names_are_trimmed() {
        let valid = validate_guest(guest("  Pierre ", "Lefebvre\t")).unwrap();
        assert_eq!(valid.first_name, "Pierre");
        assert_eq!(valid.last_name, "Lefebvre");
        assert_eq!(valid.comment, None);
    }

    #[test]
    fn guest_name_bounds() {
        assert!(validate_guest(guest("Al", "Bo")).is_ok());
        assert!(validate_guest(guest(&"a".repeat(50), "Bo")).is_ok());

        let errors = validate_guest(guest("A", "Bo")).unwrap_err();
        assert_eq!(
            errors.message("firstName"),
            Some("Le prénom doit contenir au moins 2 caractères")
        );

        let errors = validate_guest(guest("Al", &"b".repeat(51))).unwrap_err();
        assert_eq!(
            errors.message("lastName"),
            Some("Le nom ne peut pas dépasser 50 caractères")
        );

        // Padding does not count towards the minimum.
        assert!(validate_guest(guest(" A ", "Bo")).is_err());
    }

    #[test]
    fn guest_names_are_required() {
        let errors = validate_guest(GuestInput::default()).unwrap_err();
        assert_eq!(errors.message("firstName"), Some("Le prénom est requis"));
        assert_eq!(errors.message("lastName"), Some("Le nom est requis"));
        assert_eq!(errors.message("comment"), None);
    }

    #[test]
    fn guest_reports_every_failing_field() {
        let mut input = guest("A", "B");
        input.comment = "x".repeat(501).into();
        let errors = validate_guest(input).unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["firstName", "lastName", "comment"]);
    }

    #[test]
    fn guest_comment_bounds() {
        let mut input = guest("Marie", "Curie");
        input.comment = "x".repeat(500).into();
        assert!(validate_guest(input.clone()).is_ok());

        input.comment = "   ".into();
        assert_eq!(validate_guest(input).unwrap().comment, None);
    }

    #[test]
    fn guest_fields_must_be_strings() {
        let errors = validate_guest(GuestInput {
            first_name: json!(12),
            last_name: json!(["Curie"]),
            comment: json!(true),
        })
        .unwrap_err();
        assert_eq!(
            errors.message("firstName"),
            Some("Le prénom doit être une chaîne de caractères")
        );
        assert_eq!(
            errors.message("lastName"),
            Some("Le nom doit être une chaîne de caractères")
        );
        assert_eq!(
            errors.message("comment"),
            Some("Le commentaire doit être une chaîne de caractères")
        );
        // A wrong type is not also reported as missing.
        assert_eq!(errors.fields().len(), 3);
    }

    #[test]
    fn guest_update_accepts_any_subset() {
        let empty = validate_guest_update(GuestPatch::default()).unwrap();
        assert_eq!(empty, ValidGuestPatch::default());

        let patch = validate_guest_update(GuestPatch {
            last_name: " Martin ".into(),
            comment: "".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.first_name, None);
        assert_eq!(patch.last_name.as_deref(), Some("Martin"));
        assert_eq!(patch.comment, Some(None));

        let errors = validate_guest_update(GuestPatch {
            first_name: "J".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(errors.fields()[0].field, "firstName");
    }

    #[test]
    fn guest_update_comment_bounds() {
        let patch = validate_guest_update(GuestPatch {
            comment: "x".repeat(500).into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.comment, Some(Some("x".repeat(500))));

        let errors = validate_guest_update(GuestPatch {
            comment: "x".repeat(501).into(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            errors.message("comment"),
            Some("Le commentaire ne peut pas dépasser 500 caractères")
        );
        assert_eq!(errors.fields().len(), 1);
    }

    #[test]
    fn servings_bounds() {
        for servings in 1..=50 {
            assert!(
                validate_contribution(contribution("Quiche", servings)).is_ok(),
                "{servings} servings should be accepted"
            );
        }
        for servings in [0, 51, -3, i64::MAX] {
            let errors = validate_contribution(contribution("Quiche", servings)).unwrap_err();
            assert!(errors.message("servings").is_some());
        }
    }

    #[test]
    fn servings_must_be_an_integer() {
        for servings in [json!("5"), json!(2.5), json!(true), json!({"n": 5})] {
            let mut input = contribution("Quiche", 4);
            input.servings = servings.clone();
            let errors = validate_contribution(input).unwrap_err();
            assert_eq!(
                errors.message("servings"),
                Some("Le nombre de parts doit être un nombre entier"),
                "{servings} should be rejected"
            );
            assert_eq!(errors.fields().len(), 1);
        }

        let mut input = contribution("Quiche", 4);
        input.servings = Value::Null;
        let errors = validate_contribution(input).unwrap_err();
        assert_eq!(
            errors.message("servings"),
            Some("Le nombre de parts est requis")
        );

        // A float with no fractional part is a whole number of servings.
        let mut input = contribution("Quiche", 4);
        input.servings = json!(6.0);
        assert_eq!(validate_contribution(input).unwrap().servings, 6);
    }

    #[test]
    fn description_bounds() {
        for len in 0..=2 {
            assert!(validate_contribution(contribution(&"d".repeat(len), 4)).is_err());
        }
        for len in [3, 4, 100, 200] {
            assert!(validate_contribution(contribution(&"d".repeat(len), 4)).is_ok());
        }
        let errors = validate_contribution(contribution(&"d".repeat(201), 4)).unwrap_err();
        assert_eq!(
            errors.message("description"),
            Some("La description ne peut pas dépasser 200 caractères")
        );
    }

    #[test]
    fn contribution_rejects_unknown_category_and_bad_guest() {
        let input = ContributionInput {
            guest_id: 0.into(),
            category: "DESSERT".into(),
            description: "Tarte".into(),
            servings: 8.into(),
        };
        let errors = validate_contribution(input).unwrap_err();
        assert_eq!(errors.message("category"), Some("Catégorie invalide"));
        assert_eq!(
            errors.message("guestId"),
            Some("L'identifiant du participant est requis")
        );

        let errors = validate_contribution(ContributionInput {
            guest_id: "7".into(),
            category: 3.into(),
            ..contribution("Tarte", 8)
        })
        .unwrap_err();
        assert_eq!(
            errors.message("guestId"),
            Some("L'identifiant du participant doit être un nombre entier")
        );
        assert_eq!(errors.message("category"), Some("Catégorie invalide"));

        let errors = validate_contribution(ContributionInput {
            guest_id: i64::from(i32::MAX).saturating_add(1).into(),
            ..contribution("Tarte", 8)
        })
        .unwrap_err();
        assert!(errors.message("guestId").is_some());
    }

    #[test]
    fn contribution_reports_missing_fields() {
        let errors = validate_contribution(ContributionInput::default()).unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["guestId", "category", "description", "servings"]);
        assert_eq!(
            errors.message("description"),
            Some("La description est requise")
        );
    }

    #[test]
    fn contribution_is_normalized() {
        let valid = validate_contribution(ContributionInput {
            guest_id: 7.into(),
            category: "DRINK".into(),
            description: " Jus de pomme ".into(),
            servings: 12.into(),
        })
        .unwrap();
        assert_eq!(
            valid,
            ValidContribution {
                guest_id: 7,
                category: Category::Drink,
                description: "Jus de pomme".to_string(),
                servings: 12,
            }
        );
    }

    #[test]
    fn contribution_update_checks_only_sent_fields() {
        let patch = validate_contribution_update(ContributionPatch {
            servings: 10.into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.servings, Some(10));
        assert_eq!(patch.category, None);

        let errors = validate_contribution_update(ContributionPatch {
            category: "sweet".into(),
            servings: 0.into(),
            ..Default::default()
        })
        .unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["category", "servings"]);

        let errors = validate_contribution_update(ContributionPatch {
            servings: "10".into(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            errors.message("servings"),
            Some("Le nombre de parts doit être un nombre entier")
        );
    }

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("12"), Ok(12));
        assert!(matches!(parse_id("0"), Err(EngineError::InvalidId(_))));
        assert!(matches!(parse_id("-4"), Err(EngineError::InvalidId(_))));
        assert!(matches!(parse_id("abc"), Err(EngineError::InvalidId(_))));
    }
}
