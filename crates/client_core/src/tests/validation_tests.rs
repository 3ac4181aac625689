use super::*;
use crate::test_support::{jpeg_photo, valid_values};

#[test]
fn phone_must_be_plus380_and_nine_digits() {
    assert!(is_valid_phone("+380501234567"));
    assert!(!is_valid_phone("+38050123456"));
    assert!(!is_valid_phone("+3805012345678"));
    assert!(!is_valid_phone("380501234567"));
    assert!(!is_valid_phone("+380 50 123 45 67"));
    assert!(!is_valid_phone("+380501234567\n"));
    assert!(!is_valid_phone("+38050123456a"));
    // Arabic-Indic digits are not accepted.
    assert!(!is_valid_phone("+380٥٠١٢٣٤٥٦٧"));
}

#[test]
fn email_needs_local_part_and_dotted_domain() {
    assert!(is_valid_email("a@b.c"));
    assert!(is_valid_email("first.last@mail.example.org"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("@b.c"));
    assert!(!is_valid_email("a@.c"));
    assert!(!is_valid_email("a b@c.d"));
    assert!(!is_valid_email("a@@b.c"));
    assert!(!is_valid_email(" a@b.c"));
}

#[test]
fn name_is_measured_after_trimming() {
    assert!(!is_valid_name("A"));
    assert!(!is_valid_name("  A   "));
    assert!(is_valid_name("Al"));
    assert!(is_valid_name("Ян"));
}

#[test]
fn empty_form_reports_every_field() {
    let errors = validate(&FormValues::default());
    assert_eq!(errors.len(), 5);
    assert_eq!(errors.get(FormField::Name), Some(NAME_REQUIRED));
    assert_eq!(errors.get(FormField::Email), Some(INVALID_EMAIL));
    assert_eq!(errors.get(FormField::Phone), Some(INVALID_PHONE));
    assert_eq!(errors.get(FormField::Position), Some(POSITION_REQUIRED));
    assert_eq!(errors.get(FormField::Photo), Some(PHOTO_REQUIRED));
}

#[test]
fn each_broken_field_invalidates_an_otherwise_valid_form() {
    assert!(validate(&valid_values()).is_empty());

    let breakers: [(FormField, fn(&mut FormValues)); 5] = [
        (FormField::Name, |v| v.name = "A".to_string()),
        (FormField::Email, |v| v.email = "nope".to_string()),
        (FormField::Phone, |v| v.phone = "380501234567".to_string()),
        (FormField::Position, |v| v.position = "9".to_string()),
        (FormField::Photo, |v| v.photo = None),
    ];

    for (field, breaker) in breakers {
        let mut values = valid_values();
        breaker(&mut values);
        let errors = validate(&values);
        assert_eq!(
            errors.iter().map(|(f, _)| f).collect::<Vec<_>>(),
            vec![field],
            "only {field} should fail"
        );

        let mut fixed = values.clone();
        match field {
            FormField::Name => fixed.name = "Al".to_string(),
            FormField::Email => fixed.email = "al@example.com".to_string(),
            FormField::Phone => fixed.phone = "+380991112233".to_string(),
            FormField::Position => fixed.position = "3".to_string(),
            FormField::Photo => fixed.photo = Some(jpeg_photo()),
        }
        assert!(validate(&fixed).is_empty(), "{field} should recover");
    }
}
