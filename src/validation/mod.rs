//! Field validators with Indonesian user-facing messages.
//!
//! Single-field validators return [`ValidationResult`]. Form validators check
//! every field independently and return the full [`FieldErrors`] map; an empty
//! map means the form is valid.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::auth::{LoginRequest, PasswordChangeRequest, RegisterRequest};
use crate::models::category::CategoryCreate;
use crate::models::transaction::TransactionCreate;
use crate::models::university::UniversityCreate;
use crate::models::user::{FinancialSettings, ProfileUpdate};
use crate::utils::format::parse_amount_input;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const FULL_NAME_MIN_LEN: usize = 2;
pub const FULL_NAME_MAX_LEN: usize = 100;
pub const NIM_MIN_LEN: usize = 8;
pub const NIM_MAX_LEN: usize = 15;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const DESCRIPTION_MAX_LEN: usize = 255;
pub const CATEGORY_NAME_MAX_LEN: usize = 50;
pub const INSTITUTION_NAME_MIN_LEN: usize = 3;
pub const INSTITUTION_NAME_MAX_LEN: usize = 200;
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;
pub const ACADEMIC_EMAIL_SUFFIX: &str = ".ac.id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Field name to message. Empty when the form is valid.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailPolicy {
    Any,
    #[default]
    AcademicOnly,
}

pub fn collect_errors<I>(results: I) -> FieldErrors
where
    I: IntoIterator<Item = ValidationResult>,
{
    let mut errors = FieldErrors::new();
    for result in results {
        if let Err(err) = result {
            errors.entry(err.field).or_insert(err.message);
        }
    }
    errors
}

/// Human-readable summary of a form's errors, one per line.
pub fn summarize_errors(errors: &FieldErrors) -> String {
    errors.values().cloned().collect::<Vec<_>>().join("\n")
}

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, label: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{} wajib diisi", label)));
    }

    Ok(())
}

pub fn validate_max_len(
    field: &'static str,
    label: &str,
    value: &str,
    max_len: usize,
) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("{} maksimal {} karakter", label, max_len),
        ));
    }

    Ok(())
}

pub fn validate_min_len(
    field: &'static str,
    label: &str,
    value: &str,
    min_len: usize,
) -> ValidationResult {
    if value.chars().count() < min_len {
        return Err(ValidationError::new(
            field,
            format!("{} minimal {} karakter", label, min_len),
        ));
    }

    Ok(())
}

pub fn validate_enum(
    field: &'static str,
    label: &str,
    value: &str,
    allowed: &[&str],
) -> ValidationResult {
    if allowed.iter().all(|candidate| value != *candidate) {
        return Err(ValidationError::new(
            field,
            format!("{} harus salah satu dari: {}", label, allowed.join(", ")),
        ));
    }

    Ok(())
}

/// Required free text bounded by `max_len`.
pub fn validate_text(
    field: &'static str,
    label: &str,
    value: &str,
    max_len: usize,
) -> ValidationResult {
    let value = sanitize_string(value);
    validate_required(field, label, &value)?;
    validate_max_len(field, label, &value, max_len)
}

fn is_valid_email_format(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty()
        || !local
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "._%+-".contains(ch))
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2
        || labels.iter().any(|label| {
            label.is_empty()
                || label.starts_with('-')
                || label.ends_with('-')
                || !label.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
        })
    {
        return false;
    }

    labels
        .last()
        .map(|tld| tld.len() >= 2 && tld.chars().all(|ch| ch.is_ascii_alphabetic()))
        .unwrap_or(false)
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    validate_required("email", "Email", email)?;

    if !is_valid_email_format(email) {
        return Err(ValidationError::new("email", "Format email tidak valid"));
    }

    Ok(())
}

/// Student accounts must use a campus address ending in `.ac.id`.
pub fn validate_academic_email(email: &str) -> ValidationResult {
    validate_email(email)?;

    if !email.trim().to_lowercase().ends_with(ACADEMIC_EMAIL_SUFFIX) {
        return Err(ValidationError::new(
            "email",
            "Email harus menggunakan domain universitas (.ac.id)",
        ));
    }

    Ok(())
}

pub fn validate_email_with_policy(email: &str, policy: EmailPolicy) -> ValidationResult {
    match policy {
        EmailPolicy::Any => validate_email(email),
        EmailPolicy::AcademicOnly => validate_academic_email(email),
    }
}

pub fn validate_password(password: &str) -> ValidationResult {
    validate_password_field("password", password)
}

fn validate_password_field(field: &'static str, password: &str) -> ValidationResult {
    validate_required(field, "Password", password)?;
    validate_min_len(field, "Password", password, PASSWORD_MIN_LEN)?;
    validate_max_len(field, "Password", password, PASSWORD_MAX_LEN)?;

    if !password.chars().any(|ch| ch.is_uppercase()) {
        return Err(ValidationError::new(
            field,
            "Password harus mengandung minimal 1 huruf besar",
        ));
    }
    if !password.chars().any(|ch| ch.is_lowercase()) {
        return Err(ValidationError::new(
            field,
            "Password harus mengandung minimal 1 huruf kecil",
        ));
    }
    if !password.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new(
            field,
            "Password harus mengandung minimal 1 angka",
        ));
    }

    Ok(())
}

pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult {
    validate_required("confirm_password", "Konfirmasi password", confirmation)?;

    if password != confirmation {
        return Err(ValidationError::new(
            "confirm_password",
            "Konfirmasi password tidak cocok",
        ));
    }

    Ok(())
}

/// Accepts `08xx`, `62xx` and `+62xx` numbers; spaces and dashes are ignored.
pub fn validate_phone_number(phone: &str) -> ValidationResult {
    let compact: String = phone
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .collect();
    validate_required("phone_number", "Nomor telepon", &compact)?;

    let national = if let Some(rest) = compact.strip_prefix("+62") {
        rest
    } else if let Some(rest) = compact.strip_prefix("62") {
        rest
    } else if let Some(rest) = compact.strip_prefix('0') {
        rest
    } else {
        ""
    };

    let local_len = national.len() + 1;
    let valid = national.starts_with('8')
        && national.chars().all(|ch| ch.is_ascii_digit())
        && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&local_len);

    if !valid {
        return Err(ValidationError::new(
            "phone_number",
            "Format nomor telepon tidak valid (contoh: 081234567890)",
        ));
    }

    Ok(())
}

pub fn validate_nim(nim: &str) -> ValidationResult {
    let nim = nim.trim();
    validate_required("nim", "NIM", nim)?;

    if !nim.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new("nim", "NIM hanya boleh berisi angka"));
    }

    if !(NIM_MIN_LEN..=NIM_MAX_LEN).contains(&nim.len()) {
        return Err(ValidationError::new(
            "nim",
            format!("NIM harus terdiri dari {}-{} digit", NIM_MIN_LEN, NIM_MAX_LEN),
        ));
    }

    Ok(())
}

pub fn validate_full_name(name: &str) -> ValidationResult {
    let name = sanitize_string(name);
    validate_required("full_name", "Nama lengkap", &name)?;
    validate_min_len("full_name", "Nama lengkap", &name, FULL_NAME_MIN_LEN)?;
    validate_max_len("full_name", "Nama lengkap", &name, FULL_NAME_MAX_LEN)?;

    if !name
        .chars()
        .all(|ch| ch.is_alphabetic() || ch == ' ' || ch == '.' || ch == '\'' || ch == '-')
    {
        return Err(ValidationError::new(
            "full_name",
            "Nama lengkap hanya boleh berisi huruf",
        ));
    }

    Ok(())
}

pub fn validate_amount(amount: f64) -> ValidationResult {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::new("amount", "Jumlah harus lebih dari 0"));
    }

    if amount > MAX_AMOUNT {
        return Err(ValidationError::new("amount", "Jumlah terlalu besar"));
    }

    Ok(())
}

/// Raw text from an amount input, e.g. `Rp 1.500.000`.
pub fn validate_amount_input(raw: &str) -> ValidationResult {
    validate_required("amount", "Jumlah", raw)?;
    match parse_amount_input(raw) {
        Some(amount) => validate_amount(amount),
        None => Err(ValidationError::new("amount", "Jumlah harus berupa angka")),
    }
}

pub fn validate_non_negative_amount(
    field: &'static str,
    label: &str,
    amount: f64,
) -> ValidationResult {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::new(
            field,
            format!("{} tidak boleh negatif", label),
        ));
    }

    if amount > MAX_AMOUNT {
        return Err(ValidationError::new(field, format!("{} terlalu besar", label)));
    }

    Ok(())
}

pub fn validate_description(description: &str) -> ValidationResult {
    validate_text(
        "description",
        "Deskripsi",
        description,
        DESCRIPTION_MAX_LEN,
    )
}

/// `#RRGGBB`
pub fn validate_color_hex(color: &str) -> ValidationResult {
    let color = color.trim();
    validate_required("color", "Warna", color)?;

    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|ch| ch.is_ascii_hexdigit());

    if !valid {
        return Err(ValidationError::new(
            "color",
            "Warna harus dalam format hex (contoh: #FF5733)",
        ));
    }

    Ok(())
}

pub fn validate_category_name(name: &str) -> ValidationResult {
    validate_text("name", "Nama kategori", name, CATEGORY_NAME_MAX_LEN)
}

pub fn validate_institution_name(field: &'static str, label: &str, name: &str) -> ValidationResult {
    let name = sanitize_string(name);
    validate_required(field, label, &name)?;
    validate_min_len(field, label, &name, INSTITUTION_NAME_MIN_LEN)?;
    validate_max_len(field, label, &name, INSTITUTION_NAME_MAX_LEN)
}

pub fn validate_login_form(form: &LoginRequest) -> FieldErrors {
    collect_errors([
        validate_email(&form.email),
        validate_required("password", "Password", &form.password),
    ])
}

pub fn validate_registration_form(form: &RegisterRequest, policy: EmailPolicy) -> FieldErrors {
    collect_errors([
        validate_full_name(&form.full_name),
        validate_email_with_policy(&form.email, policy),
        validate_password(&form.password),
        validate_password_confirmation(&form.password, &form.confirm_password),
        optional(form.phone_number.as_deref(), validate_phone_number),
        optional(form.nim.as_deref(), validate_nim),
    ])
}

pub fn validate_password_change_form(form: &PasswordChangeRequest) -> FieldErrors {
    let mut errors = collect_errors([
        validate_required("current_password", "Password lama", &form.current_password),
        validate_password_field("new_password", &form.new_password),
        validate_password_confirmation(&form.new_password, &form.confirm_password),
    ]);

    if !form.new_password.is_empty() && form.new_password == form.current_password {
        errors.entry("new_password").or_insert_with(|| {
            "Password baru harus berbeda dari password lama".to_string()
        });
    }

    errors
}

pub fn validate_profile_form(form: &ProfileUpdate) -> FieldErrors {
    collect_errors([
        optional(form.full_name.as_deref(), validate_full_name),
        optional(form.phone_number.as_deref(), validate_phone_number),
        optional(form.nim.as_deref(), validate_nim),
        match form.semester {
            Some(semester) if !(1..=14).contains(&semester) => Err(ValidationError::new(
                "semester",
                "Semester harus antara 1 dan 14",
            )),
            _ => Ok(()),
        },
    ])
}

pub fn validate_financial_settings_form(form: &FinancialSettings) -> FieldErrors {
    let mut errors = collect_errors([
        validate_non_negative_amount("monthly_income", "Pendapatan bulanan", form.monthly_income),
        validate_non_negative_amount("monthly_budget", "Anggaran bulanan", form.monthly_budget),
        validate_non_negative_amount("savings_target", "Target tabungan", form.savings_target),
        validate_non_negative_amount("current_savings", "Tabungan saat ini", form.current_savings),
    ]);

    if form.monthly_income > 0.0 && form.monthly_budget > form.monthly_income {
        errors.entry("monthly_budget").or_insert_with(|| {
            "Anggaran bulanan tidak boleh melebihi pendapatan".to_string()
        });
    }

    errors
}

pub fn validate_transaction_form(form: &TransactionCreate) -> FieldErrors {
    collect_errors([
        validate_required("category_id", "Kategori", &form.category_id),
        validate_amount(form.amount),
        validate_description(&form.description),
    ])
}

pub fn validate_category_form(form: &CategoryCreate) -> FieldErrors {
    collect_errors([
        validate_category_name(&form.name),
        validate_required("icon", "Ikon", &form.icon),
        validate_color_hex(&form.color),
    ])
}

pub fn validate_university_form(form: &UniversityCreate) -> FieldErrors {
    let mut errors = collect_errors([validate_institution_name(
        "name",
        "Nama universitas",
        &form.name,
    )]);

    let faculty_invalid = form.faculties.iter().any(|faculty| {
        validate_institution_name("faculties", "Nama fakultas", &faculty.name).is_err()
    });
    if faculty_invalid {
        errors.insert(
            "faculties",
            format!(
                "Nama fakultas harus {}-{} karakter",
                INSTITUTION_NAME_MIN_LEN, INSTITUTION_NAME_MAX_LEN
            ),
        );
    }

    let major_invalid = form
        .faculties
        .iter()
        .flat_map(|faculty| faculty.majors.iter())
        .any(|major| validate_institution_name("majors", "Nama jurusan", &major.name).is_err());
    if major_invalid {
        errors.insert(
            "majors",
            format!(
                "Nama jurusan harus {}-{} karakter",
                INSTITUTION_NAME_MIN_LEN, INSTITUTION_NAME_MAX_LEN
            ),
        );
    }

    errors
}

fn optional(value: Option<&str>, validator: fn(&str) -> ValidationResult) -> ValidationResult {
    match value {
        Some(v) if !v.trim().is_empty() => validator(v),
        _ => Ok(()),
    }
}
