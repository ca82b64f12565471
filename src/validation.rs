//! 本地输入校验
//!
//! 校验失败的输入不会到达 HTTP Client Core。

use crate::error::ValidationError;
use branchdesk_shared::PendingBranch;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const LOGIN_MIN_PASSWORD_LEN: usize = 6;
pub const REGISTER_MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// 校验邮箱与密码，`min_len` 为密码最小长度（按字符计）
pub fn validate_credentials(
    email: &str,
    password: &str,
    min_len: usize,
) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("Email is required"));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::new("Please enter a valid email address"));
    }
    if password.is_empty() {
        return Err(ValidationError::new("Password is required"));
    }
    if password.chars().count() < min_len {
        return Err(ValidationError::new(format!(
            "Password must be at least {} characters",
            min_len
        )));
    }
    Ok(())
}

/// 注册表单：在凭据校验之上再检查两次输入的密码一致
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    validate_credentials(email, password, REGISTER_MIN_PASSWORD_LEN)?;
    if password != confirm_password {
        return Err(ValidationError::new("Passwords do not match"));
    }
    Ok(())
}

/// 分店表单的逐字段错误，键为线上字段名
pub type FieldErrors = BTreeMap<&'static str, String>;

pub fn validate_branch(branch: &PendingBranch) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if branch.name.trim().is_empty() {
        errors.insert("name", "Branch name is required".into());
    }
    if branch.location.trim().is_empty() {
        errors.insert("location", "Location is required".into());
    }

    let email = branch.email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required".into());
    } else if !is_valid_email(email) {
        errors.insert("email", "Invalid email format".into());
    }

    let phone = branch.phone_number.trim();
    if phone.is_empty() {
        errors.insert("phoneNumber", "Phone number is required".into());
    } else if !is_valid_phone(phone) {
        errors.insert("phoneNumber", "Phone number must be 10 digits".into());
    }

    if branch.branch_manager_name.trim().is_empty() {
        errors.insert("branchManagerName", "Manager name is required".into());
    }

    let manager_phone = branch.branch_manager_phone.trim();
    if manager_phone.is_empty() {
        errors.insert("branchManagerPhone", "Manager phone is required".into());
    } else if !is_valid_phone(manager_phone) {
        errors.insert("branchManagerPhone", "Phone number must be 10 digits".into());
    }

    if !branch.latitude.is_finite() || !(-90.0..=90.0).contains(&branch.latitude) {
        errors.insert("latitude", "Latitude must be between -90 and 90".into());
    }
    if !branch.longitude.is_finite() || !(-180.0..=180.0).contains(&branch.longitude) {
        errors.insert("longitude", "Longitude must be between -180 and 180".into());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
