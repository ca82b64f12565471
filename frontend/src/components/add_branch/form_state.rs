//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到待创建分店的转换（含本地校验）

use branchdesk::validation::{FieldErrors, validate_branch};
use branchdesk_shared::{Attachment, PendingBranch};
use leptos::prelude::*;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub name: RwSignal<String>,
    pub location: RwSignal<String>,
    pub latitude: RwSignal<String>,
    pub longitude: RwSignal<String>,
    pub email: RwSignal<String>,
    pub phone_number: RwSignal<String>,
    pub manager_name: RwSignal<String>,
    pub manager_phone: RwSignal<String>,
    pub files: RwSignal<Vec<Attachment>>,
    /// 逐字段错误，键为线上字段名
    pub errors: RwSignal<FieldErrors>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            location: RwSignal::new(String::new()),
            latitude: RwSignal::new(String::new()),
            longitude: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone_number: RwSignal::new(String::new()),
            manager_name: RwSignal::new(String::new()),
            manager_phone: RwSignal::new(String::new()),
            files: RwSignal::new(Vec::new()),
            errors: RwSignal::new(FieldErrors::new()),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        for field in [
            self.name,
            self.location,
            self.latitude,
            self.longitude,
            self.email,
            self.phone_number,
            self.manager_name,
            self.manager_phone,
        ] {
            field.set(String::new());
        }
        self.files.set(Vec::new());
        self.errors.set(FieldErrors::new());
    }

    /// 某个字段当前的错误信息
    pub fn error(&self, field: &'static str) -> Option<String> {
        self.errors.with(|errors| errors.get(field).cloned())
    }

    /// 校验并转换为待创建分店，失败时把错误写回 `errors`
    pub fn to_pending(&self) -> Option<PendingBranch> {
        let input = BranchInput {
            name: self.name.get_untracked(),
            location: self.location.get_untracked(),
            latitude: self.latitude.get_untracked(),
            longitude: self.longitude.get_untracked(),
            email: self.email.get_untracked(),
            phone_number: self.phone_number.get_untracked(),
            manager_name: self.manager_name.get_untracked(),
            manager_phone: self.manager_phone.get_untracked(),
            files: self.files.get_untracked(),
        };

        match assemble(input) {
            Ok(pending) => {
                self.errors.set(FieldErrors::new());
                Some(pending)
            }
            Err(errors) => {
                self.errors.set(errors);
                None
            }
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 表单原始输入
struct BranchInput {
    name: String,
    location: String,
    latitude: String,
    longitude: String,
    email: String,
    phone_number: String,
    manager_name: String,
    manager_phone: String,
    files: Vec<Attachment>,
}

fn assemble(input: BranchInput) -> Result<PendingBranch, FieldErrors> {
    let mut parse_errors = FieldErrors::new();
    let mut coordinate = |field: &'static str, raw: &str| match raw.trim().parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            let message = if raw.trim().is_empty() {
                "is required"
            } else {
                "must be a number"
            };
            parse_errors.insert(field, format!("{} {}", capitalize(field), message));
            0.0
        }
    };

    let latitude = coordinate("latitude", &input.latitude);
    let longitude = coordinate("longitude", &input.longitude);

    let pending = PendingBranch {
        name: input.name.trim().to_string(),
        location: input.location.trim().to_string(),
        latitude,
        longitude,
        email: input.email.trim().to_string(),
        phone_number: input.phone_number.trim().to_string(),
        branch_manager_name: input.manager_name.trim().to_string(),
        branch_manager_phone: input.manager_phone.trim().to_string(),
        files: input.files,
    };

    let mut errors = validate_branch(&pending).err().unwrap_or_default();
    // 解析失败的坐标用 0.0 占位，范围错误被解析错误覆盖
    errors.extend(parse_errors);

    if errors.is_empty() {
        Ok(pending)
    } else {
        Err(errors)
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> BranchInput {
        BranchInput {
            name: " Ashoka Yamaha - Mettuguda ".into(),
            location: "Hyderabad".into(),
            latitude: "17.43".into(),
            longitude: "78.52".into(),
            email: "mettuguda@ashoka.in".into(),
            phone_number: "9876543210".into(),
            manager_name: "Suresh".into(),
            manager_phone: "9123456780".into(),
            files: vec![],
        }
    }

    #[test]
    fn valid_input_is_trimmed_and_parsed() {
        let pending = assemble(input()).unwrap();
        assert_eq!(pending.name, "Ashoka Yamaha - Mettuguda");
        assert_eq!(pending.latitude, 17.43);
        assert_eq!(pending.longitude, 78.52);
    }

    #[test]
    fn unparsable_coordinates_are_reported() {
        let errors = assemble(BranchInput {
            latitude: "north".into(),
            longitude: String::new(),
            ..input()
        })
        .unwrap_err();
        assert_eq!(errors["latitude"], "Latitude must be a number");
        assert_eq!(errors["longitude"], "Longitude is required");
    }

    #[test]
    fn out_of_range_coordinates_use_range_message() {
        let errors = assemble(BranchInput {
            longitude: "200".into(),
            ..input()
        })
        .unwrap_err();
        assert_eq!(errors["longitude"], "Longitude must be between -180 and 180");
        assert!(!errors.contains_key("latitude"));
    }

    #[test]
    fn field_errors_come_from_shared_validation() {
        let errors = assemble(BranchInput {
            phone_number: "123".into(),
            email: "nope".into(),
            ..input()
        })
        .unwrap_err();
        assert_eq!(errors["phoneNumber"], "Phone number must be 10 digits");
        assert_eq!(errors["email"], "Invalid email format");
    }
}
