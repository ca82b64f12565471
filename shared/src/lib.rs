use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

pub use date::Timestamp;
pub use protocol::{
    ApiRequest, ErrorBody, FormPart, GetBranchRequest, HttpMethod, ListBranchesRequest,
    MultipartForm, Payload,
};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const BEARER_PREFIX: &str = "Bearer ";

/// 登录/注册时未指定角色所使用的默认角色
pub const DEFAULT_ROLE: &str = "ADMIN";

/// multipart 中文件分片重复使用的字段名
pub const FILES_FIELD: &str = "files";

// =========================================================
// 认证模型 (Auth Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

// =========================================================
// 分店模型 (Branch Models)
// =========================================================

/// 服务端返回的分店记录
///
/// `id` 由服务端分配，客户端从不修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub email: String,
    pub phone_number: String,
    pub branch_manager_name: String,
    pub branch_manager_phone: String,
    #[serde(default)]
    pub branch_documents: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// 上传用的二进制附件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// 待创建的分店
///
/// 由表单构建、本地校验后序列化为 multipart 请求体，提交后即丢弃。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PendingBranch {
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub email: String,
    pub phone_number: String,
    pub branch_manager_name: String,
    pub branch_manager_phone: String,
    pub files: Vec<Attachment>,
}

impl PendingBranch {
    /// 标量字段按固定顺序作为文本分片，每个文件作为 `files` 下的二进制分片
    pub fn to_multipart(&self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("name", &self.name)
            .text("location", &self.location)
            .text("latitude", self.latitude.to_string())
            .text("longitude", self.longitude.to_string())
            .text("email", &self.email)
            .text("phoneNumber", &self.phone_number)
            .text("branchManagerName", &self.branch_manager_name)
            .text("branchManagerPhone", &self.branch_manager_phone);

        for file in &self.files {
            form = form.file(FILES_FIELD, file.clone());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn branch_decodes_camel_case_record() {
        let branch: Branch = serde_json::from_value(json!({
            "id": 7,
            "name": "Ashoka - Indiranagar",
            "location": "Bengaluru",
            "latitude": 12.97,
            "longitude": 77.64,
            "email": "indiranagar@example.com",
            "phoneNumber": "9876543210",
            "branchManagerName": "Ravi",
            "branchManagerPhone": "9123456780",
            "branchDocuments": ["https://cdn.example.com/a.pdf"],
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T11:30:00.000Z"
        }))
        .unwrap();

        assert_eq!(branch.id, 7);
        assert_eq!(branch.phone_number, "9876543210");
        assert_eq!(branch.branch_documents.len(), 1);
        assert_eq!(branch.created_at.format_date(), "Mar 1, 2024");
    }

    #[test]
    fn branch_without_documents_defaults_to_empty() {
        let branch: Branch = serde_json::from_value(json!({
            "id": 1,
            "name": "n",
            "location": "l",
            "latitude": 0,
            "longitude": 0,
            "email": "e@x.io",
            "phoneNumber": "0000000000",
            "branchManagerName": "m",
            "branchManagerPhone": "0000000000",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(branch.branch_documents.is_empty());
    }

    #[test]
    fn pending_branch_multipart_layout() {
        let pending = PendingBranch {
            name: "North".into(),
            location: "Pune".into(),
            latitude: 18.5,
            longitude: 0.0,
            email: "north@example.com".into(),
            phone_number: "9999999999".into(),
            branch_manager_name: "Asha".into(),
            branch_manager_phone: "8888888888".into(),
            files: vec![
                Attachment::new("a.pdf", "application/pdf", vec![1, 2]),
                Attachment::new("b.png", "image/png", vec![3]),
            ],
        };

        let form = pending.to_multipart();
        let names: Vec<&str> = form.parts().iter().map(FormPart::name).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "location",
                "latitude",
                "longitude",
                "email",
                "phoneNumber",
                "branchManagerName",
                "branchManagerPhone",
                "files",
                "files",
            ]
        );
        assert_eq!(form.text_value("latitude"), Some("18.5"));
        assert_eq!(form.text_value("longitude"), Some("0"));
    }

    #[test]
    fn login_response_reads_access_token() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "accessToken": "tok",
            "email": "a@b.com",
            "role": "ADMIN",
            "permissions": ["branch:read"]
        }))
        .unwrap();
        assert_eq!(resp.access_token, "tok");
        assert_eq!(resp.permissions, vec!["branch:read".to_string()]);
    }
}
