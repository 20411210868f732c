use serde::{Deserialize, Serialize};

/// 账号角色，创建后不可修改
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,      // 管理员
    Instructor, // 教师
    Student,    // 学生
}

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const INSTRUCTOR: &'static str = "instructor";
    pub const STUDENT: &'static str = "student";

    /// 登录后该角色的首页
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/api/v1/admin/dashboard",
            Role::Instructor => "/api/v1/instructor/classes",
            Role::Student => "/api/v1/student/dashboard",
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Role>().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid role: '{s}'. Supported roles: admin, instructor, student"
            ))
        })
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "{}", Role::ADMIN),
            Role::Instructor => write!(f, "{}", Role::INSTRUCTOR),
            Role::Student => write!(f, "{}", Role::STUDENT),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Role::ADMIN => Ok(Role::Admin),
            Role::INSTRUCTOR => Ok(Role::Instructor),
            Role::STUDENT => Ok(Role::Student),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

// 登录账号
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub role: Role,
    pub display_name: String,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 创建账号时的公共字段，password 在进入存储层前已经是摘要
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
}
