pub mod admin;
pub mod auth;
pub mod instructor;
pub mod student;

pub use admin::AdminService;
pub use auth::AuthService;
pub use instructor::InstructorService;
pub use student::StudentService;
