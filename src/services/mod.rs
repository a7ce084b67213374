pub mod auth;
pub mod lecture_materials;
pub mod lectures;
pub mod roles;
pub mod users;

pub use auth::AuthService;
pub use lecture_materials::LectureMaterialService;
pub use lectures::LectureService;
pub use roles::RoleService;
pub use users::UserService;
